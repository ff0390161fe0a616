//! The JSON value model.
//!
//! A document is a tree of [`Json`] handles. Each handle is a cheap, shared
//! reference to a node whose kind is fixed when it is built: scalars are
//! immutable, objects and arrays have mutable content. Cloning a handle
//! aliases the node; use [`Json::deep_clone`] for an independent copy.
//!
//! Besides the six JSON kinds there is an *absent* kind. Absent nodes are the
//! result of a lookup that found nothing. They are never stored inside a
//! container, but they remember where they were looked up (parent plus key or
//! index) so that a later write can materialize the missing path. See the
//! `navigate` module.
//!
//! # Coercions
//!
//! Every value can be read as any scalar type. Mismatches never fail, they
//! return the supplied default (or the type's zero value):
//!
//! | from \ to | boolean          | number             | string            |
//! |-----------|------------------|--------------------|-------------------|
//! | boolean   | itself           | `1` / `0`          | `"true"`/`"false"`|
//! | number    | nonzero is true  | itself             | decimal text      |
//! | string    | not `"false"`    | parsed, or default | itself            |
//! | other     | default          | default            | default           |

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Object storage. Keys are kept in ascending order, which is also the order
/// used for iteration, queries and rendering.
pub(crate) type Map = BTreeMap<String, Json>;

/// A handle to a node of a JSON document.
#[derive(Clone)]
pub struct Json {
    node: Rc<Node>,
}

pub(crate) enum Node {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Object(RefCell<Map>),
    Array(RefCell<Vec<Json>>),
    Absent(Absent),
}

/// Where a failed lookup happened. The parent handle is shared, not owned by
/// the tree: absent nodes are transient, so holding it cannot form a cycle.
pub(crate) enum Absent {
    /// Not attached to anything, e.g. the result of an empty query.
    Free,
    /// A missing key below `parent`.
    InObject { parent: Json, key: String },
    /// A missing (normalized) index below `parent`.
    InArray { parent: Json, index: usize },
}

/// The kind of a [`Json`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Object,
    Array,
    Absent,
}

impl Kind {
    /// Lower-case type name, as reported by [`Json::type_name`].
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Absent => "undefined",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Json {
    pub(crate) fn from_node(node: Node) -> Self {
        Self {
            node: Rc::new(node),
        }
    }

    pub(crate) fn node(&self) -> &Node {
        &self.node
    }

    /// The JSON `null` value.
    pub fn null() -> Self {
        Self::from_node(Node::Null)
    }

    /// A new, empty object.
    pub fn object() -> Self {
        Self::from_node(Node::Object(RefCell::new(Map::new())))
    }

    /// A new, empty array.
    pub fn array() -> Self {
        Self::from_node(Node::Array(RefCell::new(Vec::new())))
    }

    /// A freestanding absent value.
    pub fn absent() -> Self {
        Self::from_node(Node::Absent(Absent::Free))
    }

    pub(crate) fn boolean(b: bool) -> Self {
        Self::from_node(Node::Boolean(b))
    }

    pub(crate) fn number(n: f64) -> Self {
        Self::from_node(Node::Number(n))
    }

    pub(crate) fn string(s: String) -> Self {
        Self::from_node(Node::String(s))
    }

    pub(crate) fn from_map(map: Map) -> Self {
        Self::from_node(Node::Object(RefCell::new(map)))
    }

    pub(crate) fn from_vec(items: Vec<Json>) -> Self {
        Self::from_node(Node::Array(RefCell::new(items)))
    }

    pub(crate) fn absent_in_object(parent: &Json, key: &str) -> Self {
        Self::from_node(Node::Absent(Absent::InObject {
            parent: parent.clone(),
            key: key.to_string(),
        }))
    }

    pub(crate) fn absent_in_array(parent: &Json, index: usize) -> Self {
        Self::from_node(Node::Absent(Absent::InArray {
            parent: parent.clone(),
            index,
        }))
    }

    // ------------------------------------------------------------------
    // Type queries
    // ------------------------------------------------------------------

    pub fn kind(&self) -> Kind {
        match self.node() {
            Node::Null => Kind::Null,
            Node::Boolean(_) => Kind::Boolean,
            Node::Number(_) => Kind::Number,
            Node::String(_) => Kind::String,
            Node::Object(_) => Kind::Object,
            Node::Array(_) => Kind::Array,
            Node::Absent(_) => Kind::Absent,
        }
    }

    /// `"null"`, `"boolean"`, `"number"`, `"string"`, `"object"`, `"array"`
    /// or `"undefined"` for absent values.
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.node(), Node::Null)
    }

    /// False only for absent values. `null` is defined.
    pub fn is_defined(&self) -> bool {
        !matches!(self.node(), Node::Absent(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.node(), Node::Boolean(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self.node(), Node::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.node(), Node::String(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.node(), Node::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.node(), Node::Array(_))
    }

    pub fn is_container(&self) -> bool {
        self.is_object() || self.is_array()
    }

    /// True when both handles refer to the same node.
    pub fn same_node(&self, other: &Json) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    // ------------------------------------------------------------------
    // Scalar coercions
    // ------------------------------------------------------------------

    pub fn as_boolean(&self) -> bool {
        self.as_boolean_or(false)
    }

    pub fn as_boolean_or(&self, default: bool) -> bool {
        match self.node() {
            Node::Boolean(b) => *b,
            Node::Number(n) => *n != 0.0,
            Node::String(s) => s != "false",
            _ => default,
        }
    }

    pub fn as_string(&self) -> String {
        self.as_string_or("")
    }

    pub fn as_string_or(&self, default: &str) -> String {
        match self.node() {
            Node::Boolean(b) => b.to_string(),
            Node::Number(n) => n.to_string(),
            Node::String(s) => s.clone(),
            _ => default.to_string(),
        }
    }

    pub fn as_int(&self) -> i32 {
        self.as_int_or(0)
    }

    /// Numbers are truncated toward zero and saturate at the `i32` bounds.
    pub fn as_int_or(&self, default: i32) -> i32 {
        match self.as_long_or_none() {
            Some(n) => n.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            None => default,
        }
    }

    pub fn as_long(&self) -> i64 {
        self.as_long_or(0)
    }

    /// Numbers are truncated toward zero and saturate at the `i64` bounds.
    pub fn as_long_or(&self, default: i64) -> i64 {
        self.as_long_or_none().unwrap_or(default)
    }

    pub fn as_double(&self) -> f64 {
        self.as_double_or(0.0)
    }

    pub fn as_double_or(&self, default: f64) -> f64 {
        match self.node() {
            Node::Boolean(b) => bool_to_f64(*b),
            Node::Number(n) => *n,
            Node::String(s) => s.trim().parse::<f64>().unwrap_or(default),
            _ => default,
        }
    }

    fn as_long_or_none(&self) -> Option<i64> {
        let n = match self.node() {
            Node::Boolean(b) => return Some(i64::from(*b)),
            Node::Number(n) => *n,
            Node::String(s) => {
                let s = s.trim();
                // Exact for integers beyond 2^53.
                if let Ok(i) = s.parse::<i64>() {
                    return Some(i);
                }
                s.parse::<f64>().ok()?
            }
            _ => return None,
        };
        if n.is_nan() {
            None
        } else {
            // `as` truncates and saturates.
            Some(n as i64)
        }
    }

    // ------------------------------------------------------------------
    // Collection views
    // ------------------------------------------------------------------

    /// Keys of an object in ascending order; empty for everything else.
    pub fn as_keys(&self) -> Vec<String> {
        match self.node() {
            Node::Object(map) => map.borrow().keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Values of an object (in key order) or elements of an array; empty for
    /// everything else. The returned handles alias the stored nodes.
    pub fn as_values(&self) -> Vec<Json> {
        match self.node() {
            Node::Object(map) => map.borrow().values().cloned().collect(),
            Node::Array(items) => items.borrow().clone(),
            _ => Vec::new(),
        }
    }

    /// Number of entries of an object or elements of an array, 0 otherwise.
    pub fn len(&self) -> usize {
        match self.node() {
            Node::Object(map) => map.borrow().len(),
            Node::Array(items) => items.borrow().len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match self.node() {
            Node::Object(map) => map.borrow().contains_key(key),
            _ => false,
        }
    }

    /// Borrowed `str` view of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self.node() {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn object_ref(&self) -> Option<Ref<'_, Map>> {
        match self.node() {
            Node::Object(map) => Some(map.borrow()),
            _ => None,
        }
    }

    pub(crate) fn object_mut(&self) -> Option<RefMut<'_, Map>> {
        match self.node() {
            Node::Object(map) => Some(map.borrow_mut()),
            _ => None,
        }
    }

    pub(crate) fn array_ref(&self) -> Option<Ref<'_, Vec<Json>>> {
        match self.node() {
            Node::Array(items) => Some(items.borrow()),
            _ => None,
        }
    }

    pub(crate) fn array_mut(&self) -> Option<RefMut<'_, Vec<Json>>> {
        match self.node() {
            Node::Array(items) => Some(items.borrow_mut()),
            _ => None,
        }
    }

    /// A structurally equal copy that shares no nodes with `self`.
    /// Absent values copy to a freestanding absent value.
    pub fn deep_clone(&self) -> Json {
        let root = self.shallow_clone();
        let mut pending = vec![(self.clone(), root.clone())];
        while let Some((source, copy)) = pending.pop() {
            if let (Some(map), Some(mut target)) = (source.object_ref(), copy.object_mut()) {
                for (key, child) in map.iter() {
                    let child_copy = child.shallow_clone();
                    if child.is_container() {
                        pending.push((child.clone(), child_copy.clone()));
                    }
                    target.insert(key.clone(), child_copy);
                }
            } else if let (Some(items), Some(mut target)) = (source.array_ref(), copy.array_mut())
            {
                for child in items.iter() {
                    let child_copy = child.shallow_clone();
                    if child.is_container() {
                        pending.push((child.clone(), child_copy.clone()));
                    }
                    target.push(child_copy);
                }
            }
        }
        root
    }

    /// A copy of a scalar, or an empty container of the same kind.
    fn shallow_clone(&self) -> Json {
        match self.node() {
            Node::Null => Json::null(),
            Node::Boolean(b) => Json::boolean(*b),
            Node::Number(n) => Json::number(*n),
            Node::String(s) => Json::string(s.clone()),
            Node::Object(_) => Json::object(),
            Node::Array(_) => Json::array(),
            Node::Absent(_) => Json::absent(),
        }
    }
}

impl Node {
    /// Empty a container, handing back its members.
    fn take_members(&mut self) -> Vec<Json> {
        match self {
            Node::Object(map) => std::mem::take(map.get_mut()).into_values().collect(),
            Node::Array(items) => std::mem::take(items.get_mut()),
            _ => Vec::new(),
        }
    }
}

/// Tear containers down iteratively. Members that nothing else refers to
/// are emptied before they are dropped, so no drop recurses.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = self.take_members();
        while let Some(member) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(member.node) {
                pending.extend(node.take_members());
            }
        }
    }
}

fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl Default for Json {
    fn default() -> Self {
        Json::null()
    }
}

/// Deep structural equality. Object key order is irrelevant; all absent
/// values are equal to each other and to nothing else.
impl PartialEq for Json {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self.clone(), other.clone())];
        while let Some((a, b)) = pending.pop() {
            if a.same_node(&b) {
                continue;
            }
            match (a.node(), b.node()) {
                (Node::Null, Node::Null) | (Node::Absent(_), Node::Absent(_)) => {}
                (Node::Boolean(x), Node::Boolean(y)) if x == y => {}
                (Node::Number(x), Node::Number(y)) if x == y => {}
                (Node::String(x), Node::String(y)) if x == y => {}
                (Node::Object(x), Node::Object(y)) => {
                    let (x, y) = (x.borrow(), y.borrow());
                    if x.len() != y.len() {
                        return false;
                    }
                    for ((kx, vx), (ky, vy)) in x.iter().zip(y.iter()) {
                        if kx != ky {
                            return false;
                        }
                        pending.push((vx.clone(), vy.clone()));
                    }
                }
                (Node::Array(x), Node::Array(y)) => {
                    let (x, y) = (x.borrow(), y.borrow());
                    if x.len() != y.len() {
                        return false;
                    }
                    pending.extend(x.iter().cloned().zip(y.iter().cloned()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl PartialEq<bool> for Json {
    fn eq(&self, other: &bool) -> bool {
        matches!(self.node(), Node::Boolean(b) if b == other)
    }
}

impl PartialEq<f64> for Json {
    fn eq(&self, other: &f64) -> bool {
        matches!(self.node(), Node::Number(n) if n == other)
    }
}

impl PartialEq<i64> for Json {
    fn eq(&self, other: &i64) -> bool {
        matches!(self.node(), Node::Number(n) if *n == *other as f64)
    }
}

impl PartialEq<i32> for Json {
    fn eq(&self, other: &i32) -> bool {
        matches!(self.node(), Node::Number(n) if *n == f64::from(*other))
    }
}

impl PartialEq<str> for Json {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Json {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl fmt::Debug for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::Absent(Absent::Free) => f.write_str("Absent"),
            Node::Absent(Absent::InObject { key, .. }) => write!(f, "Absent({key:?})"),
            Node::Absent(Absent::InArray { index, .. }) => write!(f, "Absent([{index}])"),
            _ => write!(f, "{self}"),
        }
    }
}
