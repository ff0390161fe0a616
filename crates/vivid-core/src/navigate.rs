//! Path navigation and auto-vivification.
//!
//! Reads never fail: looking up a key or index that does not exist, or looking
//! anything up on a scalar, yields an absent value that can be navigated
//! further. `doc.get("a").get("b").at(3)` is always fine.
//!
//! Writes through an absent value materialize the missing path. Each absent
//! link becomes an empty object (for key writes) or array (for index writes),
//! attached to its parent before the write lands in it:
//!
//! ```
//! let doc = vivid_core::parse("{}").unwrap();
//! doc.get("a").get("b").at(2).set("c", 1).unwrap();
//! assert_eq!(doc.to_compact_string(), r#"{"a":{"b":[null,null,{"c":1}]}}"#);
//! ```
//!
//! Writing into a defined value of the wrong kind is a usage error and is
//! never auto-vivified. The whole chain is checked, and room for any padded
//! index reserved, before the first container is attached, so a failing chain
//! leaves the document untouched.

use crate::error::{JsonError, Result};
use crate::value::{Absent, Json, Kind, Node};

const NOT_AN_OBJECT: &str =
    "attempting to update a dictionary key on something that is not a dictionary";
const NOT_AN_ARRAY: &str = "attempting to update an array index on something that is not an array";

/// Map a possibly negative index onto `0..len` the way reads and writes see it.
///
/// Non-negative indices pass through unchanged (and may be out of bounds).
/// Negative indices wrap modulo `len`, so `-1` is the last element and `-len`
/// the first; on an empty array every negative index becomes 0.
pub fn normalize_index(index: i64, len: usize) -> usize {
    if index >= 0 {
        usize::try_from(index).unwrap_or(usize::MAX)
    } else if len == 0 {
        0
    } else {
        // rem_euclid of a positive modulus is in 0..len.
        index.rem_euclid(len as i64) as usize
    }
}

impl Json {
    /// Value stored under `key`, or an absent value remembering this node and
    /// `key`.
    pub fn get(&self, key: &str) -> Json {
        if let Some(map) = self.object_ref() {
            if let Some(value) = map.get(key) {
                return value.clone();
            }
        }
        Json::absent_in_object(self, key)
    }

    /// Element at `index` (negative counts from the end), or an absent value
    /// remembering this node and the normalized index.
    pub fn at(&self, index: i64) -> Json {
        match self.array_ref() {
            Some(items) => {
                let slot = normalize_index(index, items.len());
                match items.get(slot) {
                    Some(value) => value.clone(),
                    None => Json::absent_in_array(self, slot),
                }
            }
            None => Json::absent_in_array(self, normalize_index(index, 0)),
        }
    }

    /// Follow a sequence of keys and indices.
    pub fn path<'a, I>(&self, steps: I) -> Json
    where
        I: IntoIterator<Item = Step<'a>>,
    {
        steps
            .into_iter()
            .fold(self.clone(), |node, step| match step {
                Step::Key(key) => node.get(key),
                Step::Index(index) => node.at(index),
            })
    }

    /// Insert or replace `key`. Returns the object written into: `self`, or
    /// the object materialized when `self` is absent.
    ///
    /// An absent `self` whose slot has since been filled with a value of
    /// another kind is a usage error; the value in the slot is kept.
    pub fn set(&self, key: &str, value: impl Into<Json>) -> Result<Json> {
        let value = value.into();
        let target = self.plan_write(Kind::Object)?.commit()?;
        match target.object_mut() {
            Some(mut map) => {
                map.insert(key.to_string(), value);
            }
            None => return Err(JsonError::usage(NOT_AN_OBJECT)),
        }
        Ok(target)
    }

    /// Write at `index` (negative counts from the end). Indices past the end
    /// pad the array with nulls. Returns the array written into.
    ///
    /// An index too large to allocate is a usage error.
    pub fn set_at(&self, index: i64, value: impl Into<Json>) -> Result<Json> {
        let plan = self.plan_write(Kind::Array)?;
        let slot = normalize_index(index, plan.target().len());
        reserve_slot(plan.target(), slot)?;
        let target = plan.commit()?;
        match target.array_mut() {
            Some(mut items) => store(&mut items, slot, value.into()),
            None => return Err(JsonError::usage(NOT_AN_ARRAY)),
        }
        Ok(target)
    }

    /// Append to an array. Returns the array written into.
    pub fn push(&self, value: impl Into<Json>) -> Result<Json> {
        let value = value.into();
        let target = self.plan_write(Kind::Array)?.commit()?;
        match target.array_mut() {
            Some(mut items) => items.push(value),
            None => return Err(JsonError::usage(NOT_AN_ARRAY)),
        }
        Ok(target)
    }

    /// Work out the container a write of the given kind lands in, without
    /// touching the document.
    fn plan_write(&self, kind: Kind) -> Result<Plan> {
        match self.node() {
            Node::Absent(absent) => plan(absent, kind),
            _ if self.kind() == kind => Ok(Plan::Ready(self.clone())),
            _ => Err(mismatch(kind)),
        }
    }
}

/// One step of a [`Json::path`] walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    Key(&'a str),
    Index(i64),
}

impl<'a> From<&'a str> for Step<'a> {
    fn from(key: &'a str) -> Self {
        Step::Key(key)
    }
}

impl From<i64> for Step<'_> {
    fn from(index: i64) -> Self {
        Step::Index(index)
    }
}

impl From<i32> for Step<'_> {
    fn from(index: i32) -> Self {
        Step::Index(i64::from(index))
    }
}

/// How to reach the container a write lands in.
enum Plan {
    /// A container already in the document (or a freestanding one).
    Ready(Json),
    /// A fresh container still to be attached at `slot` of the planned parent.
    Attach {
        container: Json,
        parent: Box<Plan>,
        slot: Slot,
    },
}

enum Slot {
    Key(String),
    Index(usize),
}

impl Plan {
    fn target(&self) -> &Json {
        match self {
            Plan::Ready(container) | Plan::Attach { container, .. } => container,
        }
    }

    /// Attach every planned container, outermost first. Capacity for index
    /// slots was reserved while planning, so nothing here allocates a slot.
    fn commit(self) -> Result<Json> {
        let (container, parent, slot) = match self {
            Plan::Ready(container) => return Ok(container),
            Plan::Attach {
                container,
                parent,
                slot,
            } => (container, parent, slot),
        };
        let parent = parent.commit()?;
        let kind = container.kind();
        match slot {
            Slot::Key(key) => {
                let Some(mut map) = parent.object_mut() else {
                    return Err(JsonError::usage(NOT_AN_OBJECT));
                };
                tracing::trace!(%kind, key = %key, "materialized missing container");
                map.insert(key, container.clone());
            }
            Slot::Index(index) => {
                let Some(mut items) = parent.array_mut() else {
                    return Err(JsonError::usage(NOT_AN_ARRAY));
                };
                store(&mut items, index, container.clone());
                tracing::trace!(%kind, index, "materialized missing container");
            }
        }
        Ok(container)
    }
}

/// Replace in place, append, or pad with nulls and append.
fn store(items: &mut Vec<Json>, slot: usize, value: Json) {
    if slot < items.len() {
        items[slot] = value;
    } else {
        items.resize_with(slot, Json::null);
        items.push(value);
    }
}

/// Make room for a write at `slot` of an array, so that [`store`] cannot
/// fail. Non-arrays are left alone.
fn reserve_slot(array: &Json, slot: usize) -> Result<()> {
    let Some(mut items) = array.array_mut() else {
        return Ok(());
    };
    if slot < items.len() {
        return Ok(());
    }
    let additional = (slot - items.len()).checked_add(1);
    match additional.map(|n| items.try_reserve(n)) {
        Some(Ok(())) => Ok(()),
        _ => Err(JsonError::usage(format!(
            "array index {slot} is too large to allocate"
        ))),
    }
}

fn mismatch(kind: Kind) -> JsonError {
    if kind == Kind::Object {
        JsonError::usage(NOT_AN_OBJECT)
    } else {
        JsonError::usage(NOT_AN_ARRAY)
    }
}

fn empty_container(kind: Kind) -> Json {
    if kind == Kind::Object {
        Json::object()
    } else {
        Json::array()
    }
}

/// Plan the container of `kind` at the slot an absent value stands for,
/// planning its parent first. A container of the right kind already in the
/// slot is reused; any other defined value there is a usage error.
fn plan(absent: &Absent, kind: Kind) -> Result<Plan> {
    let (parent, slot) = match absent {
        Absent::Free => return Ok(Plan::Ready(empty_container(kind))),
        Absent::InObject { parent, key } => {
            (parent.plan_write(Kind::Object)?, Slot::Key(key.clone()))
        }
        Absent::InArray { parent, index } => {
            (parent.plan_write(Kind::Array)?, Slot::Index(*index))
        }
    };
    let existing = match &slot {
        Slot::Key(key) => parent.target().get(key),
        Slot::Index(index) => parent
            .target()
            .array_ref()
            .and_then(|items| items.get(*index).cloned())
            .unwrap_or_else(Json::absent),
    };
    if existing.kind() == kind {
        return Ok(Plan::Ready(existing));
    }
    if existing.is_defined() {
        return Err(mismatch(kind));
    }
    if let Slot::Index(index) = &slot {
        reserve_slot(parent.target(), *index)?;
    }
    Ok(Plan::Attach {
        container: empty_container(kind),
        parent: Box::new(parent),
        slot,
    })
}

