//! Recursive search by key name or by predicate.
//!
//! Both searches walk the tree the same way. At every container the direct
//! children are tested first, in iteration order (ascending keys for objects,
//! index order for arrays); then the walk descends into each child container
//! in that same order. Shallow matches inside one container therefore come
//! before anything found below it.
//!
//! - A name search matches object entries whose key equals the name. Array
//!   elements have no key, so arrays only contribute through their children.
//! - A predicate search tests every value below the root, scalars and
//!   containers alike. The root itself is not a candidate.
//!
//! Results are produced lazily. Each container's children are snapshotted
//! when the walk reaches it, so mutating the tree mid-iteration cannot
//! panic, but the matches it yields afterwards are unspecified.

use crate::value::Json;

enum Matcher<'p> {
    Key(String),
    Predicate(Box<dyn Fn(&Json) -> bool + 'p>),
}

impl Matcher<'_> {
    fn matches(&self, key: Option<&str>, value: &Json) -> bool {
        match self {
            Matcher::Key(name) => key == Some(name.as_str()),
            Matcher::Predicate(predicate) => predicate(value),
        }
    }
}

#[derive(PartialEq)]
enum Phase {
    /// Testing the direct children.
    Direct,
    /// Descending into the child containers.
    Descend,
}

struct Frame {
    children: Vec<(Option<String>, Json)>,
    phase: Phase,
    cursor: usize,
}

impl Frame {
    fn new(container: &Json) -> Self {
        let children = if let Some(map) = container.object_ref() {
            map.iter()
                .map(|(key, value)| (Some(key.clone()), value.clone()))
                .collect()
        } else if let Some(items) = container.array_ref() {
            items.iter().map(|value| (None, value.clone())).collect()
        } else {
            Vec::new()
        };
        Self {
            children,
            phase: Phase::Direct,
            cursor: 0,
        }
    }
}

/// Lazy iterator over query matches. See the module docs for the order.
pub struct Matches<'p> {
    matcher: Matcher<'p>,
    stack: Vec<Frame>,
}

impl<'p> Matches<'p> {
    fn new(root: &Json, matcher: Matcher<'p>) -> Self {
        let stack = if root.is_container() {
            vec![Frame::new(root)]
        } else {
            Vec::new()
        };
        Self { matcher, stack }
    }
}

impl Iterator for Matches<'_> {
    type Item = Json;

    fn next(&mut self) -> Option<Json> {
        let Matches { matcher, stack } = self;
        loop {
            let frame = stack.last_mut()?;
            if frame.phase == Phase::Direct {
                while let Some((key, value)) = frame.children.get(frame.cursor) {
                    frame.cursor += 1;
                    if matcher.matches(key.as_deref(), value) {
                        return Some(value.clone());
                    }
                }
                frame.phase = Phase::Descend;
                frame.cursor = 0;
                continue;
            }

            let mut next_container = None;
            while let Some((_, value)) = frame.children.get(frame.cursor) {
                frame.cursor += 1;
                if value.is_container() {
                    next_container = Some(value.clone());
                    break;
                }
            }
            match next_container {
                Some(container) => stack.push(Frame::new(&container)),
                None => {
                    stack.pop();
                }
            }
        }
    }
}

impl Json {
    /// Every value stored under the key `name`, at any depth.
    pub fn find_all(&self, name: &str) -> Matches<'static> {
        Matches::new(self, Matcher::Key(name.to_string()))
    }

    /// First value stored under `name`, or an absent value.
    pub fn find(&self, name: &str) -> Json {
        self.find_all(name).next().unwrap_or_else(Json::absent)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.find(name).is_defined()
    }

    /// Every value below this one for which `predicate` holds.
    pub fn find_all_where<'p, F>(&self, predicate: F) -> Matches<'p>
    where
        F: Fn(&Json) -> bool + 'p,
    {
        Matches::new(self, Matcher::Predicate(Box::new(predicate)))
    }

    /// First value below this one for which `predicate` holds, or an absent value.
    pub fn find_where<F>(&self, predicate: F) -> Json
    where
        F: Fn(&Json) -> bool,
    {
        self.find_all_where(predicate)
            .next()
            .unwrap_or_else(Json::absent)
    }

    pub fn exists_where<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Json) -> bool,
    {
        self.find_where(predicate).is_defined()
    }
}
