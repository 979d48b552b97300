//! Small structural queries over element trees.

use crate::element::{Content, Element, Member, names};
use crate::registry::is_reserved;

/// True when `element`, or anything below it, needs expansion: an Object
/// typed with a user-declared name, a `ref` Object, or a Member/Array/Object
/// transitively holding one. Scalars never expand.
pub fn is_expandable(element: &Element) -> bool {
    match element.content() {
        Content::Null | Content::Boolean(_) | Content::Number(_) | Content::String(_) => false,
        Content::Member(member) => {
            member.key().is_some_and(is_expandable) || member.value().is_some_and(is_expandable)
        }
        Content::Array(items) => items.iter().any(is_expandable),
        Content::Object(items) => {
            let type_name = element.type_name();
            !is_reserved(type_name) || type_name == names::REF || items.iter().any(is_expandable)
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// COMPARISON
// ————————————————————————————————————————————————————————————————————————————

/// Which side of a Member to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Key,
    Value,
}

/// Tests whether an element, read as a Member, has a string key (or value)
/// equal to a target. Non-members never match.
#[derive(Debug, Clone, Copy)]
pub struct Comparable<'a> {
    target: &'a str,
    side: Side,
}

impl<'a> Comparable<'a> {
    pub fn key(target: &'a str) -> Self {
        Self { target, side: Side::Key }
    }
    pub fn value(target: &'a str) -> Self {
        Self { target, side: Side::Value }
    }

    pub fn matches(&self, element: &Element) -> bool {
        let Some(member) = element.as_member() else {
            return false;
        };
        let side = match self.side {
            Side::Key => member.key(),
            Side::Value => member.value(),
        };
        side.and_then(TypeQuery::as_string) == Some(self.target)
    }
}

/// Value of the first member in `items` whose key equals `key`.
pub fn find_member_by_key<'e>(items: &'e [Element], key: &str) -> Option<&'e Element> {
    let cmp = Comparable::key(key);
    items
        .iter()
        .find(|item| cmp.matches(item))
        .and_then(|item| item.as_member())
        .and_then(Member::value)
}

// ————————————————————————————————————————————————————————————————————————————
// NARROWING
// ————————————————————————————————————————————————————————————————————————————

/// Narrows an element to one kind's payload; `None` on any other kind.
pub trait TypeQuery {
    fn as_boolean(&self) -> Option<bool>;
    fn as_number(&self) -> Option<f64>;
    fn as_string(&self) -> Option<&str>;
    fn as_member(&self) -> Option<&Member>;
    fn as_array(&self) -> Option<&[Element]>;
    fn as_object(&self) -> Option<&[Element]>;
}

impl TypeQuery for Element {
    fn as_boolean(&self) -> Option<bool> {
        match self.content() {
            Content::Boolean(b) => Some(*b),
            _ => None,
        }
    }
    fn as_number(&self) -> Option<f64> {
        match self.content() {
            Content::Number(n) => Some(n.0),
            _ => None,
        }
    }
    fn as_string(&self) -> Option<&str> {
        match self.content() {
            Content::String(s) => Some(s),
            _ => None,
        }
    }
    fn as_member(&self) -> Option<&Member> {
        match self.content() {
            Content::Member(m) => Some(m),
            _ => None,
        }
    }
    fn as_array(&self) -> Option<&[Element]> {
        match self.content() {
            Content::Array(items) => Some(items),
            _ => None,
        }
    }
    fn as_object(&self) -> Option<&[Element]> {
        match self.content() {
            Content::Object(items) => Some(items),
            _ => None,
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
