//! Parent-aware navigation over an element tree.
//!
//! Elements own their children and never point back at their parent. A
//! [`Cursor`] keeps the chain of ancestors it walked through instead, so asking
//! for the parent is a lookup that fails cleanly at the root.
//!
//! Child slots: a Member's key is slot 0 and its value slot 1; Array and
//! Object items are numbered in order. Scalars have no children.

use crate::element::{Content, Element};
use crate::error::NavigationError;

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    ancestors: Vec<(&'a Element, usize)>,
    node: &'a Element,
}

/// Child of `element` at `index`, if that slot is filled.
pub fn child(element: &Element, index: usize) -> Option<&Element> {
    match element.content() {
        Content::Member(member) => match index {
            0 => member.key(),
            1 => member.value(),
            _ => None,
        },
        Content::Array(items) | Content::Object(items) => items.get(index),
        Content::Null | Content::Boolean(_) | Content::Number(_) | Content::String(_) => None,
    }
}

/// Node reached from `root` by following `path`.
pub fn node_at<'a>(root: &'a Element, path: &[usize]) -> Result<&'a Element, NavigationError> {
    let mut cursor = Cursor::new(root);
    for &index in path {
        cursor = cursor.child(index)?;
    }
    Ok(cursor.node())
}

/// Parent of the node at `path`. The root has none.
pub fn parent_of<'a>(root: &'a Element, path: &[usize]) -> Result<&'a Element, NavigationError> {
    let Some((_, parent_path)) = path.split_last() else {
        return Err(NavigationError::MissingParent { path: Vec::new() });
    };
    node_at(root, parent_path)
}

impl<'a> Cursor<'a> {
    pub fn new(root: &'a Element) -> Self {
        Self { ancestors: Vec::new(), node: root }
    }

    pub fn node(&self) -> &'a Element {
        self.node
    }

    /// Slot indices from the root down to this node.
    pub fn path(&self) -> Vec<usize> {
        self.ancestors.iter().map(|(_, index)| *index).collect()
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    pub fn has_parent(&self) -> bool {
        !self.ancestors.is_empty()
    }

    pub fn child(mut self, index: usize) -> Result<Self, NavigationError> {
        let Some(next) = child(self.node, index) else {
            return Err(NavigationError::NoSuchChild {
                path: self.path(),
                index,
                kind: self.node.kind(),
            });
        };
        self.ancestors.push((self.node, index));
        self.node = next;
        Ok(self)
    }

    pub fn parent(mut self) -> Result<Self, NavigationError> {
        let path = self.path();
        let Some((parent, _)) = self.ancestors.pop() else {
            return Err(NavigationError::MissingParent { path });
        };
        self.node = parent;
        Ok(self)
    }
}

// ------------------------------- Tests ------------------------------------ //
