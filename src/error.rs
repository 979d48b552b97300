use thiserror::Error;

use crate::element::Kind;

/// Hard failures of the expansion engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// A named type reappeared while walking its own ancestor chain.
    #[error("named type `{name}` is part of an inheritance cycle ({})", .chain.join(" -> "))]
    CyclicNamedType { name: String, chain: Vec<String> },
}

/// Failures turning wire-format JSON into an element tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("at {path}: expected an element object")]
    NotAnElement { path: String },
    #[error("at {path}: missing or empty `element` name")]
    MissingElementName { path: String },
    #[error("at {path}: `{field}` must be an object of elements")]
    MalformedProperties { path: String, field: &'static str },
    #[error("at {path}: content of `{type_name}` must be {expected}")]
    ContentMismatch {
        path: String,
        type_name: String,
        expected: &'static str,
    },
}

/// Failures navigating an element tree by path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("node at {path:?} has no parent")]
    MissingParent { path: Vec<usize> },
    #[error("no child {index} under {kind:?} node at {path:?}")]
    NoSuchChild { path: Vec<usize>, index: usize, kind: Kind },
}
