//! Named-type registry.
//!
//! Filled once per document during registration, then only read while
//! expanding. Callers own the registry and pass it by reference; `reset`
//! clears it between unrelated documents.
//!
//! A definition is stored under its declared name (the `id` meta). Its own
//! type name is the base it inherits from, e.g. `Point` declared as an
//! `object` is stored under `"Point"` with type name `"object"`.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::element::{Content, Element, meta, names};
use crate::error::ExpandError;

/// Built-in type names. These never expand as inheritance.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    names::NULL,
    names::BOOLEAN,
    names::NUMBER,
    names::STRING,
    names::MEMBER,
    names::ARRAY,
    names::ENUM,
    names::OBJECT,
    names::REF,
    names::SELECT,
    names::OPTION,
    names::EXTEND,
    names::GENERIC,
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name)
}

/// Name a definition declares through its `id` meta, if it is a non-empty
/// string.
pub fn declared_name(element: &Element) -> Option<&str> {
    match element.meta(meta::ID)?.content() {
        Content::String(name) if !name.is_empty() => Some(name),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: IndexMap<String, Element>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `element` under its declared name, replacing any earlier
    /// definition. Elements without a name, or with an empty type name, are
    /// not stored; returns whether the element was kept.
    pub fn add(&mut self, element: Element) -> bool {
        let Some(name) = declared_name(&element) else {
            debug!(type_name = element.type_name(), "skipping named type without a name");
            return false;
        };
        let name = name.to_owned();
        self.define(name, element)
    }

    /// Stores `element` under an explicit name.
    pub fn define(&mut self, name: impl Into<String>, element: Element) -> bool {
        let name = name.into();
        if name.is_empty() || element.type_name().is_empty() {
            debug!("skipping named type with empty name");
            return false;
        }
        if self.types.insert(name.clone(), element).is_some() {
            debug!(name = %name, "named type redefined");
        } else {
            debug!(name = %name, "named type registered");
        }
        true
    }

    pub fn find(&self, name: &str) -> Option<&Element> {
        self.types.get(name)
    }

    pub fn is_reserved(name: &str) -> bool {
        is_reserved(name)
    }

    /// Registers every candidate, skipping unnamed ones. Returns how many
    /// were stored.
    pub fn register_named_types<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = Element>,
    {
        candidates
            .into_iter()
            .map(|candidate| self.add(candidate))
            .filter(|stored| *stored)
            .count()
    }

    /// Drops every definition.
    pub fn reset(&mut self) {
        self.types.clear();
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Walks the inheritance chain starting at `name`: the definition of
    /// `name`, then the definition of its type name, and so on. Stops at a
    /// reserved or unregistered name. Most specific definition comes first.
    pub fn lineage(&self, name: &str) -> Result<Vec<(&str, &Element)>, ExpandError> {
        let mut chain = Vec::new();
        let mut visited = IndexSet::<&str>::new();
        let mut current = name;

        while !is_reserved(current) {
            let Some((found, definition)) = self.types.get_key_value(current) else {
                break;
            };
            if !visited.insert(found.as_str()) {
                return Err(ExpandError::CyclicNamedType {
                    name: found.clone(),
                    chain: visited.iter().map(|n| n.to_string()).collect(),
                });
            }
            chain.push((found.as_str(), definition));
            current = definition.type_name();
        }

        Ok(chain)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, base: &str) -> Element {
        Element::object(vec![Element::member(name.to_lowercase(), "v")])
            .with_type_name(base)
            .with_meta(meta::ID, name)
    }

    #[test]
    fn reserved_names_are_the_closed_builtin_set() {
        for name in ["null", "boolean", "number", "string", "member", "array", "enum",
                     "object", "ref", "select", "option", "extend", "generic"] {
            assert!(is_reserved(name), "{name} should be reserved");
        }
        assert!(!is_reserved("Point"));
        assert!(!is_reserved("dataStructure"));
        assert!(!is_reserved(""));
    }

    #[test]
    fn unnamed_candidates_are_not_stored() {
        let mut registry = Registry::new();
        assert!(!registry.add(Element::object(vec![])));
        assert!(!registry.add(Element::object(vec![]).with_meta(meta::ID, "")));
        assert!(!registry.add(Element::object(vec![]).with_meta(meta::ID, 1.0)));
        assert!(!registry.define("Foo", Element::object(vec![]).with_type_name("")));
        assert!(!registry.define("", Element::object(vec![])));
        assert!(registry.is_empty());
    }

    #[test]
    fn later_definition_overwrites_earlier() {
        let mut registry = Registry::new();
        assert!(registry.add(named("Foo", "object").with_meta("title", "first")));
        assert!(registry.add(named("Foo", "object").with_meta("title", "second")));
        assert_eq!(registry.len(), 1);
        let found = registry.find("Foo").expect("Foo registered");
        assert_eq!(found.meta("title"), Some(&Element::string("second")));
    }

    #[test]
    fn bulk_registration_skips_unnamed() {
        let mut registry = Registry::new();
        let stored = registry.register_named_types(vec![
            named("A", "object"),
            Element::object(vec![]),
            named("B", "A"),
            Element::object(vec![]).with_type_name("").with_meta(meta::ID, "C"),
        ]);
        assert_eq!(stored, 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn reset_clears_between_documents() {
        let mut registry = Registry::new();
        registry.add(named("A", "object"));
        registry.reset();
        assert!(registry.find("A").is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn lineage_walks_until_reserved_base() {
        let mut registry = Registry::new();
        registry.add(named("A", "B"));
        registry.add(named("B", "object"));

        let chain = registry.lineage("A").unwrap();
        let names = chain.iter().map(|(n, _)| *n).collect::<Vec<_>>();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(chain[1].1.type_name(), "object");
    }

    #[test]
    fn lineage_stops_at_unregistered_name() {
        let mut registry = Registry::new();
        registry.add(named("A", "Missing"));
        assert_eq!(registry.lineage("A").unwrap().len(), 1);
        assert!(registry.lineage("Missing").unwrap().is_empty());
        assert!(registry.lineage("string").unwrap().is_empty());
    }

    #[test]
    fn lineage_reports_cycles() {
        let mut registry = Registry::new();
        registry.add(named("A", "B"));
        registry.add(named("B", "A"));

        let err = registry.lineage("A").unwrap_err();
        assert_eq!(err, ExpandError::CyclicNamedType {
            name: "A".into(),
            chain: vec!["A".into(), "B".into()],
        });
    }
}
