//! Named-type and reference expansion.
//!
//! Expansion walks an element tree and replaces indirection with explicit
//! structure:
//! - an Object typed with a user-declared name becomes an `extend` wrapper
//!   holding its ancestor definitions (most specific first) followed by the
//!   instance's own members;
//! - a `ref` Object becomes the `extend` wrapper of the type its `href` names;
//! - any other Object or Member is rebuilt around its expanded children.
//!
//! The engine never mutates its input. [`Expander::expand`] returns `None` when
//! there was nothing to do; [`Expander::expand_or_clone`] always hands back an
//! owned tree.
//!
//! Missing definitions and malformed references degrade to empty structure.
//! They are also recorded as [`Diagnostic`]s so callers can report them.

use thiserror::Error;
use tracing::{debug, warn};

use crate::element::{CloneFlags, Content, Element, Kind, Member, meta, names};
use crate::error::ExpandError;
use crate::registry::{Registry, is_reserved};
use crate::visit::{TypeQuery, find_member_by_key, is_expandable};

const HREF: &str = "href";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Soft failure noticed while expanding. The output tree is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("named type `{name}` is not defined")]
    MissingRegistryEntry { name: String },
    #[error("reference has no `href` member")]
    MissingHref,
    #[error("reference `href` is a {found:?}, expected a string")]
    NonStringHref { found: Kind },
}

pub struct Expander<'r> {
    registry: &'r Registry,
    diagnostics: Vec<Diagnostic>,
}

// ————————————————————————————————————————————————————————————————————————————
// API
// ————————————————————————————————————————————————————————————————————————————

/// Expanded copy of `element`, or `None` when nothing in it expands.
pub fn expand(element: &Element, registry: &Registry) -> Result<Option<Element>, ExpandError> {
    Expander::new(registry).expand(element)
}

/// Expanded copy of `element`, falling back to a plain clone.
pub fn expand_or_clone(element: &Element, registry: &Registry) -> Result<Element, ExpandError> {
    Expander::new(registry).expand_or_clone(element)
}

/// Wraps `element` (expanded first when `expand` is set) in a
/// `dataStructure` Object.
pub fn data_structure(element: &Element, registry: &Registry, expand: bool) -> Result<Element, ExpandError> {
    Expander::new(registry).data_structure(element, expand)
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl<'r> Expander<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry, diagnostics: Vec::new() }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn expand(&mut self, element: &Element) -> Result<Option<Element>, ExpandError> {
        if !is_expandable(element) {
            return Ok(None);
        }
        match element.content() {
            Content::Null | Content::Boolean(_) | Content::Number(_) | Content::String(_) => Ok(None),
            // arrays pass through untouched, even when their items would expand
            Content::Array(_) => Ok(None),
            Content::Member(member) => self.expand_member(element, member).map(Some),
            Content::Object(items) => self.expand_object(element, items).map(Some),
        }
    }

    pub fn expand_or_clone(&mut self, element: &Element) -> Result<Element, ExpandError> {
        Ok(match self.expand(element)? {
            Some(expanded) => expanded,
            None => element.clone(),
        })
    }

    /// See [`data_structure`].
    pub fn data_structure(&mut self, element: &Element, expand: bool) -> Result<Element, ExpandError> {
        let inner = if expand {
            self.expand_or_clone(element)?
        } else {
            element.clone()
        };
        Ok(Element::object(vec![inner]).with_type_name(names::DATA_STRUCTURE))
    }

    fn expand_member(&mut self, element: &Element, member: &Member) -> Result<Element, ExpandError> {
        let key = member.key().map(|key| self.expand_or_clone(key)).transpose()?;
        let value = member.value().map(|value| self.expand_or_clone(value)).transpose()?;
        let mut expanded = element.clone_with(CloneFlags::NO_VALUE);
        expanded.set_member(key, value);
        Ok(expanded)
    }

    fn expand_object(&mut self, element: &Element, items: &[Element]) -> Result<Element, ExpandError> {
        let type_name = element.type_name();
        if !is_reserved(type_name) {
            self.expand_named_type(element, items)
        } else if type_name == names::REF {
            self.expand_reference(items)
        } else {
            self.expand_members(element, items)
        }
    }

    fn expand_named_type(&mut self, element: &Element, items: &[Element]) -> Result<Element, ExpandError> {
        let mut wrapper = self.named_type(element.type_name())?;
        copy_meta_id(&mut wrapper, element);

        let (members, _) = self.expand_or_clone_items(items)?;
        if !members.is_empty() {
            wrapper.push(Element::object(members));
        }
        Ok(wrapper)
    }

    fn expand_reference(&mut self, items: &[Element]) -> Result<Element, ExpandError> {
        let Some(href) = find_member_by_key(items, HREF) else {
            self.report(Diagnostic::MissingHref);
            return Ok(Element::object(Vec::new()));
        };
        match href.as_string() {
            Some(name) => self.named_type(name),
            None => {
                self.report(Diagnostic::NonStringHref { found: href.kind() });
                Ok(Element::object(Vec::new()))
            }
        }
    }

    fn expand_members(&mut self, element: &Element, items: &[Element]) -> Result<Element, ExpandError> {
        let (members, has_ref) = self.expand_or_clone_items(items)?;
        let mut expanded = element.clone_with(CloneFlags::NO_VALUE);
        expanded.set_items(members);

        if has_ref {
            // uniform envelope whenever a reference was resolved inside
            return Ok(Element::object(vec![expanded]).with_type_name(names::EXTEND));
        }
        Ok(expanded)
    }

    /// Expands or clones every item, noting whether any of them was a `ref`.
    fn expand_or_clone_items(&mut self, items: &[Element]) -> Result<(Vec<Element>, bool), ExpandError> {
        let mut has_ref = false;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            has_ref |= item.type_name() == names::REF;
            out.push(self.expand_or_clone(item)?);
        }
        Ok((out, has_ref))
    }

    /// `extend` wrapper holding the ancestor chain of `name`. Each ancestor is
    /// a copy of its definition without `id`, tagged with a `ref` meta naming
    /// it.
    fn named_type(&mut self, name: &str) -> Result<Element, ExpandError> {
        let registry = self.registry;
        let lineage = registry.lineage(name)?;
        if lineage.is_empty() && !is_reserved(name) {
            self.report(Diagnostic::MissingRegistryEntry { name: name.to_owned() });
        }

        let ancestors = lineage
            .into_iter()
            .map(|(found, definition)| {
                let mut ancestor = definition.clone_with(CloneFlags::NO_META_ID);
                ancestor.set_meta(meta::REF, found);
                ancestor
            })
            .collect::<Vec<_>>();
        debug!(name = %name, depth = ancestors.len(), "resolved named type");

        Ok(Element::object(ancestors).with_type_name(names::EXTEND))
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "expansion degraded");
        self.diagnostics.push(diagnostic);
    }
}

/// Copies a non-empty `id` meta from `src` onto `dst`.
fn copy_meta_id(dst: &mut Element, src: &Element) {
    if let Some(id) = src.meta(meta::ID).filter(|id| !id.is_empty()) {
        dst.set_meta(meta::ID, id.clone());
    }
}

// ------------------------------- Tests ------------------------------------ //
