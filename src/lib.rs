//! Element trees for API descriptions, with named-type and reference
//! expansion.
//!
//! Typical flow: register named-type definitions in a [`Registry`], then
//! expand element trees against it.
//!
//! ```
//! use refract_expand::{Element, Registry, expand_or_clone};
//!
//! let mut registry = Registry::new();
//! registry.add(
//!     Element::object(vec![Element::member("x", 0.0), Element::member("y", 0.0)])
//!         .with_meta("id", "Point"),
//! );
//!
//! let instance = Element::object(vec![Element::member("z", 0.0)]).with_type_name("Point");
//! let expanded = expand_or_clone(&instance, &registry).unwrap();
//! assert_eq!(expanded.type_name(), "extend");
//! assert_eq!(expanded.items().len(), 2);
//! ```
pub mod codec;
pub mod element;
pub mod error;
pub mod expand;
pub mod nav;
pub mod registry;
pub mod visit;

pub use element::{CloneFlags, Content, Element, Kind, Member, Properties};
pub use error::{DecodeError, ExpandError, NavigationError};
pub use expand::{Diagnostic, Expander, data_structure, expand, expand_or_clone};
pub use registry::{Registry, is_reserved};
pub use visit::TypeQuery;
