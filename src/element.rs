//! Element value model.
//!
//! An element is a tagged value: a type name, `meta` and `attributes` maps and
//! kind-specific content. The kind set is closed; everything downstream
//! dispatches on [`Content`] with exhaustive matches.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

/// Key → owned element map used for both `meta` and `attributes`.
pub type Properties = IndexMap<String, Element>;

/// Well-known type names.
pub mod names {
    pub const NULL: &str = "null";
    pub const BOOLEAN: &str = "boolean";
    pub const NUMBER: &str = "number";
    pub const STRING: &str = "string";
    pub const MEMBER: &str = "member";
    pub const ARRAY: &str = "array";
    pub const ENUM: &str = "enum";
    pub const OBJECT: &str = "object";
    pub const REF: &str = "ref";
    pub const SELECT: &str = "select";
    pub const OPTION: &str = "option";
    pub const EXTEND: &str = "extend";
    pub const GENERIC: &str = "generic";
    /// Not reserved; produced around attribute sections.
    pub const DATA_STRUCTURE: &str = "dataStructure";
}

/// Well-known `meta` keys.
pub mod meta {
    pub const ID: &str = "id";
    pub const REF: &str = "ref";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const CLASSES: &str = "classes";
}

/// Well-known `attributes` keys.
pub mod attributes {
    pub const DEFAULT: &str = "default";
    pub const SAMPLES: &str = "samples";
    pub const TYPE_ATTRIBUTES: &str = "typeAttributes";
    pub const CONTENT_TYPE: &str = "contentType";
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Member,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Null,
    Boolean(bool),
    Number(OrderedFloat<f64>),
    String(String),
    Member(Member),
    Array(Vec<Element>),
    Object(Vec<Element>),
}

/// Key/value pair; either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Member {
    key: Option<Box<Element>>,
    value: Option<Box<Element>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    type_name: String,
    pub meta: Properties,
    pub attributes: Properties,
    content: Content,
}

/// Selects what a deep copy carries over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneFlags {
    pub include_value: bool,
    pub include_meta_id: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Kind {
    /// Built-in type name an element of this kind starts out with.
    pub fn type_name(self) -> &'static str {
        match self {
            Kind::Null => names::NULL,
            Kind::Boolean => names::BOOLEAN,
            Kind::Number => names::NUMBER,
            Kind::String => names::STRING,
            Kind::Member => names::MEMBER,
            Kind::Array => names::ARRAY,
            Kind::Object => names::OBJECT,
        }
    }

    /// Content of this kind carrying no value.
    pub fn empty_content(self) -> Content {
        match self {
            Kind::Null => Content::Null,
            Kind::Boolean => Content::Boolean(false),
            Kind::Number => Content::Number(OrderedFloat(0.0)),
            Kind::String => Content::String(String::new()),
            Kind::Member => Content::Member(Member::default()),
            Kind::Array => Content::Array(Vec::new()),
            Kind::Object => Content::Object(Vec::new()),
        }
    }
}

impl Content {
    pub fn kind(&self) -> Kind {
        match self {
            Content::Null => Kind::Null,
            Content::Boolean(_) => Kind::Boolean,
            Content::Number(_) => Kind::Number,
            Content::String(_) => Kind::String,
            Content::Member(_) => Kind::Member,
            Content::Array(_) => Kind::Array,
            Content::Object(_) => Kind::Object,
        }
    }
}

impl Member {
    pub fn new(key: Option<Element>, value: Option<Element>) -> Self {
        Self { key: key.map(Box::new), value: value.map(Box::new) }
    }
    pub fn key(&self) -> Option<&Element> {
        self.key.as_deref()
    }
    pub fn value(&self) -> Option<&Element> {
        self.value.as_deref()
    }
}

impl CloneFlags {
    pub const ALL: Self = Self { include_value: true, include_meta_id: true };
    pub const NO_VALUE: Self = Self { include_value: false, include_meta_id: true };
    pub const NO_META_ID: Self = Self { include_value: true, include_meta_id: false };
}

impl Default for CloneFlags {
    fn default() -> Self {
        Self::ALL
    }
}

impl Element {
    /// New element typed with its kind's built-in name.
    pub fn new(content: Content) -> Self {
        Self {
            type_name: content.kind().type_name().to_owned(),
            meta: Properties::new(),
            attributes: Properties::new(),
            content,
        }
    }

    pub fn null() -> Self {
        Self::new(Content::Null)
    }
    pub fn boolean(value: bool) -> Self {
        Self::new(Content::Boolean(value))
    }
    pub fn number(value: f64) -> Self {
        Self::new(Content::Number(OrderedFloat(value)))
    }
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Content::String(value.into()))
    }
    pub fn member(key: impl Into<Element>, value: impl Into<Element>) -> Self {
        Self::new(Content::Member(Member::new(Some(key.into()), Some(value.into()))))
    }
    pub fn array(items: Vec<Element>) -> Self {
        Self::new(Content::Array(items))
    }
    pub fn object(items: Vec<Element>) -> Self {
        Self::new(Content::Object(items))
    }

    /// Builder-style type name override.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Element>) -> Self {
        self.set_meta(key, value);
        self
    }
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Element>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
    }
    pub fn kind(&self) -> Kind {
        self.content.kind()
    }
    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn meta(&self, key: &str) -> Option<&Element> {
        self.meta.get(key)
    }
    /// Last write wins.
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<Element>) {
        self.meta.insert(key.into(), value.into());
    }
    pub fn attribute(&self, key: &str) -> Option<&Element> {
        self.attributes.get(key)
    }
    /// Last write wins.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Element>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Ordered content of an Array or Object; empty for every other kind.
    pub fn items(&self) -> &[Element] {
        match &self.content {
            Content::Array(items) | Content::Object(items) => items,
            _ => &[],
        }
    }

    /// Appends to an Array or Object. Returns `false` (and drops `item`) for
    /// any other kind.
    pub fn push(&mut self, item: Element) -> bool {
        match &mut self.content {
            Content::Array(items) | Content::Object(items) => {
                items.push(item);
                true
            }
            _ => false,
        }
    }

    /// Replaces the sequence of an Array or Object. Returns `false` for any
    /// other kind.
    pub fn set_items(&mut self, new_items: Vec<Element>) -> bool {
        match &mut self.content {
            Content::Array(items) | Content::Object(items) => {
                *items = new_items;
                true
            }
            _ => false,
        }
    }

    /// Replaces both sides of a Member. Returns `false` for any other kind.
    pub fn set_member(&mut self, key: Option<Element>, value: Option<Element>) -> bool {
        match &mut self.content {
            Content::Member(member) => {
                *member = Member::new(key, value);
                true
            }
            _ => false,
        }
    }

    /// True when the content carries nothing: null, an empty string, an empty
    /// sequence, or a member with neither side set.
    pub fn is_empty(&self) -> bool {
        match &self.content {
            Content::Null => true,
            Content::Boolean(_) | Content::Number(_) => false,
            Content::String(s) => s.is_empty(),
            Content::Member(member) => member.key.is_none() && member.value.is_none(),
            Content::Array(items) | Content::Object(items) => items.is_empty(),
        }
    }

    /// Deep copy honoring `flags`.
    ///
    /// Without `include_value` the copy keeps kind, type name, meta and
    /// attributes but gets empty content of the same kind. Without
    /// `include_meta_id` the top-level `id` meta entry is left out.
    pub fn clone_with(&self, flags: CloneFlags) -> Element {
        let mut meta = self.meta.clone();
        if !flags.include_meta_id {
            meta.shift_remove(self::meta::ID);
        }
        let content = if flags.include_value {
            self.content.clone()
        } else {
            self.kind().empty_content()
        };
        Element {
            type_name: self.type_name.clone(),
            meta,
            attributes: self.attributes.clone(),
            content,
        }
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::boolean(value)
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::number(value)
    }
}

/// Numbers are `f64`; integers beyond ±2^53 round to the nearest
/// representable value.
impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Element::number(value as f64)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::string(value)
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::string(value)
    }
}

// ------------------------------- Tests ------------------------------------ //
