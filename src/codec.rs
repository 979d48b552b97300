//! Wire format of element trees.
//!
//! Every node is a JSON object:
//!
//! ```json
//! { "element": "member", "meta": {..}, "attributes": {..}, "content": .. }
//! ```
//!
//! `meta` and `attributes` are left out when empty. Scalar content is a JSON
//! scalar, Member content is `{"key": .., "value": ..}`, Array and Object
//! content is a JSON array of nodes.
//!
//! Built-in type names decide the kind when decoding. A user-declared name
//! takes the kind of its registered base (see [`Decoder`]) or, failing that,
//! one inferred from the content shape. An empty Object under a user-declared
//! name is written without `content`, the same shape a bare named-type
//! instance has, so it decodes back to an Object.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::element::{Content, Element, Kind, Member, Properties, names};
use crate::error::DecodeError;
use crate::registry::Registry;

const ELEMENT: &str = "element";
const META: &str = "meta";
const ATTRIBUTES: &str = "attributes";
const CONTENT: &str = "content";
const KEY: &str = "key";
const VALUE: &str = "value";

// ————————————————————————————————————————————————————————————————————————————
// ENCODE
// ————————————————————————————————————————————————————————————————————————————

pub fn to_json(element: &Element) -> Value {
    let mut node = Map::new();
    node.insert(ELEMENT.into(), Value::from(element.type_name()));
    if !element.meta.is_empty() {
        node.insert(META.into(), properties_to_json(&element.meta));
    }
    if !element.attributes.is_empty() {
        node.insert(ATTRIBUTES.into(), properties_to_json(&element.attributes));
    }
    if !is_bare_instance(element) {
        node.insert(CONTENT.into(), content_to_json(element.content()));
    }
    Value::Object(node)
}

/// Empty Object under a user-declared name.
fn is_bare_instance(element: &Element) -> bool {
    matches!(element.content(), Content::Object(items) if items.is_empty())
        && builtin_kind(element.type_name()).is_none()
}

fn properties_to_json(props: &Properties) -> Value {
    Value::Object(props.iter().map(|(k, v)| (k.clone(), to_json(v))).collect())
}

fn content_to_json(content: &Content) -> Value {
    match content {
        Content::Null => Value::Null,
        Content::Boolean(b) => Value::Bool(*b),
        Content::Number(n) => number_to_json(n.0),
        Content::String(s) => Value::from(s.as_str()),
        Content::Member(member) => {
            let mut o = json!({});
            if let Some(key) = member.key() {
                o[KEY] = to_json(key);
            }
            if let Some(value) = member.value() {
                o[VALUE] = to_json(value);
            }
            o
        }
        Content::Array(items) | Content::Object(items) => {
            Value::Array(items.iter().map(to_json).collect())
        }
    }
}

/// Integral values print without a fraction, except `-0.0` which keeps its
/// sign; non-finite values become null.
fn number_to_json(n: f64) -> Value {
    let negative_zero = n == 0.0 && n.is_sign_negative();
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 && !negative_zero {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DECODE
// ————————————————————————————————————————————————————————————————————————————

/// Decodes without registry knowledge; user-declared kinds come from the
/// content shape.
pub fn from_json(value: &Value) -> Result<Element, DecodeError> {
    Decoder::default().decode(value)
}

/// Decodes with the kinds of user-declared names taken from `registry`.
pub fn from_json_in(value: &Value, registry: &Registry) -> Result<Element, DecodeError> {
    Decoder::with_registry(registry).decode(value)
}

/// Kind implied by a built-in type name.
pub fn builtin_kind(type_name: &str) -> Option<Kind> {
    Some(match type_name {
        names::NULL => Kind::Null,
        names::BOOLEAN => Kind::Boolean,
        names::NUMBER => Kind::Number,
        names::STRING => Kind::String,
        names::MEMBER => Kind::Member,
        names::ARRAY | names::ENUM | names::SELECT | names::OPTION => Kind::Array,
        names::OBJECT | names::REF | names::EXTEND | names::GENERIC => Kind::Object,
        _ => return None,
    })
}

/// Wire-format decoder.
///
/// A user-declared type name takes the kind of the built-in base at the end
/// of its registered lineage. Names the registry cannot resolve fall back to
/// the content shape:
///
/// - absent or `null` content is an empty Object
/// - `{key, value}` is a Member
/// - a non-empty array is an Object when every entry is a Member or an
///   object entry (`ref`, `extend`, `select`, `option`), an Array otherwise
/// - an empty array is an Array
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder<'r> {
    registry: Option<&'r Registry>,
}

impl<'r> Decoder<'r> {
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self { registry: Some(registry) }
    }

    pub fn decode(&self, value: &Value) -> Result<Element, DecodeError> {
        self.decode_at(value, "")
    }

    /// Kind fixed by the type name, either built in or through the registry.
    pub fn declared_kind(&self, type_name: &str) -> Option<Kind> {
        if let Some(kind) = builtin_kind(type_name) {
            return Some(kind);
        }
        let lineage = self.registry?.lineage(type_name).ok()?;
        let (_, base) = lineage.last()?;
        builtin_kind(base.type_name())
    }

    fn decode_at(&self, value: &Value, path: &str) -> Result<Element, DecodeError> {
        let Value::Object(node) = value else {
            return Err(DecodeError::NotAnElement { path: display_path(path) });
        };
        let type_name = node
            .get(ELEMENT)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DecodeError::MissingElementName { path: display_path(path) })?;

        let content_path = format!("{path}/{CONTENT}");
        let content = match (self.declared_kind(type_name), node.get(CONTENT)) {
            (Some(kind), None) => kind.empty_content(),
            (Some(kind), Some(json)) => self.decode_content(kind, type_name, json, &content_path)?,
            (None, None) => Content::Object(Vec::new()),
            (None, Some(json)) => self.infer_content(json, &content_path)?,
        };

        let mut element = Element::new(content).with_type_name(type_name);
        element.meta = self.decode_properties(node.get(META), META, path)?;
        element.attributes = self.decode_properties(node.get(ATTRIBUTES), ATTRIBUTES, path)?;
        Ok(element)
    }

    fn decode_properties(
        &self,
        json: Option<&Value>,
        field: &'static str,
        path: &str,
    ) -> Result<Properties, DecodeError> {
        let Some(json) = json else {
            return Ok(Properties::new());
        };
        let Value::Object(map) = json else {
            return Err(DecodeError::MalformedProperties { path: display_path(path), field });
        };
        map.iter()
            .map(|(k, v)| self.decode_at(v, &format!("{path}/{field}/{k}")).map(|e| (k.clone(), e)))
            .collect()
    }

    fn decode_content(
        &self,
        kind: Kind,
        type_name: &str,
        json: &Value,
        path: &str,
    ) -> Result<Content, DecodeError> {
        let mismatch = |expected| DecodeError::ContentMismatch {
            path: display_path(path),
            type_name: type_name.to_owned(),
            expected,
        };
        Ok(match (kind, json) {
            (_, Value::Null) => kind.empty_content(),
            (Kind::Null, _) => return Err(mismatch("null")),
            (Kind::Boolean, Value::Bool(b)) => Content::Boolean(*b),
            (Kind::Boolean, _) => return Err(mismatch("a boolean")),
            (Kind::Number, Value::Number(n)) => Content::Number(n.as_f64().unwrap_or_default().into()),
            (Kind::Number, _) => return Err(mismatch("a number")),
            (Kind::String, Value::String(s)) => Content::String(s.clone()),
            (Kind::String, _) => return Err(mismatch("a string")),
            (Kind::Member, Value::Object(pair)) => Content::Member(self.decode_member(pair, path)?),
            (Kind::Member, _) => return Err(mismatch("a key/value object")),
            (Kind::Array, Value::Array(items)) => Content::Array(self.decode_items(items, path)?),
            (Kind::Object, Value::Array(items)) => Content::Object(self.decode_items(items, path)?),
            (Kind::Array | Kind::Object, _) => return Err(mismatch("an array of elements")),
        })
    }

    fn infer_content(&self, json: &Value, path: &str) -> Result<Content, DecodeError> {
        Ok(match json {
            Value::Null => Content::Object(Vec::new()),
            Value::Bool(b) => Content::Boolean(*b),
            Value::Number(n) => Content::Number(n.as_f64().unwrap_or_default().into()),
            Value::String(s) => Content::String(s.clone()),
            Value::Object(pair) => Content::Member(self.decode_member(pair, path)?),
            Value::Array(items) => {
                let items = self.decode_items(items, path)?;
                if !items.is_empty() && items.iter().all(is_object_entry) {
                    Content::Object(items)
                } else {
                    Content::Array(items)
                }
            }
        })
    }

    fn decode_member(&self, pair: &Map<String, Value>, path: &str) -> Result<Member, DecodeError> {
        let key = pair
            .get(KEY)
            .map(|k| self.decode_at(k, &format!("{path}/{KEY}")))
            .transpose()?;
        let value = pair
            .get(VALUE)
            .map(|v| self.decode_at(v, &format!("{path}/{VALUE}")))
            .transpose()?;
        Ok(Member::new(key, value))
    }

    fn decode_items(&self, items: &[Value], path: &str) -> Result<Vec<Element>, DecodeError> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.decode_at(item, &format!("{path}/{i}")))
            .collect()
    }
}

/// Entries that only appear inside object content.
fn is_object_entry(item: &Element) -> bool {
    matches!(item.kind(), Kind::Member)
        || matches!(
            item.type_name(),
            names::REF | names::EXTEND | names::SELECT | names::OPTION
        )
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "/".to_owned() } else { path.to_owned() }
}

// ————————————————————————————————————————————————————————————————————————————
// SERDE
// ————————————————————————————————————————————————————————————————————————————

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        from_json(&value).map_err(serde::de::Error::custom)
    }
}

// ------------------------------- Tests ------------------------------------ //
