use refract_expand::codec::from_json_in;
use refract_expand::{Element, Registry};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize with JSON-path context in error messages.
pub fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

/// A document holds either one element or a JSON array of elements.
pub fn elements_from_value(value: Value) -> Result<Vec<Element>, String> {
    match value {
        Value::Array(_) => from_value_with_path::<Vec<Element>>(value),
        other => from_value_with_path::<Element>(other).map(|e| vec![e]),
    }
}

/// Like [`elements_from_value`], with user-declared kinds resolved through
/// `registry`.
pub fn elements_from_value_in(value: &Value, registry: &Registry) -> Result<Vec<Element>, String> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                from_json_in(item, registry).map_err(|err| format!("at JSON path [{i}] → {err}"))
            })
            .collect(),
        other => from_json_in(other, registry)
            .map(|e| vec![e])
            .map_err(|err| format!("at JSON path . → {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_and_many() {
        let one = elements_from_value(json!({ "element": "string", "content": "a" })).unwrap();
        assert_eq!(one, vec![Element::string("a")]);

        let many = elements_from_value(json!([
            { "element": "string", "content": "a" },
            { "element": "number", "content": 1 }
        ]))
        .unwrap();
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn errors_name_the_failing_entry() {
        let err = elements_from_value(json!([
            { "element": "string", "content": "a" },
            { "content": 1 }
        ]))
        .unwrap_err();
        assert!(err.contains("[1]"), "{err}");
        assert!(err.contains("missing or empty `element` name"), "{err}");
    }

    #[test]
    fn registry_resolves_document_kinds() {
        let mut registry = Registry::new();
        registry.add(Element::array(vec![]).with_meta("id", "Tags"));
        let doc = json!([
            { "element": "Tags", "content": [] },
            { "element": "Point", "content": [] }
        ]);
        let elements = elements_from_value_in(&doc, &registry).unwrap();
        assert_eq!(elements[0], Element::array(vec![]).with_type_name("Tags"));
        // unresolved names fall back to the content shape
        assert_eq!(elements[1], Element::array(vec![]).with_type_name("Point"));

        let err = elements_from_value_in(&json!([{ "element": "Tags", "content": 1 }]), &registry).unwrap_err();
        assert!(err.contains("[0]"), "{err}");
    }
}
