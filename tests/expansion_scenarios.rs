use refract_expand::codec::{from_json, from_json_in, to_json};
use refract_expand::element::meta;
use refract_expand::{Element, ExpandError, Expander, Kind, Registry, TypeQuery, expand, expand_or_clone};
use serde_json::{Value, json};

fn registry_from(definitions: Value) -> Registry {
    let mut registry = Registry::new();
    for definition in definitions.as_array().expect("array of definitions") {
        let element = from_json(definition).expect("valid definition");
        assert!(registry.add(element), "definition needs an id: {definition}");
    }
    registry
}

fn number_member(name: &str) -> Value {
    json!({
        "element": "member",
        "content": {
            "key": { "element": "string", "content": name },
            "value": { "element": "number" }
        }
    })
}

#[test]
fn point_with_extra_member() {
    let registry = registry_from(json!([
        {
            "element": "object",
            "meta": { "id": { "element": "string", "content": "Point" } },
            "content": [ number_member("x"), number_member("y") ]
        }
    ]));
    let input = from_json(&json!({
        "element": "Point",
        "content": [ number_member("z") ]
    }))
    .unwrap();

    let out = expand(&input, &registry).unwrap().expect("Point expands");
    assert_eq!(to_json(&out), json!({
        "element": "extend",
        "content": [
            {
                "element": "object",
                "meta": { "ref": { "element": "string", "content": "Point" } },
                "content": [
                    {
                        "element": "member",
                        "content": {
                            "key": { "element": "string", "content": "x" },
                            "value": { "element": "number", "content": 0 }
                        }
                    },
                    {
                        "element": "member",
                        "content": {
                            "key": { "element": "string", "content": "y" },
                            "value": { "element": "number", "content": 0 }
                        }
                    }
                ]
            },
            {
                "element": "object",
                "content": [
                    {
                        "element": "member",
                        "content": {
                            "key": { "element": "string", "content": "z" },
                            "value": { "element": "number", "content": 0 }
                        }
                    }
                ]
            }
        ]
    }));
}

#[test]
fn three_level_chain_orders_specific_to_general() {
    // A inherits B, B is a plain string type
    let registry = registry_from(json!([
        {
            "element": "B",
            "meta": { "id": { "element": "string", "content": "A" } },
            "content": [ number_member("a") ]
        },
        {
            "element": "string",
            "meta": { "id": { "element": "string", "content": "B" } },
            "content": "b"
        }
    ]));

    let bare = Element::object(vec![]).with_type_name("A");
    let out = expand(&bare, &registry).unwrap().expect("A expands");
    let refs = out
        .items()
        .iter()
        .map(|item| item.meta(meta::REF).and_then(TypeQuery::as_string))
        .collect::<Vec<_>>();
    assert_eq!(refs, vec![Some("A"), Some("B")]);

    let with_own = Element::object(vec![Element::member("own", true)]).with_type_name("A");
    let out = expand(&with_own, &registry).unwrap().expect("A expands");
    assert_eq!(out.items().len(), 3);
    assert_eq!(out.items()[2], Element::object(vec![Element::member("own", true)]));
}

#[test]
fn reference_resolves_like_an_instance() {
    let registry = registry_from(json!([
        {
            "element": "object",
            "meta": { "id": { "element": "string", "content": "Foo" } },
            "content": [ number_member("n") ]
        }
    ]));
    let reference = from_json(&json!({
        "element": "ref",
        "content": [
            {
                "element": "member",
                "content": {
                    "key": { "element": "string", "content": "href" },
                    "value": { "element": "string", "content": "Foo" }
                }
            }
        ]
    }))
    .unwrap();

    let via_ref = expand_or_clone(&reference, &registry).unwrap();
    let via_instance = expand_or_clone(&Element::object(vec![]).with_type_name("Foo"), &registry).unwrap();
    assert_eq!(via_ref, via_instance);
}

#[test]
fn broken_references_become_empty_objects() {
    let registry = Registry::new();
    let mut expander = Expander::new(&registry);
    for reference in [
        json!({ "element": "ref", "content": [] }),
        json!({
            "element": "ref",
            "content": [
                {
                    "element": "member",
                    "content": {
                        "key": { "element": "string", "content": "href" },
                        "value": { "element": "boolean", "content": true }
                    }
                }
            ]
        }),
    ] {
        let out = expander.expand_or_clone(&from_json(&reference).unwrap()).unwrap();
        assert_eq!(to_json(&out), json!({ "element": "object", "content": [] }));
    }
    assert_eq!(expander.diagnostics().len(), 2);
}

#[test]
fn nested_reference_in_payload_gets_extend_envelope() {
    let registry = registry_from(json!([
        {
            "element": "object",
            "meta": { "id": { "element": "string", "content": "Address" } },
            "content": [ number_member("zip") ]
        }
    ]));
    let payload = Element::object(vec![
        Element::member("name", "Ada"),
        Element::member(
            "home",
            Element::object(vec![Element::member("href", "Address")]).with_type_name("ref"),
        ),
    ])
    .with_meta(meta::TITLE, "Person");

    let out = expand_or_clone(&payload, &registry).unwrap();
    // the ref sits inside a member, so the object keeps its own type name
    assert_eq!(out.type_name(), "object");
    assert_eq!(out.meta(meta::TITLE), Some(&Element::string("Person")));
    let home = out.items()[1].as_member().and_then(|m| m.value()).expect("home value");
    assert_eq!(home.type_name(), "extend");
    assert_eq!(home.items()[0].meta(meta::REF), Some(&Element::string("Address")));
}

#[test]
fn cyclic_definitions_fail_instead_of_looping() {
    let registry = registry_from(json!([
        { "element": "B", "meta": { "id": { "element": "string", "content": "A" } }, "content": [] },
        { "element": "A", "meta": { "id": { "element": "string", "content": "B" } }, "content": [] }
    ]));
    let err = expand(&Element::object(vec![]).with_type_name("A"), &registry).unwrap_err();
    let ExpandError::CyclicNamedType { name, chain } = err;
    assert_eq!(name, "A");
    assert_eq!(chain, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn registries_do_not_leak_between_documents() {
    let mut registry = registry_from(json!([
        { "element": "object", "meta": { "id": { "element": "string", "content": "Old" } }, "content": [] }
    ]));
    registry.reset();
    let mut expander = Expander::new(&registry);
    let out = expander.expand_or_clone(&Element::object(vec![]).with_type_name("Old")).unwrap();
    assert!(out.items().is_empty());
    assert_eq!(expander.diagnostics().len(), 1);
}

fn address_registry() -> Registry {
    registry_from(json!([
        {
            "element": "object",
            "meta": { "id": { "element": "string", "content": "Address" } },
            "content": [ number_member("zip") ]
        },
        {
            "element": "array",
            "meta": { "id": { "element": "string", "content": "Tags" } },
            "content": [ { "element": "string" } ]
        }
    ]))
}

#[test]
fn bare_named_instances_expand() {
    let registry = address_registry();

    let bare = from_json(&json!({ "element": "Address" })).unwrap();
    let out = expand(&bare, &registry).unwrap().expect("bare Address expands");
    assert_eq!(out.type_name(), "extend");
    assert_eq!(out.items().len(), 1);

    let member = from_json(&json!({
        "element": "member",
        "content": {
            "key": { "element": "string", "content": "home" },
            "value": { "element": "Address" }
        }
    }))
    .unwrap();
    let out = expand(&member, &registry).unwrap().expect("member value expands");
    let home = out.as_member().and_then(|m| m.value()).expect("home value");
    assert_eq!(home.type_name(), "extend");
    assert_eq!(home.items()[0].meta(meta::REF), Some(&Element::string("Address")));
}

#[test]
fn named_instance_with_select_keeps_its_chain() {
    let registry = address_registry();
    let input = from_json(&json!({
        "element": "Address",
        "content": [
            number_member("street"),
            {
                "element": "select",
                "content": [
                    { "element": "option", "content": [ number_member("po_box") ] }
                ]
            }
        ]
    }))
    .unwrap();

    let out = expand(&input, &registry).unwrap().expect("Address expands");
    assert_eq!(out.items().len(), 2);
    assert_eq!(out.items()[0].meta(meta::REF), Some(&Element::string("Address")));
    assert_eq!(out.items()[1].items().len(), 2);
}

#[test]
fn empty_named_arrays_are_not_expanded() {
    let registry = address_registry();

    let tags = Element::array(vec![]).with_type_name("Tags");
    let decoded = from_json(&to_json(&tags)).unwrap();
    assert_eq!(decoded.kind(), Kind::Array);
    assert_eq!(expand(&decoded, &registry).unwrap(), None);

    let via_registry = from_json_in(&json!({ "element": "Tags", "content": [] }), &registry).unwrap();
    assert_eq!(via_registry.kind(), Kind::Array);
    assert_eq!(expand_or_clone(&via_registry, &registry).unwrap(), via_registry);
}
