use ophir_core::{
    builder::module, load_json, to_json, Attribute, IrContext, Location, OperationBuilder, Type,
};
use pretty_assertions::assert_eq;

#[test]
fn test_load_minimal_module() {
    let input = r#"{
        "name": "builtin.module",
        "regions": [
            { "blocks": [ { "operations": [ { "name": "test.op" } ] } ] }
        ]
    }"#;

    let op = load_json(input).unwrap();
    assert_eq!(op.name, "builtin.module");
    assert_eq!(op.location, Location::Unknown);
    assert_eq!(op.num_operations(), 2);
}

#[test]
fn test_load_typed_values() {
    let input = r#"{
        "name": "arith.constant",
        "results": [ { "id": 4, "ty": { "Integer": 32 } } ],
        "attributes": { "value": { "Integer": [7, { "Integer": 32 }] } },
        "location": { "FileLineCol": { "file": "a.mlir", "line": 2, "column": 5 } }
    }"#;

    let op = load_json(input).unwrap();
    assert_eq!(op.results[0].ty, Type::i32());
    assert_eq!(op.attribute("value"), Some(&Attribute::i32(7)));
    assert_eq!(op.location, Location::file("a.mlir", 2, 5));
}

#[test]
fn test_json_roundtrip_preserves_tree() {
    let mut ctx = IrContext::new();
    let mut body = ctx.new_block([Type::Index]);
    let c = ctx.new_value(Type::i32());
    body.push(
        OperationBuilder::new("arith.constant")
            .attribute("value", Attribute::i32(1))
            .result(&c)
            .build()
            .unwrap(),
    );
    let root = module(body);

    let json = to_json(&root).unwrap();
    assert_eq!(load_json(&json).unwrap(), root);
}

#[test]
fn test_load_rejects_malformed_input() {
    assert!(load_json("{ \"regions\": [] }").is_err());
    assert!(load_json("not json").is_err());
}

