mod common;

use common::{engine, schema, EX};
use triplemap::{
    Conditions, NamedNode, QueryCompiler, QueryError, QueryOptions, Repository, TypeCoercion,
    Value,
};

const TYPE: &str = "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>";

#[test]
fn test_subtype_queries_use_primary_type() {
    let schema = schema();
    let coercion = TypeCoercion::new();
    let compiler = QueryCompiler::new(&coercion);
    let engineer = schema.get("Engineer").unwrap();

    let query = compiler
        .compile_find(engineer, &Conditions::new().with("discipline", "compilers"), None)
        .unwrap();
    assert_eq!(
        query,
        format!(
            "SELECT ?subject WHERE {{ ?subject {} <{}Engineer> . \
             ?subject <{}discipline> \"compilers\" }}",
            TYPE, EX, EX
        )
    );
}

#[test]
fn test_inherited_attributes_usable_in_conditions() {
    let schema = schema();
    let coercion = TypeCoercion::new();
    let compiler = QueryCompiler::new(&coercion);
    let pattern = compiler
        .graph_pattern(schema.get("Engineer").unwrap(), &Conditions::new().with("name", "Grace"))
        .unwrap();
    assert!(pattern.ends_with(&format!("?subject <{}name> \"Grace\"", EX)));
}

#[test]
fn test_typed_values_render_as_literals() {
    let schema = schema();
    let coercion = TypeCoercion::new();
    let compiler = QueryCompiler::new(&coercion);
    let born = chrono::NaiveDate::from_ymd_opt(1815, 12, 10).unwrap();
    let conditions = Conditions::new()
        .with("born", born)
        .with("active", true)
        .with("homepage", NamedNode::new("http://ada.example/").unwrap());

    let pattern = compiler
        .graph_pattern(schema.get("Person").unwrap(), &conditions)
        .unwrap();
    let parts: Vec<&str> = pattern.split(" . ").collect();
    assert_eq!(parts.len(), 4);
    assert_eq!(
        parts[1],
        format!(
            "?subject <{}born> \"1815-12-10\"^^<http://www.w3.org/2001/XMLSchema#date>",
            EX
        )
    );
    assert_eq!(
        parts[2],
        format!(
            "?subject <{}active> \"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>",
            EX
        )
    );
    assert_eq!(parts[3], format!("?subject <{}homepage> <http://ada.example/>", EX));
}

#[test]
fn test_saved_record_renders_as_subject() {
    let mut engine = engine();
    let ada = engine.create("Person", vec![("name", "Ada")]).unwrap();
    let compiler = QueryCompiler::new(engine.coercion());
    let person = engine.schema().get("Person").unwrap();

    let query = compiler
        .compile_exists(person, &Conditions::new().with("friend", ada.clone()))
        .unwrap();
    assert!(query.ends_with(&format!(
        "?subject <{}friend> <http://example.org/people#person-1> }}",
        EX
    )));

    let by_record = compiler
        .graph_pattern(person, &Conditions::new().with("id", ada))
        .unwrap();
    assert!(by_record.ends_with(&format!(
        "<http://example.org/people#person-1> {} <{}Person>",
        TYPE, EX
    )));
}

#[test]
fn test_unsaved_record_rejected() {
    let engine = engine();
    let draft = engine.new_record("Person").unwrap();
    let compiler = QueryCompiler::new(engine.coercion());

    let err = compiler
        .compile_count(
            engine.schema().get("Person").unwrap(),
            &Conditions::new().with("friend", draft),
        )
        .unwrap_err();
    assert!(matches!(err, QueryError::UnsavedReference(attribute) if attribute == "friend"));
}

#[test]
fn test_condition_order_is_preserved() {
    let schema = schema();
    let coercion = TypeCoercion::new();
    let compiler = QueryCompiler::new(&coercion);
    let person = schema.get("Person").unwrap();

    let name_first = Conditions::new().with("name", "Ada").with("age", 36i64);
    let age_first = Conditions::new().with("age", 36i64).with("name", "Ada");
    let a = compiler.graph_pattern(person, &name_first).unwrap();
    let b = compiler.graph_pattern(person, &age_first).unwrap();
    assert_ne!(a, b);
    assert_eq!(a, compiler.graph_pattern(person, &name_first).unwrap());

    let collected: Conditions = vec![("name", Value::from("Ada")), ("age", Value::from(36i64))]
        .into_iter()
        .collect();
    assert_eq!(compiler.graph_pattern(person, &collected).unwrap(), a);
}

#[test]
fn test_compiled_find_results_render_as_json() {
    let mut engine = engine();
    engine.create("Person", vec![("name", "Ada")]).unwrap();
    engine.create("Person", vec![("name", "Bob")]).unwrap();
    let compiler = QueryCompiler::new(engine.coercion());

    let query = compiler
        .compile_find(
            engine.schema().get("Person").unwrap(),
            &Conditions::new().with("name", "Ada"),
            None,
        )
        .unwrap();
    let results = engine.repository().query(&query, &QueryOptions::default()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&results.to_json_string().unwrap()).unwrap();

    assert_eq!(json["head"]["vars"][0], "subject");
    let bindings = json["results"]["bindings"].as_array().unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0]["subject"]["type"], "uri");
    assert_eq!(bindings[0]["subject"]["value"], "http://example.org/people#person-1");
}
