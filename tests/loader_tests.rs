use test_helpers::*;

use proptest::prelude::*;
use srgan_config::config::LoaderConfig;
use srgan_config::{load_str, DocumentLoader, LoadError, Node};
use std::rc::Rc;

#[test]
fn test_scalar_resolution() {
    let root = load(
        "int: 42\nhex: 0x1F\nneg: -7\nfloat: 0.5\nexp: 1e-4\ninf: .inf\nnull_tilde: ~\nnull_word: null\nempty:\nyes: true\nno: False\nword: adam\nquoted: \"42\"\nsingle: 'true'\ntagged: !!str 3\n",
    );
    let get = |key: &str| assert_some(root.get(key).cloned(), key);

    assert_eq!(*get("int"), Node::Int(42));
    assert_eq!(*get("hex"), Node::Int(31));
    assert_eq!(*get("neg"), Node::Int(-7));
    assert_eq!(*get("float"), Node::Float(0.5));
    assert_eq!(*get("exp"), Node::Float(1e-4));
    assert_eq!(get("inf").as_f64(), Some(f64::INFINITY));
    assert!(get("null_tilde").is_null());
    assert!(get("null_word").is_null());
    assert!(get("empty").is_null());
    assert_eq!(*get("yes"), Node::Bool(true));
    assert_eq!(*get("no"), Node::Bool(false));
    assert_eq!(get("word").as_str(), Some("adam"));
    assert_eq!(get("quoted").as_str(), Some("42"));
    assert_eq!(get("single").as_str(), Some("true"));
    assert_eq!(get("tagged").as_str(), Some("3"));
}

#[test]
fn test_mapping_order_preserved() {
    let root = load("zeta: 1\nalpha: 2\nmid: 3\n");
    let keys: Vec<&str> = assert_some(root.as_map(), "root map").keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_alias_shares_the_anchored_node() {
    let root = load("model: &m\n  _target_: Linear\n  in_features: 3\noptimizer:\n  params: *m\nscheduler:\n  model: *m\n");
    let model = assert_some(Node::select(&root, "model"), "model");
    let from_optimizer = assert_some(Node::select(&root, "optimizer.params"), "optimizer.params");
    let from_scheduler = assert_some(Node::select(&root, "scheduler.model"), "scheduler.model");
    assert!(Rc::ptr_eq(&model, &from_optimizer));
    assert!(Rc::ptr_eq(&model, &from_scheduler));
}

#[test]
fn test_scalar_anchor_and_flow_alias() {
    let root = load("lr: &lr 0.001\nstages: [*lr, *lr]\n");
    let stages = assert_some(root.get("stages").and_then(|s| s.as_seq()), "stages");
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0].as_f64(), Some(0.001));
    assert!(Rc::ptr_eq(&stages[0], &stages[1]));
}

#[test]
fn test_merge_key() {
    let root = load("A: &A {x: 0, y: 2}\nB: {<<: [*A], x: 1}\n");
    let b = assert_some(root.get("B").cloned(), "B");
    assert_eq!(serde_json::to_value(&*b).unwrap(), serde_json::json!({"x": 1, "y": 2}));
}

#[test]
fn test_merge_sources_earlier_wins() {
    let root = load("a: &a {k: first, only_a: 1}\nb: &b {k: second, only_b: 2}\nc:\n  <<: [*a, *b]\n  own: 3\n");
    let c = assert_some(Node::select(&root, "c"), "c");
    assert_eq!(
        serde_json::to_value(&*c).unwrap(),
        serde_json::json!({"k": "first", "only_a": 1, "only_b": 2, "own": 3})
    );
}

#[test]
fn test_merge_single_mapping_and_position() {
    let root = load("base: &base\n  lr: 0.1\n  momentum: 0.9\ntuned:\n  <<: *base\n  lr: 0.01\n");
    let tuned = assert_some(root.get("tuned").and_then(|t| t.as_map()), "tuned");
    let keys: Vec<&str> = tuned.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["lr", "momentum"]);
    assert_eq!(tuned["lr"].as_f64(), Some(0.01));
}

#[test]
fn test_quoted_merge_key_is_ordinary() {
    let root = load("a: {\"<<\": 1}\n");
    assert_eq!(Node::select(&root, "a.<<").and_then(|n| n.as_i64()), Some(1));
}

#[test]
fn test_merge_rejects_non_mapping() {
    let err = assert_err(load_str("a: {<<: 3}\n"), "merging a scalar");
    match err {
        LoadError::Parse { message, .. } => assert_contains(&message, "merge value", "merge error"),
        other => panic!("Expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_unresolved_alias() {
    let err = assert_err(load_str("a: 1\nb: *missing\n"), "unknown alias");
    match err {
        LoadError::UnresolvedAnchor { name, line, .. } => {
            assert_eq!(name, "missing");
            assert_eq!(line, 2);
        }
        other => panic!("Expected UnresolvedAnchor, got {:?}", other),
    }
}

#[test]
fn test_recursive_alias_is_rejected() {
    let err = assert_err(load_str("a: &a\n  self: *a\n"), "recursive alias");
    assert!(matches!(err, LoadError::UnresolvedAnchor { .. }), "got {:?}", err);
}

#[test]
fn test_parse_error_location() {
    let err = assert_err(load_str("a: 1\nb: [1, 2\n"), "unterminated flow sequence");
    let (line, column) = err.location();
    assert!(line >= 2, "line {} should point past the first line", line);
    assert!(column >= 1);
    assert_contains(&err.to_string(), "line", "error display");
}

#[test]
fn test_duplicate_keys() {
    assert_result_err(load_str("a: 1\na: 2\n"), "duplicate key");

    let loader = DocumentLoader::new(LoaderConfig::builder().allow_duplicate_keys(true).build());
    let root = assert_ok(loader.load_str("a: 1\na: 2\n"), "duplicate key allowed");
    assert_eq!(root.get("a").and_then(|a| a.as_i64()), Some(2));
}

#[test]
fn test_custom_merge_key() {
    let loader = DocumentLoader::new(LoaderConfig::builder().merge_key("<<<").build());
    let root = assert_ok(loader.load_str("a: &a {x: 1}\nb: {<<<: *a, y: 2}\n"), "custom merge key");
    assert_eq!(Node::select(&root, "b.x").and_then(|n| n.as_i64()), Some(1));
}

#[test]
fn test_single_document_only() {
    assert!(load("").is_null());
    assert_result_err(load_str("a: 1\n---\nb: 2\n"), "second document");
}

#[test]
fn test_non_string_keys_are_stringified() {
    let root = load("1: one\ntrue: yes\nfalse: false\n");
    assert_eq!(root.get("1").and_then(|n| n.as_str()), Some("one"));
    assert_eq!(root.get("true").and_then(|n| n.as_str()), Some("yes"));
    assert_eq!(root.get("false").and_then(|n| n.as_bool()), Some(false));
}

#[test]
fn test_float_keys_keep_their_text() {
    let root = load("1e3: a\n1.0: b\n0.5: c\n");
    let keys: Vec<String> = root.as_map().map(|m| m.keys().cloned().collect()).unwrap_or_default();
    assert_eq!(keys, vec!["1e3", "1.0", "0.5"]);
}

#[test]
fn test_huge_integers_are_not_rounded() {
    let root = load("n: 12345678901234567890\nm: 9223372036854775807\n");
    assert_eq!(root.get("n").and_then(|n| n.as_str()), Some("12345678901234567890"));
    assert_eq!(root.get("m").and_then(|n| n.as_i64()), Some(i64::MAX));
}

#[test]
fn test_load_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "esrgan.yaml", "model: {_target_: Linear}\n");
    let root = assert_ok(DocumentLoader::default().load_file(&path), "loading fixture");
    assert!(root.get("model").map_or(false, |m| m.is_target("_target_")));

    assert_result_err(DocumentLoader::default().load_file(dir.path().join("absent.yaml")), "missing file");
}

#[test]
fn test_sample_config_loads() {
    let text = include_str!("../configs/esrgan.yaml");
    let root = load(text);
    let model = assert_some(Node::select(&root, "model"), "model");
    let staged = assert_some(Node::select(&root, "stages.1.model"), "stages.1.model");
    assert!(Rc::ptr_eq(&model, &staged));
    assert_eq!(
        Node::select(&root, "model.encoder.conv.kernel_size").and_then(|n| n.as_i64()),
        Some(3)
    );
}

fn scalar() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i32>().prop_map(serde_json::Value::from),
        "[a-z][a-z0-9_]{0,8}".prop_map(serde_json::Value::from),
    ]
}

fn tree() -> impl Strategy<Value = serde_json::Value> {
    scalar().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::from),
            prop::collection::btree_map("[a-z][a-z0-9_]{0,6}", inner, 0..4)
                .prop_map(|map| serde_json::Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    // JSON is a subset of YAML flow syntax, so any JSON tree must load back unchanged
    #[test]
    fn prop_json_documents_load_isomorphically(value in tree()) {
        let text = serde_json::to_string_pretty(&value).unwrap();
        let root = load_str(&text).unwrap();
        prop_assert_eq!(serde_json::to_value(&*root).unwrap(), value);
    }
}
