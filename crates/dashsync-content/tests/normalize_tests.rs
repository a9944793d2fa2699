//! Tests for dashboard normalization

use dashsync_content::{ConfigInput, Normalizer, StorageMode, normalize_config};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Map, Value, json};

const TITLE: &str = "New Dashboard";

fn mapping(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[rstest]
#[case::string_dashboard(ConfigInput::from(r#"{"title":"New Dashboard"}"#))]
#[case::map_dashboard(ConfigInput::from(mapping(json!({"title": TITLE}))))]
#[case::version_removed(ConfigInput::from(mapping(json!({"title": TITLE, "version": 10}))))]
#[case::id_removed(ConfigInput::from(mapping(json!({"title": TITLE, "id": 10}))))]
#[case::float_id_removed(ConfigInput::from(mapping(json!({"title": TITLE, "id": 10.0}))))]
#[case::reordered_text(ConfigInput::from(r#"{ "version": 3, "title": "New Dashboard", "id": 1 }"#))]
fn test_normalize_title_only(#[case] input: ConfigInput) {
    assert_eq!(normalize_config(input).unwrap(), r#"{"title":"New Dashboard"}"#);
}

#[test]
fn test_bad_json_is_passed_through() {
    let raw = "74D93920-ED26–11E3-AC10–0800200C9A66";
    assert_eq!(normalize_config(raw).unwrap(), raw);
}

#[test]
fn test_library_panel_extra_fields_removed() {
    let given = r#"{"panels":[{"libraryPanel":{"name":"test","uid":"test","description":"test"}}]}"#;
    assert_eq!(
        normalize_config(given).unwrap(),
        r#"{"panels":[{"libraryPanel":{"name":"test","uid":"test"}}]}"#
    );
}

#[test]
fn test_string_and_mapping_are_equivalent() {
    let from_text = normalize_config(r#"{"title":"X"}"#).unwrap();
    let from_map = normalize_config(mapping(json!({"title": "X"}))).unwrap();
    assert_eq!(from_text, from_map);
}

#[test]
fn test_panel_order_is_preserved() {
    let given = json!({"panels": [{"title": "b"}, {"title": "a"}]});
    assert_eq!(
        normalize_config(given).unwrap(),
        r#"{"panels":[{"title":"b"},{"title":"a"}]}"#
    );
}

#[test]
fn test_nested_fields_named_id_are_kept() {
    let given = json!({
        "id": 12,
        "panels": [{"id": 2, "targets": [{"refId": "A"}]}],
        "templating": {"list": [{"version": 1}]}
    });
    assert_eq!(
        normalize_config(given).unwrap(),
        r#"{"panels":[{"id":2,"targets":[{"refId":"A"}]}],"templating":{"list":[{"version":1}]}}"#
    );
}

#[test]
fn test_deeply_nested_library_panels() {
    let given = json!({
        "panels": [{
            "collapsed": true,
            "panels": [{
                "panels": [{
                    "libraryPanel": {"uid": "deep", "name": "Deep", "version": 4, "meta": {"folderUid": "f"}}
                }]
            }]
        }]
    });
    let normalized: Value = serde_json::from_str(&normalize_config(given).unwrap()).unwrap();
    assert_eq!(
        normalized["panels"][0]["panels"][0]["panels"][0]["libraryPanel"],
        json!({"name": "Deep", "uid": "deep"})
    );
}

#[test]
fn test_server_response_matches_user_config() {
    let user = r#"{"title":"Production Overview","uid":"prod","panels":[{"libraryPanel":{"uid":"cpu","name":"CPU"}}]}"#;
    let server = json!({
        "id": 31,
        "uid": "prod",
        "version": 7,
        "title": "Production Overview",
        "panels": [{
            "libraryPanel": {"uid": "cpu", "name": "CPU", "description": "CPU usage", "version": 2}
        }]
    });
    assert_eq!(normalize_config(user).unwrap(), normalize_config(server).unwrap());
}

#[test]
fn test_digest_mode_matches_known_values() {
    let normalizer = Normalizer::new();
    let cases = [
        (
            json!({"title": "Terraform Acceptance Test", "uid": "basic"}),
            "fadbc115a19bfd7962d8f8d749d22c20d0a44043d390048bf94b698776d9f7f1",
        ),
        (
            json!({"title": "Updated Title", "uid": "basic", "version": 2}),
            "4669abda43a4a6d6ae9ecaa19f8508faf4095682b679da0b5ce4176aa9171ab2",
        ),
        (
            json!({"uid": "basic-update", "title": "Updated Title"}),
            "2934e80938a672bd09d8e56385159a1bf8176e2a2ef549437f200d82ff398bfb",
        ),
    ];

    for (config, expected) in cases {
        let form = normalizer.canonicalize(config, StorageMode::Sha256).unwrap();
        assert_eq!(form.stored_value(), expected);
    }
}

#[rstest]
#[case::small(r#"{"x":8.0}"#, r#"{"x":8}"#)]
#[case::beyond_f64_exact_range(r#"{"x":1e17}"#, r#"{"x":100000000000000000}"#)]
#[case::negative(r#"{"x":-1e17}"#, r#"{"x":-100000000000000000}"#)]
#[case::above_i64(r#"{"x":1e19}"#, r#"{"x":10000000000000000000}"#)]
fn test_integral_floats_match_integers(#[case] as_float: &str, #[case] as_integer: &str) {
    let normalized = normalize_config(as_float).unwrap();
    assert_eq!(normalized, normalize_config(as_integer).unwrap());
    assert_eq!(normalized, as_integer);
}
