//! Tests for tileset scaling in the domain layer

use rstest::rstest;
use serde_json::{json, Value};

use tilescale::domain::{scale_tileset, Tileset};

fn sample_tileset() -> Value {
    json!({
        "asset": {"version": "1.0"},
        "geometricError": 500,
        "root": {
            "boundingVolume": {"box": [0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 0, 10]},
            "geometricError": 250,
            "refine": "ADD",
            "children": [
                {"geometricError": 125, "content": {"uri": "tile_1.json"}},
                {"geometricError": 125, "content": {"uri": "model.b3dm"}, "children": [
                    {"geometricError": 62.5, "content": {"uri": "tile_2.json"}},
                    {"geometricError": 0}
                ]}
            ]
        }
    })
}

/// Collect every geometricError in document order.
fn geometric_errors(value: &Value, out: &mut Vec<f64>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                if key == "geometricError" {
                    out.push(v.as_f64().unwrap());
                } else {
                    geometric_errors(v, out);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|v| geometric_errors(v, out)),
        _ => {}
    }
}

/// Replace every geometricError with zero, leaving only the shape.
fn strip_errors(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if key == "geometricError" {
                    *v = json!(0.0);
                } else {
                    strip_errors(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_errors),
        _ => {}
    }
}

#[rstest]
#[case(2.0)]
#[case(0.5)]
#[case(-1.0)]
#[case(0.0)]
#[case(1.0 / 3.0)]
fn given_factor_when_scaling_then_every_error_is_multiplied(#[case] factor: f64) {
    let input = sample_tileset();
    let mut tileset: Tileset = serde_json::from_value(input.clone()).unwrap();

    scale_tileset(&mut tileset, factor, ".json");

    let mut expected = Vec::new();
    geometric_errors(&input, &mut expected);
    let mut actual = Vec::new();
    geometric_errors(&serde_json::to_value(&tileset).unwrap(), &mut actual);

    let expected: Vec<f64> = expected.iter().map(|e| e * factor).collect();
    assert_eq!(actual, expected);
}

#[test]
fn given_tileset_when_scaling_then_shape_and_contents_are_preserved() {
    let input = sample_tileset();
    let mut tileset: Tileset = serde_json::from_value(input.clone()).unwrap();

    scale_tileset(&mut tileset, 7.0, ".json");

    let mut before = input;
    let mut after = serde_json::to_value(&tileset).unwrap();
    strip_errors(&mut before);
    strip_errors(&mut after);
    assert_eq!(after, before);
}

#[test]
fn given_tileset_when_scaling_then_references_follow_traversal_order() {
    let mut tileset: Tileset = serde_json::from_value(sample_tileset()).unwrap();

    let outcome = scale_tileset(&mut tileset, 2.0, ".json");

    assert_eq!(outcome.references, vec!["tile_1.json", "tile_2.json"]);
    assert_eq!(outcome.tiles_scaled, 5);
    assert_eq!(tileset.geometric_error, 1000.0);
}

#[test]
fn given_child_reference_example_when_scaling_then_matches_expected_document() {
    let mut tileset = Tileset::from_json(
        r#"{"geometricError": 10, "root": {"geometricError": 5, "children": [{"geometricError": 2, "content": {"uri": "child.json"}}]}}"#,
    )
    .unwrap();

    let outcome = scale_tileset(&mut tileset, 2.0, ".json");

    assert_eq!(
        serde_json::to_value(&tileset).unwrap(),
        json!({"geometricError": 20.0, "root": {"geometricError": 10.0, "children": [
            {"geometricError": 4.0, "content": {"uri": "child.json"}}
        ]}})
    );
    assert_eq!(outcome.references, vec!["child.json"]);
}
