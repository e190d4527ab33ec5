//! Geometric error scaling and external tileset discovery

use crate::domain::entities::{Tile, Tileset};

/// Result of scaling one tileset document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleOutcome {
    /// External tileset references in traversal order (duplicates kept)
    pub references: Vec<String>,
    /// Number of tiles whose geometric error was scaled
    pub tiles_scaled: usize,
}

/// Whether a content URI points at another tileset document.
pub fn is_external_reference(uri: &str, suffix: &str) -> bool {
    uri.ends_with(suffix)
}

/// Multiply the tileset's own geometric error and every tile's by `factor`.
///
/// External references are collected but not followed; that is left to the
/// caller, which owns the file system.
pub fn scale_tileset(tileset: &mut Tileset, factor: f64, suffix: &str) -> ScaleOutcome {
    tileset.geometric_error *= factor;

    let mut references = Vec::new();
    let tiles_scaled = scale_tile(&mut tileset.root, factor, suffix, &mut references);

    ScaleOutcome {
        references,
        tiles_scaled,
    }
}

/// Scale `tile` and its subtree in place, appending external references to
/// `references`. A tile's own content is checked before its children.
///
/// Returns the number of tiles visited.
pub fn scale_tile(tile: &mut Tile, factor: f64, suffix: &str, references: &mut Vec<String>) -> usize {
    tile.geometric_error *= factor;

    references.extend(
        tile.content_uris()
            .filter(|uri| is_external_reference(uri, suffix))
            .map(str::to_string),
    );

    let mut count = 1;
    if let Some(children) = tile.children.as_mut() {
        for child in children {
            count += scale_tile(child, factor, suffix, references);
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("tile_1.json", true)]
    #[case("sub/dir/tileset.json", true)]
    #[case("model.b3dm", false)]
    #[case("model.glb", false)]
    #[case("tileset.JSON", false)]
    #[case("", false)]
    fn test_is_external_reference(#[case] uri: &str, #[case] expected: bool) {
        assert_eq!(is_external_reference(uri, ".json"), expected);
    }

    #[test]
    fn given_leaf_tile_when_scaling_then_counts_one() {
        let mut tile: Tile =
            serde_json::from_str(r#"{"geometricError": 3.0, "content": {"uri": "x.b3dm"}}"#).unwrap();
        let mut refs = Vec::new();

        let count = scale_tile(&mut tile, 0.5, ".json", &mut refs);

        assert_eq!(count, 1);
        assert_eq!(tile.geometric_error, 1.5);
        assert!(refs.is_empty());
    }

    #[test]
    fn given_nested_references_when_scaling_then_parent_reference_precedes_children() {
        let mut tile: Tile = serde_json::from_str(
            r#"{
                "geometricError": 8,
                "content": {"uri": "parent.json"},
                "children": [
                    {"geometricError": 4, "content": {"uri": "first.json"}},
                    {"geometricError": 4, "children": [
                        {"geometricError": 2, "content": {"uri": "deep.json"}}
                    ]},
                    {"geometricError": 4, "content": {"uri": "first.json"}}
                ]
            }"#,
        )
        .unwrap();
        let mut refs = Vec::new();

        let count = scale_tile(&mut tile, 2.0, ".json", &mut refs);

        assert_eq!(count, 5);
        assert_eq!(
            refs,
            vec!["parent.json", "first.json", "deep.json", "first.json"]
        );
    }

    #[test]
    fn given_custom_suffix_when_scaling_then_only_matching_uris_are_collected() {
        let mut tileset = Tileset::from_json(
            r#"{"geometricError": 1, "root": {"geometricError": 1, "children": [
                {"geometricError": 1, "content": {"uri": "a.json"}},
                {"geometricError": 1, "content": {"uri": "b.tileset.json"}}
            ]}}"#,
        )
        .unwrap();

        let outcome = scale_tileset(&mut tileset, 1.0, ".tileset.json");

        assert_eq!(outcome.references, vec!["b.tileset.json"]);
    }
}
