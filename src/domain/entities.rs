//! Domain entities: typed 3D Tiles tileset model
//!
//! Only the members the rescaler reads or writes are typed. Everything else
//! (`asset`, `boundingVolume`, `transform`, `refine`, `extras`, ...) lands in
//! the flattened `extra` maps, so a tileset survives a load/save cycle intact.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root container of a tile hierarchy (`tileset.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    /// Error above which the tileset is not rendered at all
    #[serde(rename = "geometricError")]
    pub geometric_error: f64,
    /// Root tile of the hierarchy
    pub root: Tile,
    /// Untouched members, kept in input order
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single node of the tile tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Error threshold used for level-of-detail selection
    #[serde(rename = "geometricError")]
    pub geometric_error: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<TileContent>,
    /// Multiple contents (3D Tiles 1.1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<TileContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Tile>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Content attached to a tile: a payload (`.b3dm`, `.glb`, ...) or an
/// external tileset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tileset {
    /// Parse a tileset from its JSON text.
    ///
    /// Fails when `geometricError` or `root` is missing at the top level, or
    /// when any tile lacks `geometricError`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize the tileset, compact or indented.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl Tile {
    /// URIs carried by this tile, `content` first, then `contents` in order.
    pub fn content_uris(&self) -> impl Iterator<Item = &str> {
        self.content
            .iter()
            .chain(self.contents.iter().flatten())
            .filter_map(|c| c.uri.as_deref())
    }
}
