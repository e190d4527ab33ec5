//! Domain layer: tileset model and scaling logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod scaler;

pub use entities::{Tile, TileContent, Tileset};
pub use error::DomainError;
pub use scaler::{is_external_reference, scale_tile, scale_tileset, ScaleOutcome};
