//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent invalid tileset data or reference graphs.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid tileset {}: {message}", path.display())]
    InvalidTileset { path: PathBuf, message: String },

    #[error("cycle detected in external tileset references: {}", .0.display())]
    CycleDetected(PathBuf),
}
