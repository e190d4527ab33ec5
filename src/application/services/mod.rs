//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Prompter)
//! but are themselves concrete structs, not traits.

mod rescale;

pub use rescale::{DocumentReport, DocumentTree, RescaleOptions, RescaleReport, RescaleService};
