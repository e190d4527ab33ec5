//! tilescale: rescale geometric error values throughout a 3D Tiles tileset
//! hierarchy, following external tileset references.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
