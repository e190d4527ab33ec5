//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

/// Multiply geometric error values of a 3D Tiles tileset (and its external tilesets) by a factor.
/// Make sure to back up tileset files before running.
#[derive(Parser, Debug)]
#[command(name = "tilescale")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "External tilesets are found by their content uri, resolved relative to the directory of the tileset that references them, not the current directory."
)]
pub struct Cli {
    /// Main tileset input file (.json); references inside it resolve relative to its directory
    #[arg(
        value_hint = ValueHint::FilePath,
        required_unless_present_any = ["completions", "show_config"]
    )]
    pub tileset: Option<PathBuf>,

    /// Multiply geometric error values by this factor
    #[arg(
        allow_negative_numbers = true,
        required_unless_present_any = ["completions", "show_config"]
    )]
    pub factor: Option<f64>,

    /// Overwrite files without asking
    #[arg(long)]
    pub overwrite: bool,

    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Write indented JSON
    #[arg(long)]
    pub pretty: bool,

    /// Config file (overrides the global config)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}
