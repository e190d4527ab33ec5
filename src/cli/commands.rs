//! Command dispatch: turns parsed arguments into a rescale run

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{RescaleOptions, RescaleReport};
use crate::application::ApplicationError;
use crate::cli::args::Cli;
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(());
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.pretty {
        settings.pretty = true;
    }
    debug!("settings: {:?}", settings);

    if cli.show_config {
        output::info(&settings.to_toml()?);
        return Ok(());
    }

    let tileset = cli
        .tileset
        .as_deref()
        .ok_or_else(|| CliError::Usage("missing TILESET argument".into()))?;
    let factor = cli
        .factor
        .ok_or_else(|| CliError::Usage("missing FACTOR argument".into()))?;
    let options = RescaleOptions {
        factor: validate_factor(factor)?,
        overwrite: cli.overwrite,
        dry_run: cli.dry_run,
    };

    let container = ServiceContainer::new(settings);
    _rescale(&container, tileset, &options)
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// NaN and infinities would be written as `null`.
fn validate_factor(factor: f64) -> CliResult<f64> {
    if factor.is_finite() {
        Ok(factor)
    } else {
        Err(CliError::InvalidArgs(format!(
            "factor must be a finite number, got {factor}"
        )))
    }
}

#[instrument(skip(container))]
fn _rescale(container: &ServiceContainer, tileset: &Path, options: &RescaleOptions) -> CliResult<()> {
    let service = container.rescale_service();
    match service.process(tileset, options) {
        Ok(report) => {
            print_report(&report, options);
            Ok(())
        }
        Err(ApplicationError::OverwriteDeclined(path)) => {
            output::warning(&format!(
                "not overwriting {}, aborting (files processed before it were already written)",
                path.display()
            ));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_report(report: &RescaleReport, options: &RescaleOptions) {
    let verb = if options.dry_run { "Would rescale" } else { "Rescaled" };
    output::header(&format!(
        "{} {} tileset(s), {} tile(s) by factor {}",
        verb,
        report.documents.len(),
        report.tiles_scaled(),
        options.factor
    ));

    for doc in &report.documents {
        let line = format!(
            "{}: {} tile(s), geometricError {} -> {}",
            doc.path.display(),
            doc.tiles_scaled,
            doc.geometric_error_before,
            doc.geometric_error_after
        );
        if doc.written {
            output::success_detail(&line);
        } else {
            output::skipped_detail(&line);
        }
    }

    if report.tree.document_count() > 1 {
        output::info(&report.tree.to_tree());
    }
}
