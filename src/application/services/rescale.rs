//! Tileset rescaling service
//!
//! Loads a tileset, scales every geometric error, writes it back and then
//! follows external tileset references, one document at a time.
//!
//! ```text
//! tileset.json ──scale──> write ──> tiles/a.json ──scale──> write ──> ...
//!                                └─> tiles/b.json ──scale──> write
//! ```
//!
//! Nothing is rolled back: when a later document fails, the ones before it
//! have already been written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use termtree::Tree;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{scale_tileset, DomainError, Tileset};
use crate::infrastructure::traits::{FileSystem, Prompter};

/// Per-run options, taken from the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescaleOptions {
    /// Multiplier applied to every geometric error
    pub factor: f64,
    /// Overwrite existing files without asking
    pub overwrite: bool,
    /// Scale and follow references, but neither prompt nor write
    pub dry_run: bool,
}

/// What happened to a single tileset document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub tiles_scaled: usize,
    pub geometric_error_before: f64,
    pub geometric_error_after: f64,
    pub references: usize,
    pub written: bool,
}

/// Documents reached from a tileset through external references.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTree {
    pub path: PathBuf,
    pub children: Vec<DocumentTree>,
}

impl DocumentTree {
    pub fn to_tree(&self) -> Tree<String> {
        Tree::new(self.path.display().to_string())
            .with_leaves(self.children.iter().map(DocumentTree::to_tree))
    }

    /// Number of documents in the tree, the root included.
    pub fn document_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DocumentTree::document_count)
            .sum::<usize>()
    }
}

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct RescaleReport {
    /// Documents in processing order
    pub documents: Vec<DocumentReport>,
    pub tree: DocumentTree,
}

impl RescaleReport {
    pub fn tiles_scaled(&self) -> usize {
        self.documents.iter().map(|d| d.tiles_scaled).sum()
    }

    pub fn files_written(&self) -> usize {
        self.documents.iter().filter(|d| d.written).count()
    }
}

/// Service for rescaling tileset hierarchies on disk.
pub struct RescaleService {
    fs: Arc<dyn FileSystem>,
    prompter: Arc<dyn Prompter>,
    settings: Arc<Settings>,
}

impl RescaleService {
    /// Create a new rescale service.
    pub fn new(fs: Arc<dyn FileSystem>, prompter: Arc<dyn Prompter>, settings: Arc<Settings>) -> Self {
        Self {
            fs,
            prompter,
            settings,
        }
    }

    /// Rescale the tileset at `path` and, transitively, every external
    /// tileset it references.
    ///
    /// # Errors
    /// - `NotFound` if `path` or a referenced tileset does not exist
    /// - `Domain(InvalidTileset)` if a document is not a valid tileset
    /// - `Domain(CycleDetected)` if a reference leads back to an ancestor
    /// - `OverwriteDeclined` if the user refuses to overwrite a file
    #[instrument(level = "debug", skip(self))]
    pub fn process(&self, path: &Path, options: &RescaleOptions) -> ApplicationResult<RescaleReport> {
        let mut documents = Vec::new();
        let mut chain = Vec::new();

        let tree = self.process_document(path, options, &mut chain, &mut documents)?;
        info!(
            "rescaled {} document(s) by {}",
            documents.len(),
            options.factor
        );

        Ok(RescaleReport { documents, tree })
    }

    fn process_document(
        &self,
        path: &Path,
        options: &RescaleOptions,
        chain: &mut Vec<PathBuf>,
        documents: &mut Vec<DocumentReport>,
    ) -> ApplicationResult<DocumentTree> {
        debug!("process_document: path={}", path.display());
        if !self.fs.exists(path) {
            return Err(ApplicationError::NotFound(path.to_path_buf()));
        }

        let canonical = self
            .fs
            .canonicalize(path)
            .with_path_context("canonicalize", path)?;
        if chain.contains(&canonical) {
            return Err(DomainError::CycleDetected(path.to_path_buf()).into());
        }

        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read tileset", path)?;
        let mut tileset = Tileset::from_json(&text).map_err(|e| DomainError::InvalidTileset {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let before = tileset.geometric_error;
        let outcome = scale_tileset(&mut tileset, options.factor, &self.settings.reference_suffix);
        debug!(
            "process_document: scaled {} tiles, {} external reference(s)",
            outcome.tiles_scaled,
            outcome.references.len()
        );

        let written = if options.dry_run {
            false
        } else {
            self.confirm_overwrite(path, options.overwrite)?;
            self.save(path, &tileset)?;
            true
        };

        documents.push(DocumentReport {
            path: path.to_path_buf(),
            tiles_scaled: outcome.tiles_scaled,
            geometric_error_before: before,
            geometric_error_after: tileset.geometric_error,
            references: outcome.references.len(),
            written,
        });
        drop(tileset);

        chain.push(canonical);
        let mut children = Vec::with_capacity(outcome.references.len());
        for reference in &outcome.references {
            let target = resolve_reference(path, reference);
            children.push(self.process_document(&target, options, chain, documents)?);
        }
        chain.pop();

        Ok(DocumentTree {
            path: path.to_path_buf(),
            children,
        })
    }

    /// Ask before replacing an existing file unless `overwrite` is set.
    fn confirm_overwrite(&self, path: &Path, overwrite: bool) -> ApplicationResult<()> {
        if overwrite || !self.fs.exists(path) {
            return Ok(());
        }

        let message = format!(
            "Tileset file '{}' already exists. Overwrite and lose original contents? Y = yes, N = no",
            path.display()
        );
        let answer = self
            .prompter
            .ask(&message)
            .with_path_context("read confirmation", path)?;

        if is_affirmative(&answer) {
            Ok(())
        } else {
            debug!("confirm_overwrite: declined with {:?}", answer);
            Err(ApplicationError::OverwriteDeclined(path.to_path_buf()))
        }
    }

    fn save(&self, path: &Path, tileset: &Tileset) -> ApplicationResult<()> {
        let json = tileset
            .to_json(self.settings.pretty)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("serialize tileset {}", path.display()),
                source: Box::new(e),
            })?;
        self.fs
            .write(path, &json)
            .with_path_context("write tileset", path)
    }
}

/// Relative references are relative to the referencing tileset's directory.
fn resolve_reference(tileset_path: &Path, reference: &str) -> PathBuf {
    let reference = Path::new(reference);
    if reference.is_absolute() {
        return reference.to_path_buf();
    }
    match tileset_path.parent() {
        Some(dir) => dir.join(reference),
        None => reference.to_path_buf(),
    }
}

/// Only a single `y` (any case) confirms; the line terminator is ignored.
fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_end_matches(&['\r', '\n'][..])
        .eq_ignore_ascii_case("y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("y\n", true)]
    #[case("Y\n", true)]
    #[case("y\r\n", true)]
    #[case("y", true)]
    #[case("n\n", false)]
    #[case("yes\n", false)]
    #[case(" y\n", false)]
    #[case("", false)]
    fn test_is_affirmative(#[case] answer: &str, #[case] expected: bool) {
        assert_eq!(is_affirmative(answer), expected);
    }

    #[test]
    fn given_relative_reference_when_resolving_then_joins_tileset_directory() {
        let resolved = resolve_reference(Path::new("data/tileset.json"), "tiles/0.json");
        assert_eq!(resolved, PathBuf::from("data/tiles/0.json"));
    }

    #[test]
    fn given_bare_tileset_name_when_resolving_then_reference_is_unchanged() {
        let resolved = resolve_reference(Path::new("tileset.json"), "child.json");
        assert_eq!(resolved, PathBuf::from("child.json"));
    }

    #[cfg(unix)]
    #[test]
    fn given_absolute_reference_when_resolving_then_used_as_is() {
        let resolved = resolve_reference(Path::new("data/tileset.json"), "/srv/tiles/a.json");
        assert_eq!(resolved, PathBuf::from("/srv/tiles/a.json"));
    }

    #[test]
    fn given_nested_tree_when_rendering_then_lists_every_document() {
        let tree = DocumentTree {
            path: PathBuf::from("tileset.json"),
            children: vec![DocumentTree {
                path: PathBuf::from("a.json"),
                children: vec![DocumentTree {
                    path: PathBuf::from("b.json"),
                    children: vec![],
                }],
            }],
        };

        let rendered = tree.to_tree().to_string();

        assert_eq!(tree.document_count(), 3);
        assert!(rendered.starts_with("tileset.json"));
        assert!(rendered.contains("a.json"));
        assert!(rendered.contains("b.json"));
    }
}
