//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::RescaleService;
use crate::config::Settings;
use crate::infrastructure::traits::{ConsolePrompter, FileSystem, Prompter, RealFileSystem};

/// Container holding application settings and I/O boundaries.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Overwrite confirmation
    pub prompter: Arc<dyn Prompter>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(ConsolePrompter),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            prompter,
        }
    }

    /// Build the rescale service from the container's dependencies.
    pub fn rescale_service(&self) -> RescaleService {
        RescaleService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.prompter),
            Arc::clone(&self.settings),
        )
    }
}
