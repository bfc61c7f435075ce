//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ConvertService, SundialService};
use crate::config::Settings;
use crate::domain::HierarchyBuilder;
use crate::infrastructure::traits::{FileSystem, Renderer, RealFileSystem};

/// Container holding settings and shared I/O implementations.
///
/// Services are built on demand since each session owns its renderer.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Sundial session configured from settings, drawing through `renderer`.
    pub fn sundial_service<R: Renderer>(&self, renderer: R) -> SundialService<R> {
        SundialService::new(
            Arc::clone(&self.fs),
            self.settings.layout.clone(),
            HierarchyBuilder::strict(self.settings.hierarchy.strict),
            renderer,
        )
    }

    pub fn convert_service(&self) -> ConvertService {
        ConvertService::new(Arc::clone(&self.fs))
    }
}
