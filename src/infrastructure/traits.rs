//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations and presentation, allowing
//! services to be tested with mock implementations.

use std::io;
use std::path::Path;

use crate::domain::{ArgumentNode, ArgumentTree, LayoutOutput};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Read raw file contents.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Presentation collaborator notified by the sundial service.
///
/// Calls arrive synchronously; each layout replaces the previous one.
pub trait Renderer {
    /// A new hierarchy was loaded.
    fn on_hierarchy_ready(&mut self, tree: &ArgumentTree);

    /// Geometry for the focused subtree.
    fn on_layout_computed(&mut self, layout: &LayoutOutput);

    /// Focus moved; `can_go_back` drives the back affordance.
    fn on_navigation_changed(&mut self, current: &ArgumentNode, can_go_back: bool);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.ensure_parent(path)?;
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

/// Renderer that ignores every event.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn on_hierarchy_ready(&mut self, _tree: &ArgumentTree) {}

    fn on_layout_computed(&mut self, _layout: &LayoutOutput) {}

    fn on_navigation_changed(&mut self, _current: &ArgumentNode, _can_go_back: bool) {}
}
