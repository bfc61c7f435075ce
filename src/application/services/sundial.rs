//! Argument map session service
//!
//! Owns the loaded tree and its navigation state, and pushes hierarchy,
//! navigation and layout updates to a renderer.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    parser, ArgumentNode, ArgumentTree, BuildWarning, DomainError, HierarchyBuilder, HierarchyError,
    LayoutConfig, LayoutError, LayoutOutput, NavigationState, ParseWarning, RadialLayout,
};
use crate::infrastructure::traits::{FileSystem, Renderer};

/// Summary of one successful load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Rows turned into records
    pub records: usize,
    /// Distinct argument ids
    pub arguments: usize,
    /// Arguments reachable from the root
    pub reachable: usize,
    pub parse_warnings: Vec<ParseWarning>,
    pub build_warnings: Vec<BuildWarning>,
}

impl LoadReport {
    pub fn has_warnings(&self) -> bool {
        !self.parse_warnings.is_empty() || !self.build_warnings.is_empty()
    }

    /// All warnings, parse warnings first, as display strings.
    pub fn warnings(&self) -> Vec<String> {
        self.parse_warnings
            .iter()
            .map(ToString::to_string)
            .chain(self.build_warnings.iter().map(ToString::to_string))
            .collect()
    }
}

struct Session {
    tree: ArgumentTree,
    nav: NavigationState,
    layout: LayoutOutput,
}

/// Service driving one argument map through a renderer.
pub struct SundialService<R: Renderer> {
    fs: Arc<dyn FileSystem>,
    builder: HierarchyBuilder,
    layout: RadialLayout,
    renderer: R,
    session: Option<Session>,
}

impl<R: Renderer> SundialService<R> {
    /// Create a new service; nothing is loaded yet.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        layout: LayoutConfig,
        builder: HierarchyBuilder,
        renderer: R,
    ) -> Self {
        Self {
            fs,
            builder,
            layout: RadialLayout::new(layout),
            renderer,
            session: None,
        }
    }

    /// Read and load an argument table from disk.
    pub fn load_file(&mut self, path: &Path) -> ApplicationResult<LoadReport> {
        debug!("load_file: {}", path.display());
        let raw = self
            .fs
            .read_to_string(path)
            .with_path_context("read argument table", path)?;
        self.load_input(&raw)
    }

    /// Parse and build a new hierarchy, replacing any previous one.
    ///
    /// Navigation is reset to the new root. On error the previous map stays loaded.
    pub fn load_input(&mut self, raw_text: &str) -> ApplicationResult<LoadReport> {
        let parsed = parser::parse(raw_text)?;
        let built = self.builder.build(&parsed.records)?;
        let root = built.tree.root().ok_or(HierarchyError::RootNotFound)?;
        let output = self.layout.layout_focus(&built.tree, root)?;

        let report = LoadReport {
            records: parsed.records.len(),
            arguments: built.tree.len(),
            reachable: built.tree.reachable_count(),
            parse_warnings: parsed.warnings,
            build_warnings: built.warnings,
        };
        info!(
            "loaded {} arguments ({} reachable, {} warnings)",
            report.arguments,
            report.reachable,
            report.parse_warnings.len() + report.build_warnings.len()
        );

        let session = self.session.insert(Session {
            tree: built.tree,
            nav: NavigationState::new(root),
            layout: LayoutOutput::default(),
        });
        self.renderer.on_hierarchy_ready(&session.tree);
        Self::publish(&mut self.renderer, session, output)?;
        Ok(report)
    }

    /// Drill into the argument with `node_id`.
    pub fn request_focus(&mut self, node_id: &str) -> ApplicationResult<()> {
        let session = self.session.as_ref().ok_or(ApplicationError::NotLoaded)?;
        let idx = session
            .tree
            .find(node_id)
            .ok_or_else(|| DomainError::UnknownNode(node_id.to_string()))?;
        if !session.tree.is_reachable(idx) {
            return Err(DomainError::Unreachable(node_id.to_string()).into());
        }
        let mut nav = session.nav.clone();
        nav.focus(idx);
        self.navigate(nav)
    }

    /// Drill into whatever arc lies under a polar point of the current chart.
    ///
    /// Returns the focused id, or None when the point hits no arc.
    pub fn request_focus_at(&mut self, radius: f64, angle: f64) -> ApplicationResult<Option<String>> {
        let session = self.session.as_ref().ok_or(ApplicationError::NotLoaded)?;
        let Some(node_id) = session
            .layout
            .arc_at(radius, angle)
            .map(|arc| arc.node_id.clone())
        else {
            return Ok(None);
        };
        self.request_focus(&node_id)?;
        Ok(Some(node_id))
    }

    /// Go back to the previous focus. Returns false when there is nothing to go back to.
    pub fn request_back(&mut self) -> ApplicationResult<bool> {
        let session = self.session.as_ref().ok_or(ApplicationError::NotLoaded)?;
        let mut nav = session.nav.clone();
        if !nav.go_back() {
            warn!("nothing to go back to");
            return Ok(false);
        }
        self.navigate(nav)?;
        Ok(true)
    }

    /// Drop the navigation history and focus the root again.
    pub fn request_root(&mut self) -> ApplicationResult<()> {
        let session = self.session.as_ref().ok_or(ApplicationError::NotLoaded)?;
        let root = session.tree.root().ok_or(HierarchyError::RootNotFound)?;
        let mut nav = session.nav.clone();
        nav.reset(root);
        self.navigate(nav)
    }

    /// Lay out the focus of `nav` and, only if that succeeds, make it current.
    fn navigate(&mut self, nav: NavigationState) -> ApplicationResult<()> {
        let session = self.session.as_mut().ok_or(ApplicationError::NotLoaded)?;
        let output = self.layout.layout_focus(&session.tree, nav.current())?;
        session.nav = nav;
        Self::publish(&mut self.renderer, session, output)
    }

    /// Hand a computed layout for the session's focus to the renderer.
    fn publish(renderer: &mut R, session: &mut Session, output: LayoutOutput) -> ApplicationResult<()> {
        let current = session.nav.current();
        let node = session
            .tree
            .get_node(current)
            .ok_or(LayoutError::StaleNode)?;
        debug!(
            "publish: focus={} depth={} arcs={}",
            node.id(),
            session.nav.depth(),
            output.arcs.len()
        );

        renderer.on_navigation_changed(node, session.nav.can_go_back());
        renderer.on_layout_computed(&output);
        session.layout = output;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    pub fn tree(&self) -> Option<&ArgumentTree> {
        self.session.as_ref().map(|s| &s.tree)
    }

    pub fn navigation(&self) -> Option<&NavigationState> {
        self.session.as_ref().map(|s| &s.nav)
    }

    pub fn current(&self) -> Option<&ArgumentNode> {
        let session = self.session.as_ref()?;
        session.tree.get_node(session.nav.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.nav.can_go_back())
    }

    /// Layout produced by the last navigation.
    pub fn last_layout(&self) -> Option<&LayoutOutput> {
        self.session.as_ref().map(|s| &s.layout)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::render::SnapshotRenderer;
    use crate::infrastructure::traits::RealFileSystem;

    const TABLE: &str = "id,text,parent_id,weight,sentiment\n\
                         1,Root,,1,1\n\
                         2,Pro,1,1,1\n\
                         3,Con,1,1,2\n\
                         4,Deeper,2,1,1\n";

    fn loaded() -> SundialService<SnapshotRenderer> {
        let mut service = SundialService::new(
            Arc::new(RealFileSystem),
            LayoutConfig::default(),
            HierarchyBuilder::new(),
            SnapshotRenderer::default(),
        );
        service.load_input(TABLE).unwrap();
        service
    }

    fn break_layout(service: &mut SundialService<SnapshotRenderer>) {
        service.layout = RadialLayout::new(LayoutConfig {
            max_radius: 0.0,
            ..LayoutConfig::default()
        });
    }

    #[test]
    fn given_failing_layout_when_focusing_then_navigation_unchanged() {
        let mut service = loaded();
        break_layout(&mut service);

        let result = service.request_focus("2");

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::Layout(LayoutError::InvalidRadius { .. })))
        ));
        assert_eq!(service.current().unwrap().id(), "1");
        assert!(!service.can_go_back());
        assert_eq!(service.renderer().current.as_ref().map(|n| n.id.as_str()), Some("1"));
        assert_eq!(service.last_layout().unwrap().arcs.len(), 3);
    }

    #[test]
    fn given_failing_layout_when_going_back_then_stays_on_focus() {
        let mut service = loaded();
        service.request_focus("2").unwrap();
        break_layout(&mut service);

        assert!(service.request_back().is_err());
        assert!(service.request_root().is_err());

        assert_eq!(service.current().unwrap().id(), "2");
        assert_eq!(service.navigation().unwrap().depth(), 1);
        assert_eq!(service.last_layout().unwrap().arcs.len(), 1);
    }
}
