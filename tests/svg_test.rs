//! Tests for SVG rendering through the service

use std::sync::Arc;

use sundial::application::services::SundialService;
use sundial::domain::{HierarchyBuilder, LayoutConfig, RenderMode};
use sundial::infrastructure::svg::{SvgRenderer, SvgStyle};
use sundial::infrastructure::traits::RealFileSystem;

const DEBATE: &str = include_str!("resources/arguments/debate.csv");

fn service(layout: LayoutConfig) -> SundialService<SvgRenderer> {
    let renderer = SvgRenderer::new(SvgStyle::default(), layout.max_radius);
    SundialService::new(
        Arc::new(RealFileSystem),
        layout,
        HierarchyBuilder::new(),
        renderer,
    )
}

#[test]
fn given_loaded_map_when_rendering_then_one_path_per_arc() {
    // Arrange
    let mut service = service(LayoutConfig::default());

    // Act
    service.load_input(DEBATE).unwrap();

    // Assert
    let svg = service.renderer().document().unwrap();
    assert_eq!(svg.matches("<path").count(), 5);
    assert!(svg.contains("width=\"600\""));
    assert!(svg.contains("Text: Cleaner air | Weight: 3"));
    assert!(svg.contains("fill=\"rgba(0, 128, 0, 0.7)\""));
    assert!(svg.contains("fill=\"rgba(255, 0, 0, 0.9)\""));
    assert!(svg.contains(">Should cities ban cars downtown?</text>"));
}

#[test]
fn given_focus_when_rendering_then_document_shows_subtree() {
    let mut service = service(LayoutConfig::default());
    service.load_input(DEBATE).unwrap();

    service.request_focus("3").unwrap();

    let svg = service.renderer().document().unwrap();
    assert_eq!(svg.matches("<path").count(), 2);
    assert!(svg.contains("data-id=\"5\""));
    assert!(!svg.contains("data-id=\"2\""));
    assert!(svg.contains(">Hurts local shops</text>"));
}

#[test]
fn given_ring_mode_when_only_child_then_draws_annulus() {
    let mut service = service(LayoutConfig {
        render_mode: RenderMode::SingleSliceRing,
        ..LayoutConfig::default()
    });
    service.load_input(DEBATE).unwrap();

    service.request_focus("2").unwrap();

    let svg = service.renderer().document().unwrap();
    assert_eq!(svg.matches("<path").count(), 1);
    // two full circles, each drawn as two half arcs
    assert_eq!(svg.matches("0 1 0").count(), 4);
}
