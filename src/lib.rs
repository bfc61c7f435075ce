//! sundial: hierarchical argument maps as a radial, drill-down chart
//!
//! Layers, innermost first:
//! - `domain`: records, hierarchy, radial layout, navigation (no I/O)
//! - `application`: load/navigate and convert services
//! - `infrastructure`: filesystem, renderers, wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
