//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod layout;
pub mod navigation;
pub mod outline;
pub mod parser;
pub mod tree_traits;

pub use arena::{ArgumentNode, ArgumentTree, NodeData};
pub use builder::{BuildOutput, BuildWarning, HierarchyBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult, HierarchyError, LayoutError, ParseError};
pub use layout::{
    Arc, ArcShape, LayoutConfig, LayoutOutput, LayoutWarning, RadialLayout, RenderMode,
    WeightPolicy,
};
pub use navigation::NavigationState;
pub use outline::OutlineParser;
pub use tree_traits::TreeNodeConvert;
