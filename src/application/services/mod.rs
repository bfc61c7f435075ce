//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Renderer)
//! but are themselves concrete structs, not traits.

mod convert;
mod sundial;

pub use convert::ConvertService;
pub use sundial::{LoadReport, SundialService};
