//! Canvas model: the replayable action log, the replay engine that projects
//! it onto a drawing surface, and the local drawing tool.
//!
//! The rasterizing surface itself is an external capability behind the
//! [`surface::DrawingSurface`] trait; everything in this crate is
//! host-agnostic and runs the same headless, in a browser shell, or under
//! tests.

pub mod log;
pub mod replay;
pub mod surface;
pub mod tool;

pub use log::{ActionLog, Applied};
pub use replay::Replayer;
pub use surface::{DrawingSurface, MemorySurface, Primitive};
pub use tool::{DrawingTool, ToolKind};
