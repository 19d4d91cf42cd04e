//! WebGPU rendering module
//!
//! The game state becomes a `DrawList`, the draw list becomes triangles, and
//! `RenderState` puts the triangles on whatever surface the front end made.

pub mod draw_list;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use draw_list::{Circle, DrawList, Rect};
pub use pipeline::{RenderError, RenderState, SurfaceRecovery};
pub use vertex::Vertex;
