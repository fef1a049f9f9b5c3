//! Built-in components shared by gameplay and rendering systems.

mod camera;
mod renderable;
mod transform;

pub use camera::{Camera, Projection};
pub use renderable::Renderable;
pub use transform::Transform;
