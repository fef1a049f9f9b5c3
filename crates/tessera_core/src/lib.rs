//! Tessera Core
//!
//! Contains the fundamental simulation pieces:
//! - Entity Component System (ECS)
//! - Built-in spatial and rendering components
//! - Fixed-step simulation clock

pub mod components;
pub mod ecs;
pub mod time;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
