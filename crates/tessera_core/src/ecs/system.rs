//! System lifecycle contract.
//!
//! A system is a stateful plugin invoked once per phase per frame. Only
//! [`System::update`] is mandatory; the other phases default to no-ops.
//! Systems never own components: each phase call borrows the world's
//! [`EntityManager`] for its duration.

use crate::ecs::EntityManager;
use std::any::{type_name, Any};
use std::fmt;

/// Error type returned by system phase callbacks.
pub type SystemError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type SystemResult = Result<(), SystemError>;

/// Upcast helpers so trait objects can be narrowed back to their concrete type.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Whatever the rendering backend hands to the render phase.
///
/// The core treats it as opaque; render systems narrow it to the
/// backend's concrete type with [`downcast_mut`](trait.RenderContext.html#method.downcast_mut).
pub trait RenderContext: AsAny + 'static {
    /// Monotonic index of the frame being recorded.
    fn frame_index(&self) -> u64;
}

impl dyn RenderContext {
    pub fn downcast_ref<T: RenderContext>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: RenderContext>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// The four points in a world's lifecycle at which systems run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initialize,
    Update,
    Render,
    Shutdown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initialize => "initialize",
            Phase::Update => "update",
            Phase::Render => "render",
            Phase::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// Per-frame logic unit.
///
/// # Example
/// ```ignore
/// struct Gravity;
///
/// impl System for Gravity {
///     fn update(&mut self, dt: f32, entities: &mut EntityManager) -> SystemResult {
///         for body in entities.components_mut::<RigidBody>()? {
///             body.velocity.y -= 9.81 * dt;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait System: AsAny + 'static {
    /// Display name used in logs and performance snapshots.
    fn name(&self) -> &str {
        short_type_name(self.type_name())
    }

    /// Called once by [`World::initialize`](crate::ecs::World::initialize).
    fn initialize(&mut self, _entities: &mut EntityManager) -> SystemResult {
        Ok(())
    }

    fn update(&mut self, dt: f32, entities: &mut EntityManager) -> SystemResult;

    fn render(&mut self, _ctx: &mut dyn RenderContext, _entities: &mut EntityManager) -> SystemResult {
        Ok(())
    }

    /// Called in reverse registration order by [`World::shutdown`](crate::ecs::World::shutdown).
    fn shutdown(&mut self, _entities: &mut EntityManager) -> SystemResult {
        Ok(())
    }
}

/// `a::b::Foo<c::Bar>` -> `Foo`
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
