//! Entity Component System core types.
//!
//! Entities are generational handles, components live in per-type sparse
//! sets owned by a type-erased [`ComponentRegistry`], and systems are
//! trait objects driven through four phases by a [`SystemRegistry`]. The
//! [`World`] ties the pieces together and is the surface gameplay code uses.

mod component;
mod component_registry;
mod entity;
mod entity_manager;
mod error;
mod store;
mod system;
mod system_registry;
mod world;

pub use component::{meta_of, meta_of_name, register_component, Component, ComponentId, ComponentMeta};
pub use component_registry::{ComponentRegistry, ErasedStore};
pub use entity::{Entity, EntityId, EntityRegistry, Generation};
pub use entity_manager::EntityManager;
pub use error::EcsError;
pub use store::ComponentStore;
pub use system::{AsAny, Phase, RenderContext, System, SystemError, SystemResult};
pub use system_registry::SystemRegistry;
pub use world::World;
