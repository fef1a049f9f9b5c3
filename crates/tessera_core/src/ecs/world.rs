// world.rs - Composition root for entities, components and systems
//
// A World owns exactly one EntityManager and one SystemRegistry and is the
// only surface gameplay and rendering code talks to. It adds no behaviour
// of its own: entity/component calls forward to the EntityManager and the
// four phase calls hand that same EntityManager to the SystemRegistry.

use crate::ecs::{
    Component, EcsError, Entity, EntityManager, RenderContext, System, SystemRegistry,
};
use tessera_metrics::SystemPerformance;

/// The main ECS world.
///
/// Not `Clone`: duplicating entity and system state has no defined meaning.
/// Moving a World moves both registries with it.
#[derive(Default)]
pub struct World {
    entities: EntityManager,
    systems: SystemRegistry,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityManager::new(),
            systems: SystemRegistry::new(),
        }
    }

    // ---- entities ----

    pub fn create_entity(&mut self) -> Entity {
        self.entities.create_entity()
    }

    /// Destroy an entity and purge it from every component store.
    ///
    /// Invalid or already-destroyed handles are ignored.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.entities.destroy_entity(entity)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.entity_count()
    }

    // ---- components ----

    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        self.entities.add_component(entity, component)
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<Option<T>, EcsError> {
        self.entities.remove_component::<T>(entity)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.entities.get_component::<T>(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.entities.get_component_mut::<T>(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.entities.has_component::<T>(entity)
    }

    pub fn get_component_count<T: Component>(&self) -> usize {
        self.entities.component_count::<T>()
    }

    // ---- systems ----

    pub fn add_system<T: System>(&mut self, system: T) -> &mut T {
        self.systems.add_system(system)
    }

    pub fn get_system<T: System>(&self) -> Option<&T> {
        self.systems.get_system::<T>()
    }

    pub fn get_system_mut<T: System>(&mut self) -> Option<&mut T> {
        self.systems.get_system_mut::<T>()
    }

    pub fn remove_system<T: System>(&mut self) -> Option<T> {
        self.systems.remove_system::<T>()
    }

    pub fn has_system<T: System>(&self) -> bool {
        self.systems.has_system::<T>()
    }

    pub fn system_count(&self) -> usize {
        self.systems.system_count()
    }

    // ---- phases ----

    pub fn initialize(&mut self) -> Result<(), EcsError> {
        tracing::info!(systems = self.systems.system_count(), "initializing world");
        self.systems.initialize_all(&mut self.entities)
    }

    pub fn update(&mut self, dt: f32) -> Result<(), EcsError> {
        self.systems.update_all(dt, &mut self.entities)
    }

    pub fn render(&mut self, ctx: &mut dyn RenderContext) -> Result<(), EcsError> {
        self.systems.render_all(ctx, &mut self.entities)
    }

    pub fn shutdown(&mut self) -> Result<(), EcsError> {
        tracing::info!(systems = self.systems.system_count(), "shutting down world");
        self.systems.shutdown_all(&mut self.entities)
    }

    /// Last frame's per-system timings, in run order.
    pub fn performance_snapshot(&self) -> Vec<SystemPerformance> {
        self.systems.performance_snapshot()
    }

    // ---- advanced access ----

    pub fn entity_manager(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entity_manager_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn system_registry(&self) -> &SystemRegistry {
        &self.systems
    }

    pub fn system_registry_mut(&mut self) -> &mut SystemRegistry {
        &mut self.systems
    }
}
