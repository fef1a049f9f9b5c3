// entity_manager.rs - Entity ids plus their component stores
//
// This is the object systems receive during every phase call. All entity
// and component traffic from gameplay code ends up here.

use crate::ecs::{
    Component, ComponentId, ComponentMeta, ComponentRegistry, ComponentStore, EcsError, Entity,
    EntityId, EntityRegistry,
};

/// Entity allocator and component registry, owned together by a World.
#[derive(Default)]
pub struct EntityManager {
    entities: EntityRegistry,
    components: ComponentRegistry,
}

impl EntityManager {
    pub fn new() -> Self {
        Self {
            entities: EntityRegistry::new(),
            components: ComponentRegistry::new(),
        }
    }

    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.create();
        tracing::debug!(entity = entity.id(), generation = entity.generation(), "created entity");
        entity
    }

    /// Destroy `entity` and every component attached to it.
    ///
    /// Invalid, stale and already-destroyed handles are ignored; the return
    /// value reports whether anything was destroyed.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }

        let dropped = self.components.remove_entity_from_all_stores(entity);
        self.entities.destroy(entity);
        tracing::debug!(entity = entity.id(), components = dropped, "destroyed entity");
        true
    }

    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Current live handle for a raw id.
    pub fn resolve(&self, id: EntityId) -> Option<Entity> {
        self.entities.resolve(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.live_count()
    }

    /// Live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        self.components.store_or_insert::<T>()?.add(entity, component)?;
        tracing::debug!(entity = entity.id(), component = T::NAME, "added component");
        Ok(())
    }

    /// Detach and return the entity's `T`. Missing components and dead
    /// entities are not errors.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<Option<T>, EcsError> {
        let removed = self
            .components
            .store_mut::<T>()?
            .and_then(|store| store.remove(entity));
        if removed.is_some() {
            tracing::debug!(entity = entity.id(), component = T::NAME, "removed component");
        }
        Ok(removed)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.ensure_alive(entity)?;
        match self.components.store::<T>()? {
            Some(store) => store.get(entity),
            None => Err(EcsError::ComponentNotFound {
                entity,
                component: T::NAME,
            }),
        }
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.ensure_alive(entity)?;
        match self.components.store_mut::<T>()? {
            Some(store) => store.get_mut(entity),
            None => Err(EcsError::ComponentNotFound {
                entity,
                component: T::NAME,
            }),
        }
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
            && matches!(self.components.store::<T>(), Ok(Some(store)) if store.has(entity))
    }

    /// True if the entity holds every listed component type.
    pub fn has_all(&self, entity: Entity, ids: &[ComponentId]) -> bool {
        self.entities.is_alive(entity)
            && ids.iter().all(|&id| {
                self.components
                    .erased(id)
                    .is_some_and(|store| store.contains(entity))
            })
    }

    pub fn component_count<T: Component>(&self) -> usize {
        match self.components.store::<T>() {
            Ok(Some(store)) => store.count(),
            _ => 0,
        }
    }

    /// Dense slice of every `T` (empty if none were ever added).
    pub fn components<T: Component>(&self) -> Result<&[T], EcsError> {
        Ok(self
            .components
            .store::<T>()?
            .map(ComponentStore::all)
            .unwrap_or_default())
    }

    pub fn components_mut<T: Component>(&mut self) -> Result<&mut [T], EcsError> {
        Ok(self
            .components
            .store_mut::<T>()?
            .map(ComponentStore::all_mut)
            .unwrap_or_default())
    }

    /// Owners of every `T`, index-aligned with [`components`](Self::components).
    pub fn entities_with<T: Component>(&self) -> Result<&[Entity], EcsError> {
        Ok(self
            .components
            .store::<T>()?
            .map(ComponentStore::owners)
            .unwrap_or_default())
    }

    /// Snapshot of the entities holding every listed component type.
    ///
    /// Returns an owned list so callers can add, remove or destroy while
    /// walking it without invalidating store indices.
    pub fn matching_entities(&self, ids: &[ComponentId]) -> Vec<Entity> {
        let mut stores = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.components.erased(id) {
                Some(store) => stores.push(store),
                None => return Vec::new(),
            }
        }

        // Drive the scan from the smallest store.
        let Some(smallest) = stores.iter().min_by_key(|store| store.len()) else {
            return Vec::new();
        };

        smallest
            .owners()
            .iter()
            .copied()
            .filter(|&entity| stores.iter().all(|store| store.contains(entity)))
            .collect()
    }

    /// Typed store access for bulk work (`None` if `T` was never added).
    pub fn store<T: Component>(&self) -> Result<Option<&ComponentStore<T>>, EcsError> {
        self.components.store::<T>()
    }

    pub fn store_mut<T: Component>(&mut self) -> Result<Option<&mut ComponentStore<T>>, EcsError> {
        self.components.store_mut::<T>()
    }

    /// Metadata of every component currently attached to `entity`.
    pub fn components_of(&self, entity: Entity) -> Vec<ComponentMeta> {
        if !self.entities.is_alive(entity) {
            return Vec::new();
        }
        self.components.components_of(entity)
    }

    pub fn component_types(&self) -> Vec<ComponentMeta> {
        self.components.component_types()
    }

    pub fn entity_registry(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn component_registry(&self) -> &ComponentRegistry {
        &self.components
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if self.entities.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::StaleEntity { entity })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    crate::define_component!(Position);

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
    }
    crate::define_component!(Velocity);

    #[derive(Debug, Clone, PartialEq)]
    struct Frozen;
    crate::define_component!(Frozen);

    #[test]
    fn destroy_purges_all_components() {
        let mut em = EntityManager::new();
        let e = em.create_entity();
        em.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
        em.add_component(e, Velocity { x: 0.0, y: 1.0 }).unwrap();

        assert!(em.destroy_entity(e));
        assert!(!em.has_component::<Position>(e));
        assert!(!em.has_component::<Velocity>(e));
        assert_eq!(em.component_count::<Position>(), 0);
        assert_eq!(em.component_count::<Velocity>(), 0);
        assert_eq!(em.entity_count(), 0);
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut em = EntityManager::new();
        let old = em.create_entity();
        em.add_component(old, Position { x: 0.0, y: 0.0 }).unwrap();
        em.destroy_entity(old);

        let new = em.create_entity();
        assert_eq!(new.id(), old.id());
        em.add_component(new, Position { x: 5.0, y: 5.0 }).unwrap();

        assert!(!em.has_component::<Position>(old));
        assert!(matches!(
            em.get_component::<Position>(old),
            Err(EcsError::StaleEntity { .. })
        ));
        assert!(matches!(
            em.add_component(old, Velocity { x: 0.0, y: 0.0 }),
            Err(EcsError::StaleEntity { .. })
        ));
        assert!(!em.destroy_entity(old));
        assert_eq!(em.get_component::<Position>(new).unwrap().x, 5.0);
    }

    #[test]
    fn stale_remove_leaves_recycled_entity_alone() {
        let mut em = EntityManager::new();
        let old = em.create_entity();
        em.add_component(old, Position { x: 1.0, y: 1.0 }).unwrap();
        em.destroy_entity(old);

        let new = em.create_entity();
        assert_eq!(new.id(), old.id());
        em.add_component(new, Position { x: 9.0, y: 9.0 }).unwrap();

        assert_eq!(em.remove_component::<Position>(old).unwrap(), None);
        assert!(em.has_component::<Position>(new));
        assert_eq!(em.get_component::<Position>(new).unwrap(), &Position { x: 9.0, y: 9.0 });
        assert_eq!(em.component_count::<Position>(), 1);
    }

    #[test]
    fn missing_component_is_not_found() {
        let mut em = EntityManager::new();
        let e = em.create_entity();
        assert!(matches!(
            em.get_component::<Velocity>(e),
            Err(EcsError::ComponentNotFound { component: "Velocity", .. })
        ));
        assert_eq!(em.remove_component::<Velocity>(e).unwrap(), None);
    }

    #[test]
    fn get_component_mut_writes_through() {
        let mut em = EntityManager::new();
        let e = em.create_entity();
        em.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();

        em.get_component_mut::<Position>(e).unwrap().x = 3.0;
        assert_eq!(em.get_component::<Position>(e).unwrap().x, 3.0);
    }

    #[test]
    fn bulk_views_are_index_aligned() {
        let mut em = EntityManager::new();
        let a = em.create_entity();
        let b = em.create_entity();
        em.add_component(a, Velocity { x: 1.0, y: 0.0 }).unwrap();
        em.add_component(b, Velocity { x: 2.0, y: 0.0 }).unwrap();

        for v in em.components_mut::<Velocity>().unwrap() {
            v.y = v.x * 10.0;
        }

        let owners = em.entities_with::<Velocity>().unwrap().to_vec();
        let values = em.components::<Velocity>().unwrap();
        for (owner, value) in owners.iter().zip(values) {
            assert_eq!(em.get_component::<Velocity>(*owner).unwrap(), value);
            assert_eq!(value.y, value.x * 10.0);
        }
        assert!(em.components::<Frozen>().unwrap().is_empty());
    }

    #[test]
    fn matching_entities_intersects_stores() {
        let mut em = EntityManager::new();
        let moving = em.create_entity();
        let still = em.create_entity();
        let frozen = em.create_entity();

        for &e in &[moving, still, frozen] {
            em.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        }
        em.add_component(moving, Velocity { x: 1.0, y: 0.0 }).unwrap();
        em.add_component(frozen, Velocity { x: 1.0, y: 0.0 }).unwrap();
        em.add_component(frozen, Frozen).unwrap();

        let ids = [Position::id(), Velocity::id()];
        let mut matched = em.matching_entities(&ids);
        matched.sort();
        assert_eq!(matched, vec![moving, frozen]);

        assert!(em.has_all(frozen, &[Position::id(), Velocity::id(), Frozen::id()]));
        assert!(!em.has_all(moving, &[Frozen::id()]));

        // destroying while walking a snapshot is safe
        for e in em.matching_entities(&[Frozen::id()]) {
            em.destroy_entity(e);
        }
        assert_eq!(em.matching_entities(&ids), vec![moving]);
        assert!(em.matching_entities(&[]).is_empty());
    }

    #[test]
    fn inspection_reports_attached_types() {
        let mut em = EntityManager::new();
        let e = em.create_entity();
        em.add_component(e, Frozen).unwrap();

        let names: Vec<&str> = em.components_of(e).iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Frozen"]);
        em.destroy_entity(e);
        assert!(em.components_of(e).is_empty());
    }
}
