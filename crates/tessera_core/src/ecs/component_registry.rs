// component_registry.rs - Type-erased directory of component stores
//
// One `ComponentStore<T>` per component type, created lazily on first use
// and owned here for the lifetime of the registry. Bulk operations (entity
// destruction, inspection) go through the object-safe `ErasedStore`
// interface; typed access narrows back to the concrete store with a
// checked downcast.

use crate::ecs::{Component, ComponentId, ComponentMeta, ComponentStore, EcsError, Entity};
use std::any::Any;
use std::collections::HashMap;

/// Non-generic view of a component store.
pub trait ErasedStore: Any + Send + Sync {
    /// Metadata of the component type held by this store.
    fn meta(&self) -> ComponentMeta;

    /// Drop the entity's component if present. Returns whether one was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn contains(&self, entity: Entity) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dense owner list of the store.
    fn owners(&self) -> &[Entity];

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn meta(&self) -> ComponentMeta {
        T::meta()
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.has(entity)
    }

    fn len(&self) -> usize {
        self.count()
    }

    fn owners(&self) -> &[Entity] {
        ComponentStore::owners(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owns one store per component type, keyed by [`ComponentId`].
#[derive(Default)]
pub struct ComponentRegistry {
    stores: HashMap<ComponentId, Box<dyn ErasedStore>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            stores: HashMap::new(),
        }
    }

    /// Typed store for `T`, or `None` if no `T` was ever added.
    pub fn store<T: Component>(&self) -> Result<Option<&ComponentStore<T>>, EcsError> {
        let id = T::id();
        match self.stores.get(&id) {
            Some(store) => narrow::<T>(id, store.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    pub fn store_mut<T: Component>(&mut self) -> Result<Option<&mut ComponentStore<T>>, EcsError> {
        let id = T::id();
        match self.stores.get_mut(&id) {
            Some(store) => narrow_mut::<T>(id, store.as_mut()).map(Some),
            None => Ok(None),
        }
    }

    /// Typed store for `T`, creating an empty one on first access.
    pub fn store_or_insert<T: Component>(&mut self) -> Result<&mut ComponentStore<T>, EcsError> {
        let id = T::id();
        let store = self.stores.entry(id).or_insert_with(|| {
            tracing::debug!(component = T::NAME, id, "created component store");
            Box::new(ComponentStore::<T>::new())
        });
        narrow_mut::<T>(id, store.as_mut())
    }

    /// Type-erased access for tooling that only knows the id.
    pub fn erased(&self, id: ComponentId) -> Option<&dyn ErasedStore> {
        self.stores.get(&id).map(|store| store.as_ref())
    }

    /// Purge `entity` from every store. Returns how many components were dropped.
    pub fn remove_entity_from_all_stores(&mut self, entity: Entity) -> usize {
        self.stores
            .values_mut()
            .map(|store| store.remove_entity(entity))
            .filter(|removed| *removed)
            .count()
    }

    /// Metadata of every store created so far, ordered by id.
    pub fn component_types(&self) -> Vec<ComponentMeta> {
        let mut metas: Vec<ComponentMeta> = self.stores.values().map(|store| store.meta()).collect();
        metas.sort_by_key(|meta| meta.id);
        metas
    }

    /// Metadata of every component currently attached to `entity`, ordered by id.
    pub fn components_of(&self, entity: Entity) -> Vec<ComponentMeta> {
        let mut metas: Vec<ComponentMeta> = self
            .stores
            .values()
            .filter(|store| store.contains(entity))
            .map(|store| store.meta())
            .collect();
        metas.sort_by_key(|meta| meta.id);
        metas
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }
}

fn narrow<T: Component>(id: ComponentId, store: &dyn ErasedStore) -> Result<&ComponentStore<T>, EcsError> {
    store
        .as_any()
        .downcast_ref::<ComponentStore<T>>()
        .ok_or(EcsError::StoreTypeMismatch {
            id,
            component: T::NAME,
        })
}

fn narrow_mut<T: Component>(
    id: ComponentId,
    store: &mut dyn ErasedStore,
) -> Result<&mut ComponentStore<T>, EcsError> {
    store
        .as_any_mut()
        .downcast_mut::<ComponentStore<T>>()
        .ok_or(EcsError::StoreTypeMismatch {
            id,
            component: T::NAME,
        })
}
