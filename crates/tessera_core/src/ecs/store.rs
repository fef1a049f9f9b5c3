// store.rs - Sparse-set storage for a single component type
//
// Components live in a dense Vec for cache-friendly iteration. A parallel
// Vec records the owning entity of each slot, and a hash map resolves an
// entity back to its slot. Removal swaps the last slot into the hole, so
// dense order is NOT stable across removals.

use crate::ecs::{Component, EcsError, Entity};
use std::collections::HashMap;

/// Dense storage for every `T` attached to an entity.
///
/// Invariant: for every slot `i`, `owners[i]` owns `components[i]` and
/// `index[owners[i]] == i`.
pub struct ComponentStore<T: Component> {
    components: Vec<T>,
    owners: Vec<Entity>,
    index: HashMap<Entity, usize>,
}

impl<T: Component> ComponentStore<T> {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            owners: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Attach `value` to `entity`.
    ///
    /// Fails with [`EcsError::DuplicateComponent`] if the entity already
    /// has a `T`; the stored value is left untouched in that case.
    pub fn add(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        if self.index.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: T::NAME,
            });
        }

        let slot = self.components.len();
        self.components.push(value);
        self.owners.push(entity);
        self.index.insert(entity, slot);
        Ok(())
    }

    /// Detach and return the entity's `T`. Absent components are not an error.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.index.remove(&entity)?;

        // swap_remove moves the last element into `slot` (if it wasn't last)
        let removed = self.components.swap_remove(slot);
        self.owners.swap_remove(slot);
        if let Some(&moved) = self.owners.get(slot) {
            self.index.insert(moved, slot);
        }

        Some(removed)
    }

    pub fn get(&self, entity: Entity) -> Result<&T, EcsError> {
        self.index
            .get(&entity)
            .map(|&slot| &self.components[slot])
            .ok_or(EcsError::ComponentNotFound {
                entity,
                component: T::NAME,
            })
    }

    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        match self.index.get(&entity) {
            Some(&slot) => Ok(&mut self.components[slot]),
            None => Err(EcsError::ComponentNotFound {
                entity,
                component: T::NAME,
            }),
        }
    }

    #[inline]
    pub fn has(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Dense slot of the entity's component, if any.
    pub fn slot_of(&self, entity: Entity) -> Option<usize> {
        self.index.get(&entity).copied()
    }

    /// All components in dense order (index-aligned with [`owners`](Self::owners)).
    #[inline]
    pub fn all(&self) -> &[T] {
        &self.components
    }

    #[inline]
    pub fn all_mut(&mut self) -> &mut [T] {
        &mut self.components
    }

    /// Owning entity of each dense slot.
    #[inline]
    pub fn owners(&self) -> &[Entity] {
        &self.owners
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.components.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.components.iter_mut())
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
