// component.rs - Process-wide component type registration
//
// Component ids are assigned lazily, once per Rust type, from a global
// table keyed by `TypeId`. Every World in the process sees the same id
// for the same type, and the assignment does not depend on static
// initialization order.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::any::TypeId;
use std::collections::HashMap;
use std::mem::{align_of, size_of};
use std::sync::RwLock;

pub type ComponentId = u32;

/// Metadata recorded for every registered component type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComponentMeta {
    pub id: ComponentId,
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
}

#[derive(Default)]
struct ComponentTable {
    by_type: HashMap<TypeId, ComponentId>,
    // Index is `id - 1`.
    metas: Vec<ComponentMeta>,
}

static REGISTRY: Lazy<RwLock<ComponentTable>> =
    Lazy::new(|| RwLock::new(ComponentTable::default()));

/// Register `T` and return its id. Idempotent: later calls return the
/// id assigned by the first one.
pub fn register_component<T: Component>() -> ComponentId {
    let type_id = TypeId::of::<T>();

    if let Some(&id) = REGISTRY
        .read()
        .expect("component registry lock poisoned")
        .by_type
        .get(&type_id)
    {
        return id;
    }

    let mut table = REGISTRY.write().expect("component registry lock poisoned");
    // Another thread may have registered T between the two locks.
    if let Some(&id) = table.by_type.get(&type_id) {
        return id;
    }

    let id = table.metas.len() as ComponentId + 1;
    table.metas.push(ComponentMeta {
        id,
        name: T::NAME,
        size: size_of::<T>(),
        align: align_of::<T>(),
    });
    table.by_type.insert(type_id, id);
    tracing::debug!(component = T::NAME, id, "registered component type");
    id
}

/// Look up component metadata by id.
pub fn meta_of(id: ComponentId) -> Option<ComponentMeta> {
    let index = (id as usize).checked_sub(1)?;
    REGISTRY
        .read()
        .expect("component registry lock poisoned")
        .metas
        .get(index)
        .cloned()
}

/// Look up component metadata by its display name (first match wins).
pub fn meta_of_name(name: &str) -> Option<ComponentMeta> {
    REGISTRY
        .read()
        .expect("component registry lock poisoned")
        .metas
        .iter()
        .find(|meta| meta.name == name)
        .cloned()
}

/// Plain data that can be attached to an entity.
///
/// Components are stored by value in a dense per-type array, so they
/// should stay small and free of references into the world.
pub trait Component: 'static + Sized + Send + Sync {
    /// Human-readable name for logs and debug tooling.
    const NAME: &'static str;

    /// Process-wide id for this type (registers on first use).
    #[inline]
    fn id() -> ComponentId {
        register_component::<Self>()
    }

    fn meta() -> ComponentMeta {
        let id = Self::id();
        ComponentMeta {
            id,
            name: Self::NAME,
            size: size_of::<Self>(),
            align: align_of::<Self>(),
        }
    }
}

/// Helper macro to implement the Component trait.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Copy)]
/// struct Velocity { x: f32, y: f32 }
///
/// define_component!(Velocity);
/// define_component!(Health, "CreatureHealth");
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ty) => {
        $crate::define_component!($ty, stringify!($ty));
    };
    ($ty:ty, $name:expr) => {
        impl $crate::ecs::Component for $ty {
            const NAME: &'static str = $name;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mass(#[allow(dead_code)] f32);
    crate::define_component!(Mass);

    struct Tag;
    crate::define_component!(Tag, "MarkerTag");

    #[test]
    fn registration_is_idempotent() {
        let first = register_component::<Mass>();
        let second = register_component::<Mass>();
        assert_eq!(first, second);
        assert_eq!(Mass::id(), first);
        assert_ne!(first, 0);
    }

    #[test]
    fn distinct_types_get_distinct_ids() {
        assert_ne!(Mass::id(), Tag::id());
    }

    #[test]
    fn metadata_is_queryable() {
        let id = Tag::id();
        let meta = meta_of(id).expect("Tag registered");
        assert_eq!(meta.name, "MarkerTag");
        assert_eq!(meta.size, 0);
        assert_eq!(meta_of_name("MarkerTag"), Some(meta.clone()));
        assert_eq!(Tag::meta(), meta);
        assert_eq!(meta_of(0), None);
    }
}
