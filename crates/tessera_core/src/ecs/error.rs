use crate::ecs::{ComponentId, Entity, Phase, SystemError};
use thiserror::Error;

/// Errors surfaced by entity, component and system operations.
#[derive(Debug, Error)]
pub enum EcsError {
    #[error("entity {entity} already has a {component} component")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {entity} has no {component} component")]
    ComponentNotFound {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {entity:?} is not alive")]
    StaleEntity { entity: Entity },

    #[error("component store {id} does not hold {component} values")]
    StoreTypeMismatch {
        id: ComponentId,
        component: &'static str,
    },

    #[error("system '{system}' failed during {phase}")]
    SystemFailed {
        system: String,
        phase: Phase,
        #[source]
        source: SystemError,
    },
}
