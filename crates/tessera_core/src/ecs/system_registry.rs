use crate::ecs::{EcsError, EntityManager, Phase, RenderContext, System, SystemError};
use std::any::TypeId;
use std::collections::HashMap;
use std::time::Duration;
use tessera_metrics::{measure, SystemPerformance, SystemTiming};

/// Ordered set of systems, at most one per type.
///
/// Systems run in registration order for initialize, update and render,
/// and in reverse order for shutdown. Each slot carries its own timing
/// record, overwritten on every update/render call.
pub struct SystemRegistry {
    systems: Vec<RegisteredSystem>,
    lookup: HashMap<TypeId, usize>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Register `system` and return a handle to it.
    ///
    /// Adding a second instance of a type replaces the first in place,
    /// keeping its position in the run order.
    pub fn add_system<T: System>(&mut self, system: T) -> &mut T {
        let type_id = TypeId::of::<T>();
        let entry = RegisteredSystem {
            name: system.name().to_string(),
            system: Box::new(system),
            timing: SystemTiming::default(),
        };

        let index = match self.lookup.get(&type_id) {
            Some(&index) => {
                tracing::warn!(system = %entry.name, "replacing already registered system");
                self.systems[index] = entry;
                index
            }
            None => {
                tracing::info!(system = %entry.name, order = self.systems.len(), "registered system");
                self.systems.push(entry);
                self.lookup.insert(type_id, self.systems.len() - 1);
                self.systems.len() - 1
            }
        };

        let system: &mut dyn System = self.systems[index].system.as_mut();
        system
            .as_any_mut()
            .downcast_mut::<T>()
            .expect("system slot holds the type it was registered under")
    }

    pub fn get_system<T: System>(&self) -> Option<&T> {
        let index = *self.lookup.get(&TypeId::of::<T>())?;
        let system: &dyn System = self.systems[index].system.as_ref();
        system.as_any().downcast_ref::<T>()
    }

    pub fn get_system_mut<T: System>(&mut self) -> Option<&mut T> {
        let index = *self.lookup.get(&TypeId::of::<T>())?;
        let system: &mut dyn System = self.systems[index].system.as_mut();
        system.as_any_mut().downcast_mut::<T>()
    }

    pub fn has_system<T: System>(&self) -> bool {
        self.lookup.contains_key(&TypeId::of::<T>())
    }

    /// Unregister and return the system of type `T`.
    ///
    /// `shutdown` is not called; that is the caller's responsibility.
    pub fn remove_system<T: System>(&mut self) -> Option<T> {
        let index = self.lookup.remove(&TypeId::of::<T>())?;
        let entry = self.systems.remove(index);

        // Later slots shifted down by one.
        for slot in self.lookup.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }

        tracing::info!(system = %entry.name, "removed system");
        entry.system.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// System names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|entry| entry.name.as_str())
    }

    pub fn initialize_all(&mut self, entities: &mut EntityManager) -> Result<(), EcsError> {
        for entry in &mut self.systems {
            entry
                .system
                .initialize(entities)
                .map_err(|source| entry.failed(Phase::Initialize, source))?;
        }
        Ok(())
    }

    /// Run every system's update, timing each call.
    ///
    /// Stops at the first failing system. Systems that already ran keep
    /// their effects and their fresh timing; systems the loop never reached
    /// report zero for this frame.
    pub fn update_all(&mut self, dt: f32, entities: &mut EntityManager) -> Result<(), EcsError> {
        for entry in &mut self.systems {
            entry.timing.record_update(Duration::ZERO);
        }
        for entry in &mut self.systems {
            let system = &mut entry.system;
            let (result, elapsed) = measure(|| system.update(dt, &mut *entities));
            entry.timing.record_update(elapsed);
            tracing::trace!(system = %entry.name, elapsed_us = elapsed.as_micros() as u64, "update");
            result.map_err(|source| entry.failed(Phase::Update, source))?;
        }
        Ok(())
    }

    pub fn render_all(
        &mut self,
        ctx: &mut dyn RenderContext,
        entities: &mut EntityManager,
    ) -> Result<(), EcsError> {
        for entry in &mut self.systems {
            entry.timing.record_render(Duration::ZERO);
        }
        for entry in &mut self.systems {
            let system = &mut entry.system;
            let (result, elapsed) = measure(|| system.render(&mut *ctx, &mut *entities));
            entry.timing.record_render(elapsed);
            tracing::trace!(system = %entry.name, elapsed_us = elapsed.as_micros() as u64, "render");
            result.map_err(|source| entry.failed(Phase::Render, source))?;
        }
        Ok(())
    }

    /// Shut systems down, last registered first.
    pub fn shutdown_all(&mut self, entities: &mut EntityManager) -> Result<(), EcsError> {
        for entry in self.systems.iter_mut().rev() {
            entry
                .system
                .shutdown(entities)
                .map_err(|source| entry.failed(Phase::Shutdown, source))?;
        }
        Ok(())
    }

    /// Most recent frame's timings, in run order.
    pub fn performance_snapshot(&self) -> Vec<SystemPerformance> {
        self.systems
            .iter()
            .map(|entry| SystemPerformance::new(entry.name.clone(), &entry.timing))
            .collect()
    }

    /// Timing record for a single system type.
    pub fn timing_of<T: System>(&self) -> Option<SystemTiming> {
        let index = *self.lookup.get(&TypeId::of::<T>())?;
        Some(self.systems[index].timing)
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

struct RegisteredSystem {
    name: String,
    system: Box<dyn System>,
    timing: SystemTiming,
}

impl RegisteredSystem {
    fn failed(&self, phase: Phase, source: SystemError) -> EcsError {
        tracing::error!(system = %self.name, %phase, error = %source, "system failed");
        EcsError::SystemFailed {
            system: self.name.clone(),
            phase,
            source,
        }
    }
}
