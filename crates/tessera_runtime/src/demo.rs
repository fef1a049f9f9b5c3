//! Demo scene: a ring of spinning meshes, a few short-lived props and one
//! camera, rendered into a counting backend.

use tessera_core::components::{Camera, Renderable, Transform};
use tessera_core::ecs::{
    Component, EcsError, Entity, EntityManager, RenderContext, System, SystemResult, World,
};
use tessera_core::glam::{Mat4, Quat, Vec3};
use tessera_services::settings::DemoSettings;

const RING_RADIUS: f32 = 8.0;

/// Seconds left before the entity is destroyed.
#[derive(Debug, Clone, Copy)]
pub struct Lifetime(pub f32);
tessera_core::define_component!(Lifetime);

/// Stand-in for a GPU backend: records what would have been drawn.
#[derive(Debug, Default)]
pub struct DemoFrame {
    pub index: u64,
    pub alpha: f32,
    pub eye: Vec3,
    pub view_projection: Mat4,
    pub draw_calls: usize,
    pub culled: usize,
}

impl DemoFrame {
    pub fn begin(&mut self, index: u64, alpha: f32) {
        self.index = index;
        self.alpha = alpha;
        self.draw_calls = 0;
        self.culled = 0;
    }
}

impl RenderContext for DemoFrame {
    fn frame_index(&self) -> u64 {
        self.index
    }
}

/// Rotates every renderable's transform about +Y.
pub struct SpinSystem {
    pub speed_deg: f32,
}

impl System for SpinSystem {
    fn update(&mut self, dt: f32, entities: &mut EntityManager) -> SystemResult {
        let step = Quat::from_rotation_y((self.speed_deg * dt).to_radians());
        for entity in entities.matching_entities(&[Transform::id(), Renderable::id()]) {
            let transform = entities.get_component_mut::<Transform>(entity)?;
            transform.set_rotation(step * transform.rotation);
        }
        Ok(())
    }
}

/// Counts down [`Lifetime`]s and destroys expired entities.
#[derive(Default)]
pub struct ExpirySystem {
    pub expired: usize,
}

impl System for ExpirySystem {
    fn update(&mut self, dt: f32, entities: &mut EntityManager) -> SystemResult {
        for lifetime in entities.components_mut::<Lifetime>()? {
            lifetime.0 -= dt;
        }

        // snapshot first, destroying swaps slots around
        let mut doomed = Vec::new();
        if let Some(store) = entities.store::<Lifetime>()? {
            doomed.extend(store.iter().filter(|(_, l)| l.0 <= 0.0).map(|(e, _)| e));
        }
        for entity in doomed {
            entities.destroy_entity(entity);
            self.expired += 1;
        }
        Ok(())
    }

    fn shutdown(&mut self, _entities: &mut EntityManager) -> SystemResult {
        tracing::info!(expired = self.expired, "expiry system done");
        Ok(())
    }
}

/// Picks the highest-priority active camera and loads its matrices into the frame.
#[derive(Default)]
pub struct CameraSystem {
    current: Option<Entity>,
}

impl CameraSystem {
    fn select(entities: &EntityManager) -> Result<Option<Entity>, EcsError> {
        let owners = entities.entities_with::<Camera>()?;
        let cameras = entities.components::<Camera>()?;
        Ok(owners
            .iter()
            .zip(cameras)
            .filter(|(_, camera)| camera.should_render())
            .max_by_key(|(_, camera)| camera.priority)
            .map(|(&entity, _)| entity))
    }
}

impl System for CameraSystem {
    fn initialize(&mut self, entities: &mut EntityManager) -> SystemResult {
        self.current = Self::select(entities)?;
        if self.current.is_none() {
            tracing::warn!("no active camera in scene");
        }
        Ok(())
    }

    fn update(&mut self, _dt: f32, entities: &mut EntityManager) -> SystemResult {
        self.current = Self::select(entities)?;
        Ok(())
    }

    fn render(&mut self, ctx: &mut dyn RenderContext, entities: &mut EntityManager) -> SystemResult {
        let Some(entity) = self.current else {
            return Ok(());
        };
        let camera = *entities.get_component::<Camera>(entity)?;
        let transform = *entities.get_component::<Transform>(entity)?;
        let frame = ctx
            .downcast_mut::<DemoFrame>()
            .ok_or("camera system needs a DemoFrame")?;

        frame.eye = transform.position;
        frame.view_projection = camera.view_projection(transform.position, transform.forward(), transform.up());
        Ok(())
    }
}

/// Culls renderables against the camera distance and counts draws.
#[derive(Default)]
pub struct RenderSystem {
    pub total_draws: u64,
}

impl System for RenderSystem {
    fn update(&mut self, _dt: f32, _entities: &mut EntityManager) -> SystemResult {
        Ok(())
    }

    fn render(&mut self, ctx: &mut dyn RenderContext, entities: &mut EntityManager) -> SystemResult {
        let frame = ctx
            .downcast_mut::<DemoFrame>()
            .ok_or("render system needs a DemoFrame")?;

        let ids = [Transform::id(), Renderable::id()];
        for entity in entities.matching_entities(&ids) {
            let position = entities.get_component::<Transform>(entity)?.position;
            let renderable = entities.get_component::<Renderable>(entity)?;
            if renderable.should_render(frame.eye.distance(position)) {
                frame.draw_calls += 1;
            } else {
                frame.culled += 1;
            }
        }
        self.total_draws += frame.draw_calls as u64;
        Ok(())
    }

    fn shutdown(&mut self, _entities: &mut EntityManager) -> SystemResult {
        tracing::info!(total_draws = self.total_draws, "render system done");
        Ok(())
    }
}

/// Fill `world` with the demo scene and register its systems.
pub fn populate(world: &mut World, settings: &DemoSettings) -> Result<(), EcsError> {
    let count = settings.entity_count.max(1);
    for i in 0..count {
        let angle = i as f32 / count as f32 * std::f32::consts::TAU;
        let entity = world.create_entity();
        world.add_component(
            entity,
            Transform::from_position(Vec3::new(angle.cos() * RING_RADIUS, 0.0, angle.sin() * RING_RADIUS)),
        )?;
        let mut renderable = Renderable::new("meshes/cube.obj").with_material(i % 4);
        // every fourth mesh is only visible up close
        if i % 4 == 3 {
            renderable.lod_distance = RING_RADIUS;
        }
        world.add_component(entity, renderable)?;
        if i % 5 == 0 {
            world.add_component(entity, Lifetime(0.5 + i as f32 * 0.1))?;
        }
    }

    let camera = world.create_entity();
    world.add_component(camera, Transform::from_position(Vec3::new(0.0, 4.0, 20.0)))?;
    world.add_component(camera, Camera::default())?;

    world.add_system(SpinSystem {
        speed_deg: settings.spin_speed_deg,
    });
    world.add_system(ExpirySystem::default());
    world.add_system(CameraSystem::default());
    world.add_system(RenderSystem::default());

    tracing::info!(entities = world.entity_count(), systems = world.system_count(), "demo scene ready");
    Ok(())
}
