//! End-to-end behaviour of a World driven through its public surface.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use tessera_core::components::{Renderable, Transform};
use tessera_core::ecs::{
    Component, EcsError, Entity, EntityManager, Phase, RenderContext, System, SystemResult, World,
};
use tessera_core::glam::Vec3;

/// Moves every visible renderable along +X at 0.1 units per second.
struct Drift;

impl System for Drift {
    fn update(&mut self, dt: f32, entities: &mut EntityManager) -> SystemResult {
        let ids = [Transform::id(), Renderable::id()];
        for entity in entities.matching_entities(&ids) {
            if !entities.get_component::<Renderable>(entity)?.visible {
                continue;
            }
            entities.get_component_mut::<Transform>(entity)?.translate(Vec3::new(0.1 * dt, 0.0, 0.0));
        }
        Ok(())
    }
}

type Log = Rc<RefCell<Vec<&'static str>>>;

macro_rules! tagged_system {
    ($name:ident) => {
        struct $name(Log);

        impl System for $name {
            fn update(&mut self, _dt: f32, _entities: &mut EntityManager) -> SystemResult {
                self.0.borrow_mut().push(concat!(stringify!($name), ".update"));
                Ok(())
            }

            fn shutdown(&mut self, _entities: &mut EntityManager) -> SystemResult {
                self.0.borrow_mut().push(concat!(stringify!($name), ".shutdown"));
                Ok(())
            }
        }
    };
}

tagged_system!(S1);
tagged_system!(S2);
tagged_system!(S3);

struct Counting {
    frame: u64,
    draws: usize,
}

impl RenderContext for Counting {
    fn frame_index(&self) -> u64 {
        self.frame
    }
}

struct DrawVisible;

impl System for DrawVisible {
    fn update(&mut self, _dt: f32, _entities: &mut EntityManager) -> SystemResult {
        Ok(())
    }

    fn render(&mut self, ctx: &mut dyn RenderContext, entities: &mut EntityManager) -> SystemResult {
        let visible = entities
            .components::<Renderable>()?
            .iter()
            .filter(|r| r.should_render(0.0))
            .count();
        let frame = ctx.downcast_mut::<Counting>().ok_or("unexpected render context")?;
        frame.draws += visible;
        Ok(())
    }
}

#[test]
fn consecutive_entities_are_distinct_and_valid() {
    let mut world = World::new();
    let a = world.create_entity();
    let b = world.create_entity();
    assert_ne!(a, b);
    assert_ne!(a, Entity::INVALID);
    assert_ne!(b, Entity::INVALID);
    assert_ne!(a.id(), 0);
}

#[test]
fn destroyed_ids_are_reused_first_in_first_out() {
    let mut world = World::new();
    let a = world.create_entity();
    let b = world.create_entity();
    world.destroy_entity(a);
    world.destroy_entity(b);

    assert_eq!(world.create_entity().id(), a.id());
    assert_eq!(world.create_entity().id(), b.id());
}

#[test]
fn destroy_clears_transform_and_renderable() {
    let mut world = World::new();
    let e = world.create_entity();
    world
        .add_component(e, Transform::from_position(Vec3::new(1.0, 2.0, 3.0)))
        .unwrap();
    world.add_component(e, Renderable::new("x.obj")).unwrap();
    assert_eq!(world.get_component_count::<Transform>(), 1);
    assert_eq!(world.get_component_count::<Renderable>(), 1);

    world.destroy_entity(e);
    assert_eq!(world.get_component_count::<Transform>(), 0);
    assert_eq!(world.get_component_count::<Renderable>(), 0);
    assert!(!world.has_component::<Transform>(e));
    assert!(!world.has_component::<Renderable>(e));
}

#[test]
fn duplicate_component_keeps_original() {
    let mut world = World::new();
    let e = world.create_entity();
    world.add_component(e, Renderable::new("first.obj")).unwrap();

    let err = world.add_component(e, Renderable::new("second.obj")).unwrap_err();
    assert!(matches!(err, EcsError::DuplicateComponent { .. }));
    assert_eq!(world.get_component::<Renderable>(e).unwrap().mesh_path, "first.obj");
}

#[test]
fn drift_moves_visible_renderables_by_a_tenth_per_second() {
    let mut world = World::new();
    let shown = world.create_entity();
    let hidden = world.create_entity();
    for &e in &[shown, hidden] {
        world.add_component(e, Transform::from_position(Vec3::new(1.0, 0.0, 0.0))).unwrap();
    }
    world.add_component(shown, Renderable::new("x.obj")).unwrap();
    world
        .add_component(
            hidden,
            Renderable {
                visible: false,
                ..Renderable::new("y.obj")
            },
        )
        .unwrap();

    world.add_system(Drift);
    world.initialize().unwrap();
    world.update(1.0).unwrap();

    let x = world.get_component::<Transform>(shown).unwrap().position.x;
    assert!((x - 1.1).abs() < 1e-6);
    assert_eq!(world.get_component::<Transform>(hidden).unwrap().position.x, 1.0);
}

#[test]
fn update_runs_in_order_and_shutdown_in_reverse() {
    let log = Log::default();
    let mut world = World::new();
    world.add_system(S1(log.clone()));
    world.add_system(S2(log.clone()));
    world.add_system(S3(log.clone()));

    world.update(0.016).unwrap();
    world.shutdown().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "S1.update",
            "S2.update",
            "S3.update",
            "S3.shutdown",
            "S2.shutdown",
            "S1.shutdown",
        ]
    );
}

#[test]
fn render_reaches_the_concrete_context() {
    let mut world = World::new();
    for mesh in ["a.obj", "b.obj"] {
        let e = world.create_entity();
        world.add_component(e, Renderable::new(mesh)).unwrap();
    }
    world.add_system(DrawVisible);

    let mut frame = Counting { frame: 1, draws: 0 };
    world.render(&mut frame).unwrap();
    assert_eq!(frame.draws, 2);
    assert_eq!(frame.frame_index(), 1);
}

struct Slow;

impl System for Slow {
    fn update(&mut self, _dt: f32, _entities: &mut EntityManager) -> SystemResult {
        thread::sleep(Duration::from_millis(15));
        Ok(())
    }
}

#[test]
fn performance_snapshot_is_per_frame() {
    let mut world = World::new();
    world.add_system(Slow);

    for _ in 0..3 {
        world.update(0.016).unwrap();
    }
    let snapshot = world.performance_snapshot();
    assert_eq!(snapshot[0].name, "Slow");
    assert!(snapshot[0].update_time_ms >= 15.0);
    // three frames of 15ms would be at least 45ms if accumulated
    assert!(snapshot[0].update_time_ms < 45.0);
}

struct Broken;

impl System for Broken {
    fn update(&mut self, _dt: f32, _entities: &mut EntityManager) -> SystemResult {
        Ok(())
    }

    fn shutdown(&mut self, _entities: &mut EntityManager) -> SystemResult {
        Err("device lost".into())
    }
}

#[test]
fn failing_system_surfaces_to_the_caller() {
    let mut world = World::new();
    world.add_system(Broken);

    let err = world.shutdown().unwrap_err();
    assert!(matches!(
        err,
        EcsError::SystemFailed { ref system, phase: Phase::Shutdown, .. } if system == "Broken"
    ));
    assert!(err.to_string().contains("Broken"));
}
