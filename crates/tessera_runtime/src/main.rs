//! Tessera Runtime
//!
//! Headless binary that loads settings, builds the demo world and drives it
//! through initialize, a fixed-step update/render loop and shutdown.
//!
//! Usage: `tessera [settings.json]` (or set `TESSERA_SETTINGS`).

mod demo;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use tessera_core::ecs::World;
use tessera_core::time::FixedTimestep;
use tessera_metrics::{FrameTimer, Stopwatch};
use tessera_services::Settings;
use tracing::Level;

const FPS_WINDOW: usize = 60;

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Headless Tessera ECS demo runtime", version)]
struct Cli {
    /// Path to a JSON settings file (defaults are used when omitted)
    #[arg(env = "TESSERA_SETTINGS")]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings_path = cli.settings;
    let settings = Settings::load_or_default(settings_path.as_deref()).context("loading settings")?;

    let level: Level = settings
        .logging
        .level
        .parse()
        .with_context(|| format!("invalid log level '{}'", settings.logging.level))?;
    tracing_subscriber::fmt().with_max_level(level).init();

    tracing::info!("Tessera v{}", tessera_core::VERSION);
    match &settings_path {
        Some(path) => tracing::info!(path = %path.display(), "using settings file"),
        None => tracing::info!("using default settings"),
    }

    let mut world = World::new();
    demo::populate(&mut world, &settings.demo).context("building demo scene")?;
    world.initialize()?;

    run(&mut world, &settings)?;

    let snapshot = serde_json::to_string_pretty(&world.performance_snapshot())?;
    tracing::info!("last frame system timings:\n{snapshot}");

    world.shutdown()?;
    tracing::info!(entities = world.entity_count(), "shutdown complete");
    Ok(())
}

fn run(world: &mut World, settings: &Settings) -> Result<()> {
    let sim = &settings.simulation;
    let mut clock = FixedTimestep::new(sim.tick_rate_hz, sim.max_steps_per_frame);
    let mut timer = FrameTimer::new(FPS_WINDOW);
    let mut frame = demo::DemoFrame::default();
    let mut last = Instant::now();

    tracing::info!(frames = sim.frames, tick_rate_hz = sim.tick_rate_hz, "entering frame loop");

    for index in 0..sim.frames {
        timer.begin();
        let work = Stopwatch::start();

        let now = Instant::now();
        let steps = clock.advance(now - last);
        last = now;
        for _ in 0..steps {
            world.update(clock.dt())?;
        }

        frame.begin(index, clock.alpha());
        world.render(&mut frame)?;

        // no swapchain to block on, so pace to the tick rate by hand
        if let Some(rest) = clock.step().checked_sub(work.elapsed()) {
            thread::sleep(rest);
        }
        timer.end();

        if (index + 1) % FPS_WINDOW as u64 == 0 {
            let (min_ms, max_ms) = timer.frame_time_range_ms();
            tracing::info!(
                frame = index + 1,
                fps = format_args!("{:.1}", timer.fps()),
                frame_ms = format_args!("{:.2}", timer.frame_time_ms()),
                min_ms = format_args!("{:.2}", min_ms),
                max_ms = format_args!("{:.2}", max_ms),
                draws = frame.draw_calls,
                culled = frame.culled,
                entities = world.entity_count(),
                ticks = clock.tick_count(),
            );
        }
    }

    Ok(())
}
