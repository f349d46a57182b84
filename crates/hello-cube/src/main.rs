use anyhow::{Context, Result};
use log::LevelFilter;

use cube_engine::device::{Gpu, GpuInit};
use cube_engine::logging::{LoggingConfig, init_logging, parse_driver_level};
use cube_engine::render::render_frame;
use cube_engine::resource::ResourceScope;
use cube_engine::scene::{Scene, SceneAssets};
use cube_engine::time::{FrameLoop, SystemClock};
use cube_engine::window::{RuntimeConfig, WinitEvents};

/// Overrides the verbosity of forwarded GPU driver messages (default: trace).
const DRIVER_LOG_ENV: &str = "HELLO_CUBE_DRIVER_LOG";

fn main() -> Result<()> {
    let driver_level = std::env::var(DRIVER_LOG_ENV)
        .ok()
        .and_then(|v| parse_driver_level(&v))
        .unwrap_or(LevelFilter::Trace);

    let _logging = init_logging(LoggingConfig {
        driver_level: Some(driver_level),
        ..Default::default()
    });

    let config = RuntimeConfig::default();
    let target_hz = config.target_hz;

    let mut events = WinitEvents::new(config)?;
    let window = events.window()?;

    let mut gpu = pollster::block_on(Gpu::new(window, GpuInit::default()))
        .context("GPU initialization failed")?;
    gpu.configure_surface()?;

    let mut scene_scope = ResourceScope::new("scene");
    let mut scene = Scene::build(&gpu, &mut scene_scope, &SceneAssets::cube())
        .context("failed to build cube scene")?;

    events.show();

    let stats = FrameLoop::new(SystemClock::new(), target_hz).run(
        &mut events,
        &scene_scope,
        |scope| {
            render_frame(&gpu, &mut scene, scope)?;
            Ok(())
        },
    )?;

    log::info!(
        "rendered {} frames in {} ticks over {} iterations",
        scene.frame(),
        stats.ticks,
        stats.iterations
    );

    drop(scene);
    scene_scope.close()?;
    Ok(())
}
