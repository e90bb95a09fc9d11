//! Armature3D demo: spins the robot on the headless backend.

mod robot_app;

use std::process::ExitCode;
use clap::Parser;
use armature_3d_engine::armature3d::{Engine, Error, Result};
use armature_3d_engine::armature3d::framework::Framework;
use armature_3d_engine::armature3d::log::{DefaultLogger, LogSeverity, SeverityFilter};
use armature_3d_engine::armature3d::render::{Config, HeadlessRenderer};
use armature_3d_engine::armature3d::resource::ResourceManager;
use armature_3d_engine::armature3d::scene::{InitialisePolicy, SceneGraphConfig, UpdateMode};
use armature_3d_engine::glam::Vec4;
use armature_3d_engine::{engine_error, engine_info};
use robot_app::{airplane_source, RobotApp};

/// Render the robot scene for a number of frames
#[derive(Parser, Debug)]
#[command(name = "armature3d_demo", version, about)]
struct Args {
    /// Number of frames to render
    #[arg(long, default_value_t = 720)]
    frames: u64,

    /// Rotation angle added each frame (the robot turns angle * PI / 360 radians)
    #[arg(long, default_value_t = 1.0)]
    angle_step: f32,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Background colour as r,g,b,a
    #[arg(long, value_delimiter = ',', num_args = 4)]
    background: Option<Vec<f32>>,

    /// Compose nested graph transforms instead of broadcasting the root's
    #[arg(long)]
    hierarchical: bool,

    /// Shut down already initialised nodes when one fails to initialise
    #[arg(long)]
    rollback: bool,

    /// Log debug messages
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn scene_config(&self) -> SceneGraphConfig {
        SceneGraphConfig {
            update_mode: if self.hierarchical { UpdateMode::Hierarchical } else { UpdateMode::Broadcast },
            initialise_policy: if self.rollback {
                InitialisePolicy::RollbackOnFailure
            } else {
                InitialisePolicy::FailFast
            },
        }
    }

    fn background(&self) -> Option<Vec4> {
        match self.background.as_deref() {
            Some(&[r, g, b, a]) => Some(Vec4::new(r, g, b, a)),
            _ => None,
        }
    }

    fn renderer_config(&self) -> Config {
        Config {
            app_name: "Armature3D Robot".to_string(),
            width: self.width,
            height: self.height,
            ..Config::default()
        }
    }
}

fn run(args: &Args) -> Result<()> {
    Engine::initialize()?;
    // The demo never reads the command trace
    Engine::create_renderer(HeadlessRenderer::new(args.renderer_config()).with_command_limit(0))?;

    let mut resources = ResourceManager::new();
    resources.add_mesh_source(airplane_source());
    Engine::install_resource_manager(resources)?;

    let mut framework = Framework::from_engine(RobotApp::new(args.angle_step), args.scene_config())?;
    let result = framework.initialise()
        .and_then(|()| match args.background() {
            Some(colour) => framework.set_background_colour(colour),
            None => Ok(()),
        })
        .and_then(|()| framework.run(args.frames));
    framework.shutdown();

    if result.is_ok() {
        let stats = Engine::renderer()?
            .lock()
            .map(|renderer| renderer.stats())
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))?;
        engine_info!("armature3d_demo", "{} frames, {} draw calls and {} triangles per frame, {} bytes uploaded",
            stats.frames, stats.draw_calls, stats.triangles, stats.gpu_memory_used);
        engine_info!("armature3d_demo", "Final rotation {:.3} rad", framework.application().rotation());
    }
    result
}

fn main() -> ExitCode {
    let args = Args::parse();
    let min_severity = if args.verbose { LogSeverity::Debug } else { LogSeverity::Info };
    Engine::set_logger(SeverityFilter::new(DefaultLogger, min_severity));

    let result = run(&args);
    Engine::shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            engine_error!("armature3d_demo", "{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
