use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use glam::Vec2;
use mazescape_input::{Action, PointerEvent};
use mazescape_kernel::{BacktrackerGenerator, MazeGenerator};
use mazescape_render::{AppConfig, DebugTextRenderer, RenderLoop};
use mazescape_tools::{FrameTimer, SceneInspector};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mazescape-cli", about = "Headless tools for the maze scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the maze side (odd, at least 5)
    #[arg(long)]
    side: Option<usize>,

    /// Override the generator seed
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and effective configuration
    Info,
    /// Print a generated maze as ASCII
    Generate {
        /// Number of mazes to print
        #[arg(short, long, default_value = "1")]
        count: usize,
    },
    /// Run the frame loop without a window
    Simulate {
        /// Number of frames to advance
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Simulated frame length in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        /// Regenerate every N frames (0 = only at start)
        #[arg(long, default_value = "0")]
        regenerate_every: u64,
        /// Drag the camera this many pixels sideways during the run
        #[arg(long, default_value = "0")]
        drag: f32,
        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
        /// Print the debug render of the last frame
        #[arg(long)]
        dump: bool,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn generator(config: &AppConfig) -> BacktrackerGenerator {
    match config.seed {
        Some(seed) => BacktrackerGenerator::with_seed(seed),
        None => BacktrackerGenerator::from_entropy(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(side) = cli.side {
        config.maze.side = side;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;

    match cli.command {
        Commands::Info => {
            println!("mazescape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "maze: side={} thickness={} enter={}ms exit={}ms stagger={}ms easing={:?}",
                config.maze.side,
                config.maze.thickness,
                config.maze.enter_ms,
                config.maze.exit_ms,
                config.maze.column_stagger_ms,
                config.maze.easing
            );
            println!(
                "orbit: distance={:.1} sensitivity={} smoothing={}",
                config.orbit_distance(),
                config.orbit.sensitivity,
                config.orbit.smoothing
            );
            match config.seed {
                Some(seed) => println!("seed: {seed}"),
                None => println!("seed: (entropy)"),
            }
        }
        Commands::Generate { count } => {
            let mut generator = generator(&config);
            for i in 0..count {
                let grid = generator.generate(config.maze.side);
                if i > 0 {
                    println!();
                }
                print!("{}", grid.render_ascii());
                println!("walls={} open={}", grid.wall_count(), grid.open_count());
            }
        }
        Commands::Simulate {
            frames,
            frame_ms,
            regenerate_every,
            drag,
            json,
            dump,
        } => {
            let dt = Duration::from_millis(frame_ms.max(1));
            let mut rl = RenderLoop::with_tween_driver(generator(&config), &config, 16.0 / 9.0);
            let renderer = DebugTextRenderer::with_max_objects(16);
            let mut timer = FrameTimer::new(120);

            rl.handle_action(Action::Regenerate { side: None })?;
            if drag != 0.0 {
                rl.handle_action(PointerEvent::Down { x: 0.0, y: 0.0 }.into())?;
            }

            let mut last = String::new();
            for frame in 1..=frames {
                if regenerate_every > 0 && frame % regenerate_every == 0 {
                    let report = rl.handle_action(Action::Regenerate { side: None })?;
                    tracing::debug!(?report, frame, "scheduled regeneration");
                }
                if drag != 0.0 {
                    let x = drag * frame as f32 / frames as f32;
                    rl.handle_action(Action::UpdateDrag(Vec2::new(x, 0.0)))?;
                }

                let start = std::time::Instant::now();
                last = rl.step(dt, &renderer);
                timer.record(start.elapsed());
            }
            if drag != 0.0 {
                rl.handle_action(PointerEvent::Up.into())?;
            }

            let summary = SceneInspector::summary(&rl);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
                println!(
                    "frame cost: avg={:?} max={:?} min={:?}",
                    timer.average(),
                    timer.max(),
                    timer.min()
                );
            }
            if dump {
                print!("{last}");
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
