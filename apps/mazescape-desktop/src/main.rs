mod gpu;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use mazescape_input::{Action, PointerEvent, PointerMapper};
use mazescape_kernel::{BacktrackerGenerator, MIN_SIDE};
use mazescape_render::{AppConfig, RenderLoop};
use mazescape_render_wgpu::Lighting;
use mazescape_tools::{FrameTimer, SceneInspector};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::gpu::Gpu;

const MAX_SIDE: usize = 101;

#[derive(Parser)]
#[command(name = "mazescape-desktop", about = "3D maze viewer")]
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
}

/// Everything that is not GPU plumbing.
struct AppState {
    rl: RenderLoop<BacktrackerGenerator>,
    pointer: PointerMapper,
    cursor: Vec2,
    /// Side used by the next regeneration.
    side: usize,
    show_inspector: bool,
    lighting: Lighting,
    timer: FrameTimer,
    last_frame: Instant,
    last_error: Option<String>,
}

impl AppState {
    fn new(config: &AppConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => BacktrackerGenerator::with_seed(seed),
            None => BacktrackerGenerator::from_entropy(),
        };
        let mut state = Self {
            rl: RenderLoop::with_tween_driver(generator, config, 16.0 / 9.0),
            pointer: PointerMapper::new(),
            cursor: Vec2::ZERO,
            side: config.maze.side,
            show_inspector: true,
            lighting: Lighting::default(),
            timer: FrameTimer::new(120),
            last_frame: Instant::now(),
            last_error: None,
        };
        // The maze starts building as soon as the window opens.
        state.apply(Action::Regenerate { side: None });
        state
    }

    fn apply(&mut self, action: Action) {
        let action = match action {
            Action::Regenerate { side: None } => Action::Regenerate {
                side: Some(self.side),
            },
            other => other,
        };
        match self.rl.handle_action(action) {
            Ok(_) => self.last_error = None,
            Err(e) => {
                tracing::warn!("regenerate rejected: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn pointer(&mut self, event: PointerEvent) {
        let action = self.pointer.map(event);
        self.apply(action);
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        self.timer.record(dt);
        self.rl.advance(dt);
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyG | KeyCode::Space => self.apply(Action::Regenerate { side: None }),
            KeyCode::F1 => self.show_inspector = !self.show_inspector,
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }
        let summary = SceneInspector::summary(&self.rl);
        let mut regenerate = false;

        egui::SidePanel::left("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Maze");
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("Side:");
                    ui.add(
                        egui::DragValue::new(&mut self.side)
                            .range(MIN_SIDE..=MAX_SIDE)
                            .speed(0.2),
                    );
                });
                // only odd sides are valid
                if self.side % 2 == 0 {
                    self.side += 1;
                }
                if ui.button("Generate (G)").clicked() {
                    regenerate = true;
                }
                if let Some(err) = &self.last_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }

                ui.separator();
                ui.label(format!(
                    "Generation {}  ({}×{}, {} walls)",
                    summary.generation, summary.side, summary.side, summary.walls
                ));
                ui.label(format!(
                    "Blocks: {} registered, {} visible",
                    summary.objects, summary.visible
                ));
                ui.label(format!(
                    "Entering {} / Standing {} / Exiting {}",
                    summary.phases.entering, summary.phases.standing, summary.phases.exiting
                ));
                ui.label(format!(
                    "Retiring {}  In flight {}",
                    summary.retiring, summary.in_flight
                ));

                ui.separator();
                ui.heading("Camera");
                ui.label(format!(
                    "Yaw {:.3}  Pitch {:.3}",
                    summary.camera_yaw, summary.camera_pitch
                ));
                let eye = self.rl.camera().position();
                ui.label(format!("Eye ({:.0}, {:.0}, {:.0})", eye.x, eye.y, eye.z));

                ui.separator();
                ui.heading("Lighting");
                ui.add(egui::Slider::new(&mut self.lighting.ambient, 0.0..=1.0).text("ambient"));
                ui.add(
                    egui::Slider::new(&mut self.lighting.intensity, 0.0..=1.0).text("directional"),
                );

                ui.separator();
                ui.label(format!(
                    "{:.0} fps (max frame {:.1} ms)",
                    self.timer.fps(),
                    self.timer.max().as_secs_f64() * 1000.0
                ));
                ui.small("LMB drag: orbit | G: generate | F1: toggle panel");
            });

        if regenerate {
            self.apply(Action::Regenerate { side: None });
        }
    }
}

struct App {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl App {
    fn new(config: &AppConfig) -> Self {
        Self {
            state: AppState::new(config),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self) {
        self.state.update();
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let state = &mut self.state;
        let full_output = gpu.run_ui(&self.egui_ctx, |ctx| state.draw_ui(ctx));
        gpu.set_lighting(self.state.lighting);
        let view = self.state.rl.camera().render_view();
        gpu.present(&self.egui_ctx, full_output, self.state.rl.scene(), &view);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Mazescape")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match Gpu::new(window, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.rl.camera_mut().set_aspect(gpu.aspect());
                gpu.window().request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            // egui gets first pick, except releases so a drag never sticks
            let release = matches!(
                event,
                WindowEvent::MouseInput {
                    state: ElementState::Released,
                    ..
                }
            );
            if gpu.on_window_event(&event) && !release {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                    self.state.rl.camera_mut().set_aspect(gpu.aspect());
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = Vec2::new(position.x as f32, position.y as f32);
                let Vec2 { x, y } = self.state.cursor;
                self.state.pointer(PointerEvent::Move { x, y });
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => {
                        let Vec2 { x, y } = self.state.cursor;
                        PointerEvent::Down { x, y }
                    }
                    ElementState::Released => PointerEvent::Up,
                };
                self.state.pointer(event);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window().request_redraw();
        }
    }
}

fn main() -> Result<()> {
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

    tracing::info!(side = config.maze.side, "mazescape-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
