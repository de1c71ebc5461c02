//! Opens a window and logs every input edge the input manager sees

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use input_state::AppConfig;
use input_state::config::WindowConfig;
use input_state::health;
use input_state::input::{
    Button, InputCollector, InputManager, Key, MouseButton, SharedCollector,
};

/// Input state probe
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config profile to load (defaults to APP_PROFILE, then "release")
    #[arg(long)]
    profile: Option<String>,

    /// Run the health checks and exit with the report's exit code
    #[arg(long)]
    health: bool,
}

struct Probe {
    config: AppConfig,
    window: Option<Window>,
    collector: SharedCollector,
    input: InputManager,
}

impl Probe {
    fn new(config: AppConfig) -> anyhow::Result<Self> {
        info!(profile = %config.profile, "Starting input probe");
        info!(?config.input, "Input configuration");

        let collector = SharedCollector::new(
            InputCollector::new().with_scroll_units_per_line(config.input.scroll_units_per_line),
        );
        let mut input = InputManager::new()
            .with_keyboard(collector.clone())
            .with_mouse(collector.clone())
            .with_touch(collector.clone());
        input
            .touch_mut()
            .set_emulate_with_mouse(config.input.emulate_touch_with_mouse)
            .context("Failed to configure touch mouse emulation")?;
        input.log_devices();

        Ok(Self {
            config,
            window: None,
            collector,
            input,
        })
    }

    fn log_edges(&self) {
        let keyboard = self.input.keyboard();
        let tick = self.input.tick_count();

        for key in Key::all() {
            if keyboard.pressed(key) {
                info!(tick, key = ?key, modifiers = ?keyboard.modifiers(), "Key pressed");
            } else if keyboard.released(key) {
                info!(tick, key = ?key, "Key released");
            }
        }
        if keyboard.caps_lock_enter() || keyboard.caps_lock_exit() {
            info!(tick, on = keyboard.caps_lock_enter(), "Caps lock toggled");
        }

        let mouse = self.input.mouse();
        for button in [
            MouseButton::Left,
            MouseButton::Right,
            MouseButton::Middle,
            MouseButton::X1,
            MouseButton::X2,
        ] {
            if mouse.pressed(button) {
                info!(tick, button = ?button, x = mouse.x(), y = mouse.y(), "Mouse button pressed");
            } else if mouse.released(button) {
                info!(tick, button = ?button, "Mouse button released");
            }
        }
        if mouse.scroll_delta() != 0 || mouse.horizontal_scroll_delta() != 0 {
            info!(
                tick,
                delta = mouse.scroll_delta(),
                horizontal = mouse.horizontal_scroll_delta(),
                total = mouse.scroll(),
                "Scrolled"
            );
        }
        let delta = mouse.position_delta();
        if delta != glam::IVec2::ZERO {
            debug!(tick, dx = delta.x, dy = delta.y, "Cursor moved");
        }

        for (slot, pad) in self.input.pads() {
            if pad.just_connected() {
                info!(tick, slot = ?slot, "Gamepad connected");
            }
            if pad.pressed(Button::Start) {
                info!(tick, slot = ?slot, "Start pressed");
            }
        }

        let touch = self.input.touch();
        for point in touch.started() {
            info!(tick, id = point.id, x = point.position.x, y = point.position.y, "Touch started");
        }
        for point in touch.ended() {
            info!(tick, id = point.id, "Touch ended");
        }
    }
}

impl ApplicationHandler for Probe {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(window_attributes(&self.config.window)) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    window.width = size.width,
                    window.height = size.height,
                    "Window created successfully"
                );
                self.collector.borrow_mut().resized(size.width, size.height);
                self.window = Some(window);
            }
            Err(e) => {
                error!(error = %e, "Failed to create window");
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
        self.collector.handle_window_event(&event);

        if let WindowEvent::CloseRequested = event {
            info!("Close requested, exiting");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }

        match self.input.update() {
            Ok(()) => self.log_edges(),
            Err(e) => warn!(error = %e, "Input update failed, skipping tick"),
        }

        while let Some(gesture) = self.input.touch_mut().read_gesture() {
            info!(
                gesture = ?gesture.gesture,
                x = gesture.position.x,
                y = gesture.position.y,
                "Gesture"
            );
        }
    }
}

fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
}

fn load_config(profile: Option<&str>) -> anyhow::Result<AppConfig> {
    let config = match profile {
        Some(profile) => AppConfig::load(profile),
        None => AppConfig::load_from_env(),
    }
    .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.health {
        init_logging("warn");
        let report = health::run_all_checks();
        health::print_report(&report);
        std::process::exit(report.exit_code());
    }

    let config = load_config(args.profile.as_deref())?;
    init_logging(&config.logging.filter);

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut probe = Probe::new(config)?;
    event_loop
        .run_app(&mut probe)
        .context("Event loop terminated with an error")?;

    Ok(())
}
