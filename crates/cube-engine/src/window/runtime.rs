use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::time::EventSource;

/// Upper bound on pump rounds spent waiting for the platform to resume.
const CREATE_ATTEMPTS: u32 = 200;
const CREATE_WAIT: Duration = Duration::from_millis(5);

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
    /// Upper bound on ticks per second for the frame loop.
    pub target_hz: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Hello cube".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            resizable: false,
            target_hz: 60,
        }
    }
}

/// Attributes for the main window. It starts hidden and is revealed by
/// [`WinitEvents::show`] once the scene exists.
pub fn window_attributes(config: &RuntimeConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(config.initial_size)
        .with_resizable(config.resizable)
        .with_visible(false)
}

struct WindowHandler {
    config: RuntimeConfig,
    window: Option<Arc<Window>>,
    close_requested: bool,
    failure: Option<String>,
}

impl WindowHandler {
    fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            window: None,
            close_requested: false,
            failure: None,
        }
    }
}

impl ApplicationHandler for WindowHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(window_attributes(&self.config)) {
            Ok(window) => {
                log::debug!("created window {:?} ({})", window.id(), self.config.title);
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                log::error!("failed to create window: {e}");
                self.failure = Some(e.to_string());
                self.close_requested = true;
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::info!("window {window_id:?} close requested");
                self.close_requested = true;
            }
            _ => {}
        }
    }
}

/// Single-window event source over winit's pump-events API.
///
/// The frame loop owns control flow: each [`EventSource::poll_events`] call
/// dispatches whatever is pending and returns immediately.
pub struct WinitEvents {
    event_loop: EventLoop<()>,
    handler: WindowHandler,
}

impl WinitEvents {
    /// Creates the event loop and pumps it until the (hidden) window exists.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut events = Self {
            event_loop,
            handler: WindowHandler::new(config),
        };

        for _ in 0..CREATE_ATTEMPTS {
            if let PumpStatus::Exit(code) = events
                .event_loop
                .pump_app_events(Some(CREATE_WAIT), &mut events.handler)
            {
                bail!("event loop exited with code {code} before the window was created");
            }
            if let Some(reason) = &events.handler.failure {
                bail!("failed to create window: {reason}");
            }
            if events.handler.window.is_some() {
                return Ok(events);
            }
        }

        bail!("platform did not resume within {CREATE_ATTEMPTS} event pumps")
    }

    /// The main window; shared with the GPU surface.
    pub fn window(&self) -> Result<Arc<Window>> {
        self.handler
            .window
            .clone()
            .context("window has not been created")
    }

    /// Makes the window visible.
    pub fn show(&self) {
        if let Some(window) = &self.handler.window {
            window.set_visible(true);
            window.request_redraw();
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.handler.config
    }
}

impl EventSource for WinitEvents {
    fn poll_events(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);

        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.handler.close_requested = true;
        }
    }

    fn should_close(&self) -> bool {
        self.handler.close_requested
    }
}
