//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]: it owns the GPU
//! renderer, routes pointer input to the [`Compositor`], and drives frames
//! through the [`FrameLoop`].

use std::path::PathBuf;
use std::sync::Arc;

use terra_config::Config;
use terra_render::{SceneOptions, SceneRenderer, SurfaceError};
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::compositor::{Compositor, CompositorSettings};
use crate::frame_loop::FrameLoop;
use crate::input::{PointerState, Release};

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Renderer settings derived from the configuration.
pub fn scene_options_from_config(config: &Config) -> SceneOptions {
    SceneOptions {
        vsync: config.window.vsync,
        transition_half_width: config.shader.transition_half_width,
        marker_radius: config.markers.marker_radius,
        ..SceneOptions::default()
    }
}

/// Window, renderer, and the compositor they display.
pub struct AppState {
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    compositor: Compositor,
    frame_loop: FrameLoop,
    pointer: PointerState,
    config: Config,
    /// Directory holding `config.ron`, re-read when the window gains focus.
    config_dir: Option<PathBuf>,
    title: String,
}

impl AppState {
    pub fn new(config: Config, config_dir: Option<PathBuf>, compositor: Compositor) -> Self {
        Self {
            window: None,
            renderer: None,
            compositor,
            frame_loop: FrameLoop::new(),
            pointer: PointerState::new(),
            title: config.window.title.clone(),
            config,
            config_dir,
        }
    }

    /// Re-read `config.ron` and apply the settings that can change live.
    /// Everything else waits for a restart. An invalid file is ignored.
    fn reload_config(&mut self) {
        let Some(dir) = &self.config_dir else {
            return;
        };
        let fresh = match self.config.reload(dir) {
            Ok(Some(fresh)) => fresh,
            Ok(None) => return,
            Err(e) => {
                warn!("Config reload failed: {e}");
                return;
            }
        };
        if let Err(e) = fresh.validate() {
            warn!("Ignoring reloaded config: {e}");
            return;
        }
        if fresh.motion == self.config.motion
            && fresh.shader.transition_half_width == self.config.shader.transition_half_width
            && fresh.markers.pick_radius_px == self.config.markers.pick_radius_px
        {
            return;
        }

        self.config.motion = fresh.motion;
        self.config.shader.transition_half_width = fresh.shader.transition_half_width;
        self.config.markers.pick_radius_px = fresh.markers.pick_radius_px;
        self.compositor
            .apply_settings(&CompositorSettings::from_config(&self.config));
        if let Some(renderer) = &mut self.renderer {
            renderer.set_transition_half_width(self.config.shader.transition_half_width);
        }
        info!("Config reloaded");
    }

    /// Mirror hover and selection text into the title bar when it changes.
    fn refresh_title(&mut self) {
        let title = self.compositor.hud_title(&self.config.window.title);
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.frame_loop.begin_frame() {
            return;
        }
        if let Some(renderer) = &mut self.renderer {
            match self.compositor.frame(renderer) {
                Ok(()) => {}
                Err(SurfaceError::Lost) => {
                    let (w, h) = renderer.size();
                    renderer.resize(w, h);
                }
                Err(SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory");
                    self.frame_loop.stop();
                    event_loop.exit();
                    return;
                }
                Err(SurfaceError::Timeout) => {
                    warn!("Surface timeout, skipping frame");
                }
            }
        }
        self.refresh_title();
        if let Some(window) = &self.window {
            self.frame_loop.request_next(window.as_ref());
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        match SceneRenderer::new(window.clone(), scene_options_from_config(&self.config)) {
            Ok(renderer) => {
                let (w, h) = renderer.size();
                self.compositor.resize(w, h);
                self.renderer = Some(renderer);
            }
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        }

        self.frame_loop.start(window.as_ref());
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.frame_loop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size.width, new_size.height);
                }
                self.compositor.resize(new_size.width, new_size.height);
                info!("Window resized to {}x{}", new_size.width, new_size.height);
            }
            WindowEvent::Focused(true) => self.reload_config(),
            WindowEvent::CursorEntered { .. } => {
                self.pointer.on_cursor_entered();
                self.compositor.pointer_entered();
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.on_cursor_left();
                self.compositor.pointer_left();
                self.refresh_title();
            }
            WindowEvent::CursorMoved { position, .. } => {
                match self.pointer.on_cursor_moved(position.x, position.y) {
                    Some(delta) => self.compositor.pan(delta),
                    None => {
                        if self.compositor.pointer_moved(self.pointer.position()) {
                            self.refresh_title();
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left && state == ElementState::Pressed {
                    self.compositor.pointer_down(self.pointer.position());
                }
                if let Some(Release::Click(position)) = self.pointer.on_button(button, state) {
                    self.compositor.click(position);
                }
                self.refresh_title();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.compositor.zoom(PointerState::scroll_lines(delta));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.frame_loop.stop();
    }
}

/// Creates an event loop and runs the viewer until the window closes.
///
/// With a `config_dir`, edits to `config.ron` are picked up whenever the
/// window regains focus.
#[instrument(skip_all)]
pub fn run(
    config: Config,
    config_dir: Option<PathBuf>,
    compositor: Compositor,
) -> Result<(), winit::error::EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, config_dir, compositor);
    event_loop.run_app(&mut app)
}
