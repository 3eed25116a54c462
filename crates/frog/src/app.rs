//! Windowed runner: winit events in, one composited frame out per redraw

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use pond_core::{PondError, Result};
use pond_render::{Compositor, Presenter};
use pond_runtime::MouseButton as PondButton;
use pond_scene::Game;

use crate::config::WindowConfig;
use crate::CLEAR_COLOR;

pub struct FrogApp {
    game: Game,
    window_config: WindowConfig,
    compositor: Compositor,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
}

impl FrogApp {
    pub fn new(game: Game, window_config: WindowConfig) -> Self {
        let compositor = Compositor::new(window_config.width, window_config.height, CLEAR_COLOR);
        Self {
            game,
            window_config,
            compositor,
            window: None,
            presenter: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| PondError::RenderError(format!("Failed to create window: {e}")))?,
        );
        let presenter = pollster::block_on(Presenter::new(window.clone()))?;

        self.window = Some(window);
        self.presenter = Some(presenter);
        log::info!(
            "[frog] window open at {}x{}",
            self.window_config.width,
            self.window_config.height
        );
        Ok(())
    }

    /// Map a cursor position on the surface into frame pixels
    fn to_frame(&self, x: f64, y: f64) -> (f64, f64) {
        let Some(presenter) = &self.presenter else {
            return (x, y);
        };
        let (sw, sh) = presenter.surface_size();
        if sw == 0 || sh == 0 {
            return (x, y);
        }
        (
            x * self.window_config.width as f64 / sw as f64,
            y * self.window_config.height as f64 / sh as f64,
        )
    }

    fn redraw(&mut self) {
        self.game.tick();
        self.game.composite(
            &mut self.compositor,
            self.window_config.width,
            self.window_config.height,
        );
        if let Some(presenter) = &mut self.presenter {
            if let Err(e) = presenter.present(self.compositor.frame()) {
                log::error!("[frog] present failed: {e}");
            }
        }
    }
}

impl ApplicationHandler for FrogApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                log::error!("[frog] {e}");
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
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(new_size);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    let input = &mut self.game.services.input;
                    match event.state {
                        ElementState::Pressed => {
                            if key_code == KeyCode::Escape {
                                event_loop.exit();
                                return;
                            }
                            input.process_key_down(key_code);
                        }
                        ElementState::Released => input.process_key_up(key_code),
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PondButton::Left,
                    MouseButton::Right => PondButton::Right,
                    MouseButton::Middle => PondButton::Middle,
                    _ => return,
                };
                let input = &mut self.game.services.input;
                match state {
                    ElementState::Pressed => input.process_mouse_button_down(button),
                    ElementState::Released => input.process_mouse_button_up(button),
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.to_frame(position.x, position.y);
                self.game.services.input.process_mouse_move(x, y);
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
