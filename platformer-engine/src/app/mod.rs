//! Application shell
//!
//! [`App`] owns the scene stack, the render context and the keyboard state.
//! The host window feeds it key and resize events and calls
//! [`frame`](App::frame) once per tick.

pub mod gameplay;
pub mod state;

pub use gameplay::{GamePlayState, HERO_SIZE};
pub use state::{GameState, StateStack, Transition};

use crate::config::EngineConfig;
use crate::error::{ConfigError, EcsResult};
use crate::input::{InputState, Key};
use crate::render::{RenderBackend, RenderContext};

/// Result of one [`App::frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Whether the frame reached the screen
    pub presented: bool,
}

/// Top-level application
pub struct App {
    stack: StateStack,
    render: RenderContext,
    input: InputState,
    config: EngineConfig,
}

impl App {
    /// Create an application drawing on `backend`
    ///
    /// Fails if `config` does not pass [`EngineConfig::validate`].
    pub fn new(config: EngineConfig, backend: Box<dyn RenderBackend>) -> Result<Self, ConfigError> {
        config.validate()?;
        let (width, height) = (config.window.width, config.window.height);
        Ok(App {
            stack: StateStack::new(),
            render: RenderContext::new(backend, width, height),
            input: InputState::new(),
            config,
        })
    }

    /// Enter `state` on top of the scene stack
    pub fn push_state(&mut self, state: Box<dyn GameState>) {
        self.stack.push(state);
    }

    /// A key went down
    pub fn key_down(&mut self, key: Key) {
        self.input.press(key);
    }

    /// A key went up
    pub fn key_up(&mut self, key: Key) {
        self.input.release(key);
    }

    /// The window was resized
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.render.on_resize(width, height);
    }

    /// Run one tick: update then render
    ///
    /// `dt` is clamped to `0..=max_dt`; a non-finite value counts as zero.
    /// Simulation errors abort the tick. Render errors only drop the frame,
    /// the next tick draws again.
    pub fn frame(&mut self, dt: f32) -> EcsResult<FrameReport> {
        self.update(dt)?;
        let presented = self.render();
        Ok(FrameReport { presented })
    }

    /// Advance the active scene
    pub fn update(&mut self, dt: f32) -> EcsResult<()> {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_dt)
        } else {
            0.0
        };
        let result = self.stack.update(dt, &self.input);
        self.input.clear_just();
        result
    }

    /// Draw the active scene; returns whether the frame was presented
    pub fn render(&mut self) -> bool {
        if let Err(err) = self.render.begin_draw() {
            log::warn!("frame skipped: {}", err);
            return false;
        }
        let drawn = self.stack.render(&mut self.render);
        let ended = self.render.end_draw();
        match (drawn, ended) {
            (Ok(()), Ok(())) => true,
            (Err(err), _) | (_, Err(err)) => {
                log::warn!("frame dropped: {}", err);
                false
            }
        }
    }

    /// Whether a scene is still running
    pub fn is_running(&self) -> bool {
        !self.stack.is_empty()
    }

    /// The scene stack
    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    /// The render context
    pub fn render_context(&self) -> &RenderContext {
        &self.render
    }

    /// Current key state
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
