// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Scene state stack
//!
//! Only the top state is updated and rendered. A state asks for changes by
//! returning a [`Transition`] from `update`; the stack applies it once the
//! update has returned, so a state is never replaced while it is running.

use crate::error::{EcsResult, RenderResult};
use crate::input::InputState;
use crate::render::RenderContext;
use std::fmt;

/// A top-level scene
pub trait GameState {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Called when the state becomes part of the stack
    fn on_enter(&mut self) {}

    /// Called when the state leaves the stack
    fn on_exit(&mut self) {}

    /// Advance one frame of `dt` seconds
    fn update(&mut self, dt: f32, input: &InputState) -> EcsResult<Transition>;

    /// Draw into an open frame
    fn render(&mut self, ctx: &mut RenderContext) -> RenderResult<()>;
}

/// Change requested by the running state
pub enum Transition {
    /// Keep running
    None,
    /// Pause the current state under a new one
    Push(Box<dyn GameState>),
    /// Leave the current state, resuming the one below
    Pop,
    /// Replace the current state
    Switch(Box<dyn GameState>),
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::None => write!(f, "None"),
            Transition::Push(state) => write!(f, "Push({})", state.name()),
            Transition::Pop => write!(f, "Pop"),
            Transition::Switch(state) => write!(f, "Switch({})", state.name()),
        }
    }
}

/// Stack of scenes; the last element is active
#[derive(Default)]
pub struct StateStack {
    states: Vec<Box<dyn GameState>>,
}

impl StateStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `state` on top of the stack
    pub fn push(&mut self, mut state: Box<dyn GameState>) {
        log::info!("entering state {}", state.name());
        state.on_enter();
        self.states.push(state);
    }

    /// Leave the top state
    pub fn pop(&mut self) -> Option<Box<dyn GameState>> {
        let mut state = self.states.pop()?;
        log::info!("leaving state {}", state.name());
        state.on_exit();
        Some(state)
    }

    /// Replace the top state with `state`
    pub fn switch(&mut self, state: Box<dyn GameState>) {
        self.pop();
        self.push(state);
    }

    /// Apply a transition
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Push(state) => self.push(state),
            Transition::Pop => {
                self.pop();
            }
            Transition::Switch(state) => self.switch(state),
        }
    }

    /// Update the top state and apply the transition it returns
    pub fn update(&mut self, dt: f32, input: &InputState) -> EcsResult<()> {
        let transition = match self.states.last_mut() {
            Some(top) => top.update(dt, input)?,
            None => return Ok(()),
        };
        self.apply(transition);
        Ok(())
    }

    /// Render the top state
    pub fn render(&mut self, ctx: &mut RenderContext) -> RenderResult<()> {
        match self.states.last_mut() {
            Some(top) => top.render(ctx),
            None => Ok(()),
        }
    }

    /// Name of the active state
    pub fn top_name(&self) -> Option<&str> {
        self.states.last().map(|s| s.name())
    }

    /// Number of stacked states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state is left
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
