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
//! Render context
//!
//! [`RenderContext`] is the single owner of a [`RenderBackend`]. It tracks
//! the device lifecycle and the open-frame flag so that the backend only
//! ever sees well-formed call sequences.
//!
//! # Device lifecycle
//!
//! ```text
//!  Uninitialized --create ok--> Ready --device lost--> DeviceLost
//!        |                        ^                        |
//!        +---create failed (stay) +------create ok---------+
//! ```
//!
//! Device resources are created lazily by [`begin_draw`](RenderContext::begin_draw).
//! A failed creation leaves the state unchanged so the next frame retries.

use crate::error::{RenderError, RenderResult};
use crate::render::surface::{Color, FrameOutcome, RenderBackend};

/// Device lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// No device resources have been created yet
    Uninitialized,
    /// Resources exist and frames can be drawn
    Ready,
    /// The device was lost; resources are recreated on the next frame
    DeviceLost,
}

/// Sequencing wrapper around a drawing backend
pub struct RenderContext {
    backend: Box<dyn RenderBackend>,
    state: DeviceState,
    drawing: bool,
    size: (u32, u32),
}

impl RenderContext {
    /// Wrap `backend` for a target of `width` x `height` pixels
    pub fn new(backend: Box<dyn RenderBackend>, width: u32, height: u32) -> Self {
        RenderContext {
            backend,
            state: DeviceState::Uninitialized,
            drawing: false,
            size: (width, height),
        }
    }

    /// Open a frame
    ///
    /// Creates device resources first when needed. Fails with
    /// [`RenderError::AlreadyDrawing`] if a frame is already open, without
    /// touching the backend.
    pub fn begin_draw(&mut self) -> RenderResult<()> {
        if self.drawing {
            log::warn!("begin_draw called while a frame is open");
            return Err(RenderError::AlreadyDrawing);
        }

        if self.state != DeviceState::Ready {
            if let Err(err) = self.backend.create_device_resources() {
                log::warn!("device resource creation failed: {}", err);
                return Err(err);
            }
            if self.state == DeviceState::DeviceLost {
                log::info!("device resources recreated");
            }
            self.state = DeviceState::Ready;
        }

        self.backend.begin_frame();
        self.drawing = true;
        Ok(())
    }

    /// Close and present the open frame
    ///
    /// Fails with [`RenderError::NotDrawing`] if no frame is open. A lost
    /// device discards its resources, moves to [`DeviceState::DeviceLost`]
    /// and reports [`RenderError::DeviceLost`]; the next `begin_draw`
    /// recreates them.
    pub fn end_draw(&mut self) -> RenderResult<()> {
        if !self.drawing {
            log::warn!("end_draw called without an open frame");
            return Err(RenderError::NotDrawing);
        }
        self.drawing = false;

        match self.backend.end_frame() {
            FrameOutcome::Presented => Ok(()),
            FrameOutcome::DeviceLost => {
                log::warn!("render device lost, discarding resources");
                self.backend.discard_device_resources();
                self.state = DeviceState::DeviceLost;
                Err(RenderError::DeviceLost)
            }
        }
    }

    /// Fill a rectangle in the open frame
    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> RenderResult<()> {
        if !self.drawing {
            return Err(RenderError::NotDrawing);
        }
        self.backend.fill_rect(x, y, width, height, color);
        Ok(())
    }

    /// Fill the whole target in the open frame
    pub fn clear(&mut self, color: Color) -> RenderResult<()> {
        if !self.drawing {
            return Err(RenderError::NotDrawing);
        }
        self.backend.clear(color);
        Ok(())
    }

    /// The window was resized
    ///
    /// Forwarded to the backend only while its resources exist; otherwise
    /// the size is picked up when they are created.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        if self.state == DeviceState::Ready {
            self.backend.resize(width, height);
        }
    }

    /// Current device state
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Whether a frame is open
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Target size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        if self.state == DeviceState::Ready {
            self.backend.discard_device_resources();
        }
    }
}
