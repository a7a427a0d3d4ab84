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
//! Drawing surface abstraction
//!
//! A [`RenderBackend`] is the external device the engine draws on. The
//! engine only issues solid clears and filled rectangles. The
//! [`RecordingBackend`] keeps those commands in memory instead of drawing,
//! which is what tests and the headless demo use.

use crate::error::{RenderError, RenderResult};
use std::sync::{Arc, Mutex, MutexGuard};

/// RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white, the frame background
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Default brush for entities
    pub const CORNFLOWER_BLUE: Color = Color::rgb(100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0);
    /// Solid tiles
    pub const SLATE_GRAY: Color = Color::rgb(112.0 / 255.0, 128.0 / 255.0, 144.0 / 255.0);
    /// One-way platforms
    pub const BURLY_WOOD: Color = Color::rgb(222.0 / 255.0, 184.0 / 255.0, 135.0 / 255.0);
    /// Monsters
    pub const CRIMSON: Color = Color::rgb(220.0 / 255.0, 20.0 / 255.0, 60.0 / 255.0);
    /// Bullets
    pub const GOLD: Color = Color::rgb(1.0, 215.0 / 255.0, 0.0);
    /// Walking hero
    pub const SEA_GREEN: Color = Color::rgb(46.0 / 255.0, 139.0 / 255.0, 87.0 / 255.0);
    /// Jumping hero
    pub const DARK_ORANGE: Color = Color::rgb(1.0, 140.0 / 255.0, 0.0);
    /// Falling hero
    pub const MEDIUM_PURPLE: Color = Color::rgb(147.0 / 255.0, 112.0 / 255.0, 219.0 / 255.0);

    /// Opaque color from components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b, a: 1.0 }
    }
}

/// A primitive issued to the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole target
    Clear(Color),
    /// Fill an axis-aligned rectangle
    FillRect {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Fill color
        color: Color,
    },
}

/// How a frame ended on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame reached the screen
    Presented,
    /// The device went away; its resources must be recreated
    DeviceLost,
}

/// External drawing device
///
/// Calls are sequenced by the [`RenderContext`](crate::render::RenderContext);
/// a backend never sees `begin_frame` twice in a row or a draw call outside
/// a frame.
pub trait RenderBackend {
    /// Create device-dependent resources (render target, brushes)
    fn create_device_resources(&mut self) -> RenderResult<()>;

    /// Release device-dependent resources
    fn discard_device_resources(&mut self);

    /// Start recording a frame
    fn begin_frame(&mut self);

    /// Finish and present the frame
    fn end_frame(&mut self) -> FrameOutcome;

    /// Fill the target with `color`
    fn clear(&mut self, color: Color);

    /// Fill a rectangle
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// The target was resized to `width` x `height` pixels
    fn resize(&mut self, width: u32, height: u32);
}

#[derive(Debug, Default)]
struct RecordingLog {
    last: Option<Vec<DrawCommand>>,
    presented: usize,
    current: Vec<DrawCommand>,
    resources: bool,
    creations: usize,
    discards: usize,
    resizes: Vec<(u32, u32)>,
    fail_creation: bool,
    lose_device: bool,
}

fn lock(log: &Mutex<RecordingLog>) -> MutexGuard<'_, RecordingLog> {
    log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Backend that records commands in memory
///
/// Only the most recently presented frame is kept, along with a count of
/// every presented frame.
///
/// Inspect and steer it through the [`Recorder`] returned by
/// [`recorder`](RecordingBackend::recorder), which stays valid after the
/// backend has been moved into a render context.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    log: Arc<Mutex<RecordingLog>>,
}

impl RecordingBackend {
    /// Create a backend with nothing recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the recorded commands
    pub fn recorder(&self) -> Recorder {
        Recorder {
            log: Arc::clone(&self.log),
        }
    }

    fn push(&self, command: DrawCommand) {
        lock(&self.log).current.push(command);
    }
}

impl RenderBackend for RecordingBackend {
    fn create_device_resources(&mut self) -> RenderResult<()> {
        let mut log = lock(&self.log);
        if log.fail_creation {
            return Err(RenderError::ResourceCreation("render target unavailable".to_string()));
        }
        if !log.resources {
            log.resources = true;
            log.creations += 1;
        }
        Ok(())
    }

    fn discard_device_resources(&mut self) {
        let mut log = lock(&self.log);
        if log.resources {
            log.resources = false;
            log.discards += 1;
        }
    }

    fn begin_frame(&mut self) {
        lock(&self.log).current.clear();
    }

    fn end_frame(&mut self) -> FrameOutcome {
        let mut log = lock(&self.log);
        let frame = std::mem::take(&mut log.current);
        if std::mem::take(&mut log.lose_device) {
            return FrameOutcome::DeviceLost;
        }
        log.last = Some(frame);
        log.presented += 1;
        FrameOutcome::Presented
    }

    fn clear(&mut self, color: Color) {
        self.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        lock(&self.log).resizes.push((width, height));
    }
}

/// Shared view of a [`RecordingBackend`]
#[derive(Debug, Clone)]
pub struct Recorder {
    log: Arc<Mutex<RecordingLog>>,
}

impl Recorder {
    /// Number of presented frames
    pub fn frame_count(&self) -> usize {
        lock(&self.log).presented
    }

    /// Commands of the most recently presented frame
    pub fn last_frame(&self) -> Option<Vec<DrawCommand>> {
        lock(&self.log).last.clone()
    }

    /// How many times device resources were created
    pub fn creations(&self) -> usize {
        lock(&self.log).creations
    }

    /// How many times device resources were discarded
    pub fn discards(&self) -> usize {
        lock(&self.log).discards
    }

    /// Whether device resources currently exist
    pub fn has_resources(&self) -> bool {
        lock(&self.log).resources
    }

    /// Sizes passed to `resize`, in order
    pub fn resizes(&self) -> Vec<(u32, u32)> {
        lock(&self.log).resizes.clone()
    }

    /// Make resource creation fail until reset
    pub fn set_fail_creation(&self, fail: bool) {
        lock(&self.log).fail_creation = fail;
    }

    /// Report a lost device at the end of the next frame
    pub fn lose_device_on_next_frame(&self) {
        lock(&self.log).lose_device = true;
    }
}
