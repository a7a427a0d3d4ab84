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
//! Keyboard input state
//!
//! [`InputState`] tracks which keys are held, which went down this frame and
//! which were released this frame. The window shell feeds it with
//! [`press`](InputState::press) / [`release`](InputState::release); the
//! frame loop calls [`clear_just`](InputState::clear_just) once the frame
//! has consumed the edge events.

use std::collections::HashSet;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move left
    Left,
    /// Move right
    Right,
    /// Jump
    Jump,
    /// Fire a bullet
    Fire,
}

/// Held and edge-triggered key state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Key>,
    just_pressed: Vec<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    /// Create an input state with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the key is currently held down
    pub fn pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Whether the key went down this frame
    pub fn just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Whether the key was released this frame
    pub fn just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Key-down events of this frame, in arrival order
    pub fn key_downs(&self) -> &[Key] {
        &self.just_pressed
    }

    /// Record a key-down; auto-repeat of a held key is ignored
    pub fn press(&mut self, key: Key) {
        if self.pressed.insert(key) {
            self.just_pressed.push(key);
        }
    }

    /// Record a key-up
    pub fn release(&mut self, key: Key) {
        if self.pressed.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Forget this frame's edge events
    pub fn clear_just(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Horizontal intent from the held arrow keys: -1, 0 or 1
    pub fn horizontal_axis(&self) -> f32 {
        match (self.pressed(Key::Left), self.pressed(Key::Right)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
