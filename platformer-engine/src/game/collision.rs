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
//! Axis-aligned box overlap
//!
//! Boxes are given as a top-left corner plus a size. Two boxes collide only
//! when their intersection has positive area: boxes that merely share an
//! edge or a corner do not collide.

use glam::Vec2;

/// Box-edge overlap test
///
/// Strict comparisons make edge contact a miss, and the test is symmetric
/// in its two boxes.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use platformer_engine::game::collision::collides;
///
/// let size = Vec2::splat(32.0);
/// assert!(collides(Vec2::ZERO, size, Vec2::splat(16.0), size));
/// assert!(!collides(Vec2::ZERO, size, Vec2::new(32.0, 0.0), size));
/// ```
#[inline]
pub fn collides(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    pos_a.x < pos_b.x + size_b.x
        && pos_b.x < pos_a.x + size_a.x
        && pos_a.y < pos_b.y + size_b.y
        && pos_b.y < pos_a.y + size_a.y
}
