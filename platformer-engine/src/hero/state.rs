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
//! Hero movement states
//!
//! Every event handler takes the current state by value and returns the
//! next one. Returning an equal value means "no transition"; events that
//! make no sense in a state are simply ignored that way.
//!
//! | State  | left / right  | jump  | land  | update                               |
//! |--------|---------------|-------|-------|--------------------------------------|
//! | Stand  | Walk(dir)     | Jump  | Stand | Fall when off ground                 |
//! | Walk   | Walk(dir)     | Jump  | Walk  | Fall off ground, Stand if keys up    |
//! | Jump   | Jump          | Jump  | Stand | Stand on ground, Fall at apex        |
//! | Fall   | Fall          | Fall  | Stand | Stand on ground                      |

use crate::game::components::Direction;
use crate::render::Color;

/// Facts a state's `update` decides on
///
/// Filled from the physical body after this frame's tile collision and from
/// the held keys.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeroContext {
    /// Body stands on ground
    pub on_ground: bool,
    /// Vertical velocity, positive downwards
    pub velocity_y: f32,
    /// Left key held
    pub left_held: bool,
    /// Right key held
    pub right_held: bool,
}

impl HeroContext {
    /// Direction of the single held arrow key, if exactly one is held
    pub fn held_direction(&self) -> Option<Direction> {
        match (self.left_held, self.right_held) {
            (true, false) => Some(Direction::Left),
            (false, true) => Some(Direction::Right),
            _ => None,
        }
    }
}

/// The hero's movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeroState {
    /// Idle on the ground
    #[default]
    Stand,
    /// Walking on the ground
    Walk(Direction),
    /// Rising after a jump
    Jump,
    /// Airborne and descending
    Fall,
}

impl HeroState {
    /// Left key went down
    pub fn on_left_key_down(self) -> HeroState {
        self.on_horizontal_key_down(Direction::Left)
    }

    /// Right key went down
    pub fn on_right_key_down(self) -> HeroState {
        self.on_horizontal_key_down(Direction::Right)
    }

    fn on_horizontal_key_down(self, direction: Direction) -> HeroState {
        match self {
            HeroState::Stand | HeroState::Walk(_) => HeroState::Walk(direction),
            airborne => airborne,
        }
    }

    /// Jump key went down
    pub fn on_jump_key_down(self) -> HeroState {
        match self {
            HeroState::Stand | HeroState::Walk(_) => HeroState::Jump,
            airborne => airborne,
        }
    }

    /// Tile collision put the body on the ground
    pub fn on_land(self) -> HeroState {
        match self {
            HeroState::Jump | HeroState::Fall => HeroState::Stand,
            grounded => grounded,
        }
    }

    /// Per-frame transition after physics
    pub fn update(self, ctx: &HeroContext) -> HeroState {
        match self {
            HeroState::Stand => {
                if ctx.on_ground {
                    HeroState::Stand
                } else {
                    HeroState::Fall
                }
            }
            HeroState::Walk(direction) => {
                if !ctx.on_ground {
                    return HeroState::Fall;
                }
                let still_held = match direction {
                    Direction::Left => ctx.left_held,
                    Direction::Right => ctx.right_held,
                };
                if still_held {
                    HeroState::Walk(direction)
                } else {
                    ctx.held_direction().map_or(HeroState::Stand, HeroState::Walk)
                }
            }
            HeroState::Jump => {
                if ctx.on_ground {
                    HeroState::Stand
                } else if ctx.velocity_y >= 0.0 {
                    HeroState::Fall
                } else {
                    HeroState::Jump
                }
            }
            HeroState::Fall => {
                if ctx.on_ground {
                    HeroState::Stand
                } else {
                    HeroState::Fall
                }
            }
        }
    }

    /// Whether the state is one of the in-air states
    pub fn is_airborne(self) -> bool {
        matches!(self, HeroState::Jump | HeroState::Fall)
    }

    /// Fill color used to draw the hero in this state
    pub fn color(self) -> Color {
        match self {
            HeroState::Stand => Color::CORNFLOWER_BLUE,
            HeroState::Walk(_) => Color::SEA_GREEN,
            HeroState::Jump => Color::DARK_ORANGE,
            HeroState::Fall => Color::MEDIUM_PURPLE,
        }
    }
}
