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
//! Engine configuration
//!
//! All tuning constants live in [`EngineConfig`]. Units are pixels and
//! seconds; positive y points down, matching screen space.
//!
//! # Environment Configuration
//!
//! [`EngineConfig::from_env`] applies these overrides on top of the defaults:
//! ```bash
//! export PLATFORMER_GRAVITY=1500
//! export PLATFORMER_WALK_SPEED=200
//! export PLATFORMER_JUMP_SPEED=650
//! ```

use crate::error::ConfigError;
use crate::pool::PoolConfig;
use serde::{Deserialize, Serialize};

/// Window shell parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Logical width in pixels at 96 DPI
    pub width: u32,
    /// Logical height in pixels at 96 DPI
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "platformer".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl WindowConfig {
    /// Physical window size for the given desktop DPI
    ///
    /// Each axis is scaled by `dpi / 96` and rounded up.
    pub fn scaled_size(&self, dpi_x: f32, dpi_y: f32) -> (u32, u32) {
        let w = (self.width as f32 * dpi_x / 96.0).ceil() as u32;
        let h = (self.height as f32 * dpi_y / 96.0).ceil() as u32;
        (w, h)
    }
}

/// Tuning constants for the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Downward acceleration in px/s²
    pub gravity: f32,
    /// Maximum falling speed in px/s
    pub terminal_velocity: f32,
    /// Horizontal speed while walking
    pub walk_speed: f32,
    /// Initial upward speed of a jump
    pub jump_speed: f32,
    /// Horizontal speed when steering in the air
    pub air_control_speed: f32,
    /// Horizontal speed applied by a monster knockback
    pub knockback_speed: f32,
    /// Upward speed applied by a monster knockback
    pub knockback_lift: f32,
    /// Bullet travel speed
    pub bullet_speed: f32,
    /// Seconds before an unspent bullet expires
    pub bullet_lifetime: f32,
    /// Edge length of a bullet's square hit box
    pub bullet_size: f32,
    /// Health removed by one bullet
    pub bullet_damage: i32,
    /// Edge length of a map tile
    pub tile_size: f32,
    /// Largest time step the app will pass to a frame
    pub max_dt: f32,
    /// Snapshot buffer pool for entity queries
    pub pool: PoolConfig,
    /// Window shell parameters
    pub window: WindowConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            gravity: 1800.0,
            terminal_velocity: 900.0,
            walk_speed: 240.0,
            jump_speed: 720.0,
            air_control_speed: 180.0,
            knockback_speed: 300.0,
            knockback_lift: 200.0,
            bullet_speed: 600.0,
            bullet_lifetime: 1.5,
            bullet_size: 8.0,
            bullet_damage: 10,
            tile_size: 32.0,
            max_dt: 0.1,
            pool: PoolConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set the gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the walking speed
    pub fn with_walk_speed(mut self, speed: f32) -> Self {
        self.walk_speed = speed;
        self
    }

    /// Set the jump speed
    pub fn with_jump_speed(mut self, speed: f32) -> Self {
        self.jump_speed = speed;
        self
    }

    /// Set the tile size
    pub fn with_tile_size(mut self, size: f32) -> Self {
        self.tile_size = size;
        self
    }

    /// Set the window parameters
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Check that every constant is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("gravity", self.gravity),
            ("knockback_lift", self.knockback_lift),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite and non-negative, got {}", value),
                });
            }
        }

        let positive = [
            ("terminal_velocity", self.terminal_velocity),
            ("walk_speed", self.walk_speed),
            ("jump_speed", self.jump_speed),
            ("air_control_speed", self.air_control_speed),
            ("knockback_speed", self.knockback_speed),
            ("bullet_speed", self.bullet_speed),
            ("bullet_lifetime", self.bullet_lifetime),
            ("bullet_size", self.bullet_size),
            ("tile_size", self.tile_size),
            ("max_dt", self.max_dt),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite and positive, got {}", value),
                });
            }
        }

        if self.bullet_damage <= 0 {
            return Err(ConfigError::Invalid {
                field: "bullet_damage",
                reason: format!("must be positive, got {}", self.bullet_damage),
            });
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: "width and height must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `PLATFORMER_*` environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value
    ///
    /// Unparsable values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let fields: [(&str, &mut f32); 3] = [
            ("PLATFORMER_GRAVITY", &mut self.gravity),
            ("PLATFORMER_WALK_SPEED", &mut self.walk_speed),
            ("PLATFORMER_JUMP_SPEED", &mut self.jump_speed),
        ];
        for (key, slot) in fields {
            if let Some(raw) = lookup(key) {
                match raw.trim().parse::<f32>() {
                    Ok(value) => {
                        log::info!("config override {}={}", key, value);
                        *slot = value;
                    }
                    Err(_) => log::warn!("ignoring {}: `{}` is not a number", key, raw),
                }
            }
        }
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn test_scaled_size_rounds_up() {
        let window = WindowConfig::default();
        assert_eq!(window.scaled_size(96.0, 96.0), (1280, 720));
        assert_eq!(window.scaled_size(144.0, 144.0), (1920, 1080));
        assert_eq!(window.scaled_size(97.0, 97.0), (1294, 728));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = EngineConfig::default().with_tile_size(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "tile_size", .. })
        ));

        let config = EngineConfig::default().with_gravity(f32::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "gravity", .. })
        ));
    }

    #[test]
    fn test_from_json_partial_document() {
        let config = EngineConfig::from_json(r#"{ "gravity": 1000.0, "window": { "title": "demo" } }"#).unwrap();
        assert_eq!(config.gravity, 1000.0);
        assert_eq!(config.window.title, "demo");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.walk_speed, EngineConfig::default().walk_speed);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "walk_speed": -5.0 }"#),
            Err(ConfigError::Invalid { field: "walk_speed", .. })
        ));
        assert!(matches!(EngineConfig::from_json("not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::default()
            .with_overrides(|key| match key {
                "PLATFORMER_GRAVITY" => Some("1200".to_string()),
                "PLATFORMER_WALK_SPEED" => Some("fast".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.gravity, 1200.0);
        assert_eq!(config.walk_speed, EngineConfig::default().walk_speed);
    }
}
