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
//! Headless run of the platformer
//!
//! Builds a small level, drops a few monsters into it and plays a scripted
//! key sequence for five seconds of game time, drawing into a recording
//! backend instead of a window.
//!
//! Run with `RUST_LOG=debug` to see entity and state transitions, and set
//! `PLATFORMER_GRAVITY` (or `PLATFORMER_WALK_SPEED`, `PLATFORMER_JUMP_SPEED`)
//! to change the tuning.

use glam::Vec2;
use platformer_engine::app::{App, GamePlayState};
use platformer_engine::config::EngineConfig;
use platformer_engine::game::spawn::spawn_monster;
use platformer_engine::input::Key;
use platformer_engine::physics::TileMap;
use platformer_engine::render::{DrawCommand, RecordingBackend};

const LEVEL: [&str; 8] = [
    "#..........................#",
    "#..........................#",
    "#..........................#",
    "#.........=====............#",
    "#..........................#",
    "#.....................###..#",
    "#..........................#",
    "############################",
];

const DT: f32 = 1.0 / 60.0;

fn script(frame: u32) -> Option<(Key, bool)> {
    match frame {
        30 => Some((Key::Right, true)),
        60 => Some((Key::Jump, true)),
        61 => Some((Key::Jump, false)),
        90 => Some((Key::Fire, true)),
        91 => Some((Key::Fire, false)),
        150 => Some((Key::Right, false)),
        180 => Some((Key::Fire, true)),
        181 => Some((Key::Fire, false)),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Platformer Engine - Headless Example");
    println!("====================================\n");

    let config = EngineConfig::from_env()?;
    println!("gravity {} px/s², walk {} px/s, jump {} px/s", config.gravity, config.walk_speed, config.jump_speed);

    let tiles = TileMap::from_rows(&LEVEL, config.tile_size);
    let mut scene = GamePlayState::new(config.clone(), tiles, Vec2::new(64.0, 192.0))?;
    for (x, power) in [(320.0, 10), (480.0, 30), (640.0, 20)] {
        spawn_monster(
            &mut scene.world_mut().entities,
            Vec2::new(x, 160.0),
            Vec2::splat(32.0),
            power,
            Vec2::new(-60.0, 0.0),
        )?;
    }
    println!("spawned {} entities (hero proxy included)\n", scene.world().entities.len());

    let backend = RecordingBackend::new();
    let recorder = backend.recorder();
    let mut app = App::new(config, Box::new(backend))?;
    app.push_state(Box::new(scene));

    for frame in 0..300 {
        if let Some((key, down)) = script(frame) {
            if down {
                app.key_down(key);
            } else {
                app.key_up(key);
            }
        }
        app.frame(DT)?;

        if frame % 60 == 59 {
            let rects = recorder
                .last_frame()
                .map(|cmds| cmds.iter().filter(|c| matches!(c, DrawCommand::FillRect { .. })).count())
                .unwrap_or(0);
            println!("t = {:.1}s: {} rectangles drawn", (frame + 1) as f32 * DT, rects);
        }
    }

    println!("\npresented {} frames", recorder.frame_count());
    Ok(())
}
