//! Flappy Sprite - a sprite-based Flappy Bird clone for the terminal
//!
//! Core modules:
//! - `sprite`: positioned, rotatable images and their bounding boxes
//! - `collision`: bounding-box overlap test
//! - `obstacles`: the fixed pipe course
//! - `game`: mode state machine, physics and scoring
//! - `driver`: fixed-rate frame ticking
//! - `input`: terminal events to game input
//! - `surface` / `terminal`: software canvas and half-block presentation
//! - `assets` / `audio`: pixel-art images and synthesized cues

pub mod assets;
pub mod audio;
pub mod collision;
pub mod config;
pub mod driver;
pub mod game;
pub mod input;
pub mod obstacles;
pub mod sprite;
pub mod surface;
pub mod terminal;

pub use config::Config;
pub use game::{Cue, GameState, Mode, Score};
pub use sprite::{BoundingBox, Image, Sprite};
pub use surface::{PixelCanvas, Rgb, Surface};

use std::time::Duration;

/// Game tuning constants, in pixels and frames
pub mod consts {
    use std::time::Duration;

    /// Target frame rate
    pub const FPS: u32 = 40;

    /// Vertical velocity set by a flap
    pub const JUMP_AMOUNT: f64 = -10.0;
    /// Terminal fall velocity
    pub const MAX_FALL_SPEED: f64 = 10.0;
    /// Gravity, added to vertical velocity once per frame
    pub const ACCELERATION: f64 = 1.0;
    /// Horizontal velocity of every obstacle, and ground scroll per frame
    pub const PIPE_SPEED: f64 = -2.0;

    /// Angle the bird snaps to while rising (degrees)
    pub const TILT_UP: f64 = -15.0;
    /// Per-frame nose-down relaxation (degrees)
    pub const TILT_STEP: f64 = 4.0;
    /// Tilt stops relaxing once it reaches this angle
    pub const TILT_MAX: f64 = 70.0;

    /// Vertical distance between the facing edges of a pipe pair
    pub const GAP_SIZE: f64 = 140.0;
    /// x of the unpaired finish-line sprite
    pub const FINISH_X: f64 = 3900.0;

    /// Ground bar offset resets to 0 once it drops below this
    pub const GROUND_WRAP: f64 = -23.0;

    /// Minimum time in game-over before input restarts the game
    pub const RESTART_COOLDOWN: Duration = Duration::from_millis(1000);
    /// Delay between the hit cue and the game-over cue
    pub const GAME_OVER_CUE_DELAY: Duration = Duration::from_millis(300);

    /// Default logical surface size
    pub const SURFACE_WIDTH: u32 = 320;
    pub const SURFACE_HEIGHT: u32 = 480;
}

/// Duration of one frame at `fps`
#[inline]
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / fps.max(1) as u64)
}
