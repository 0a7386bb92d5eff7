//! Game state machine
//!
//! `Prestart` waits for the first input. `Running` scrolls the course,
//! applies gravity and checks for crashes and points. `Over` keeps the bird
//! falling and shows the result until input arrives after the restart
//! cooldown.

use std::fmt;
use std::time::Instant;

use crate::assets::Assets;
use crate::collision::overlaps;
use crate::consts::*;
use crate::obstacles::{ObstacleSet, build_obstacle_set};
use crate::sprite::Sprite;
use crate::surface::{Surface, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Prestart,
    Running,
    Over,
}

/// Side effects requested by the game, played by [`crate::audio`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A run began
    Start,
    Flap,
    /// The bird crashed; the game-over sting follows on its own delay
    Hit,
    Score,
}

/// Score counted in half points. Each pipe pair is worth one half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);

    pub const fn from_halves(halves: u32) -> Self {
        Score(halves)
    }

    pub const fn halves(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 2.0
    }

    fn add_half(&mut self) {
        self.0 += 1;
    }
}

/// Whole points, rounded down
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 / 2)
    }
}

pub struct GameState {
    width: f64,
    height: f64,
    assets: Assets,
    bird: Sprite,
    obstacles: ObstacleSet,
    mode: Mode,
    score: Score,
    high_score: Score,
    /// Index of the last pipe pair credited
    last_scored: Option<usize>,
    /// When the last `Running` frame ran
    last_running: Option<Instant>,
    ground_offset: f64,
    cues: Vec<Cue>,
}

impl GameState {
    pub fn new(assets: Assets, width: u32, height: u32) -> Self {
        let (width, height) = (width as f64, height as f64);
        let bird = Sprite::at(assets.bird.clone(), width / 3.0, height / 2.0);
        let obstacles = build_obstacle_set(&assets.pipe, &assets.finish);
        Self {
            width,
            height,
            assets,
            bird,
            obstacles,
            mode: Mode::Prestart,
            score: Score::ZERO,
            high_score: Score::ZERO,
            last_scored: None,
            last_running: None,
            ground_offset: 0.0,
            cues: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn high_score(&self) -> Score {
        self.high_score
    }

    pub fn last_scored(&self) -> Option<usize> {
        self.last_scored
    }

    pub fn bird(&self) -> &Sprite {
        &self.bird
    }

    pub fn bird_mut(&mut self) -> &mut Sprite {
        &mut self.bird
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn ground_offset(&self) -> f64 {
        self.ground_offset
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Drain the cues queued since the last call
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Player pressed something
    pub fn on_input(&mut self, now: Instant) {
        match self.mode {
            Mode::Prestart => {
                self.mode = Mode::Running;
                self.cues.push(Cue::Start);
                log::info!("game started");
            }
            Mode::Running => {
                self.bird.vy = JUMP_AMOUNT;
                self.cues.push(Cue::Flap);
            }
            Mode::Over => {
                if self.cooldown_elapsed(now) {
                    self.reset_game();
                    self.mode = Mode::Running;
                    self.cues.push(Cue::Start);
                    log::info!("game restarted");
                }
            }
        }
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        self.last_running
            .is_none_or(|t| now.saturating_duration_since(t) >= RESTART_COOLDOWN)
    }

    /// Put the bird back and rebuild the course. The high score survives.
    pub fn reset_game(&mut self) {
        self.bird.x = self.width / 3.0;
        self.bird.y = self.height / 2.0;
        self.bird.vy = 0.0;
        self.bird.angle = 0.0;
        self.obstacles = build_obstacle_set(&self.assets.pipe, &self.assets.finish);
        self.score = Score::ZERO;
        self.last_scored = None;
    }

    /// Draw the scrolling ground bar along the bottom edge
    pub fn draw_ground(&mut self, surface: &mut dyn Surface) {
        if self.ground_offset < GROUND_WRAP {
            self.ground_offset = 0.0;
        }
        let y = self.height - self.assets.ground.height() as f64;
        surface.draw_image(&self.assets.ground, self.ground_offset, y);
    }

    /// Mode-specific part of a frame. The bird itself has already been
    /// drawn and moved by the frame driver.
    pub fn step(&mut self, now: Instant, surface: &mut dyn Surface) {
        match self.mode {
            Mode::Prestart => self.draw_intro(surface),
            Mode::Running => {
                self.last_running = Some(now);
                self.ground_offset += PIPE_SPEED;
                for pipe in self.obstacles.sprites() {
                    pipe.draw(surface);
                }
                self.obstacles.advance();
                self.tilt();
                self.fall();
                self.check_crash();
                if self.mode == Mode::Running {
                    self.check_score();
                }
            }
            Mode::Over => {
                self.fall();
                self.draw_game_over(surface);
            }
        }
    }

    fn tilt(&mut self) {
        if self.bird.vy < 0.0 {
            self.bird.angle = TILT_UP;
        } else if self.bird.angle < TILT_MAX {
            self.bird.angle += TILT_STEP;
        }
    }

    /// Gravity, then the top/bottom bounds check
    fn fall(&mut self) {
        if self.bird.vy < MAX_FALL_SPEED {
            self.bird.vy += ACCELERATION;
        }
        let h = self.bird.height();
        if self.bird.y > self.height - h || self.bird.y < -h {
            self.bird.vy = 0.0;
            self.end_game();
        }
    }

    fn check_crash(&mut self) {
        if self
            .obstacles
            .sprites()
            .iter()
            .any(|pipe| overlaps(&self.bird, pipe))
        {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        if self.mode != Mode::Over {
            self.cues.push(Cue::Hit);
            log::info!("game over, score {}", self.score);
        }
        self.mode = Mode::Over;
    }

    /// Credit every pair whose right edge has cleared the bird, once each.
    /// Pairs are laid out left to right and scroll together, so they pass
    /// in index order.
    fn check_score(&mut self) {
        let first = self.last_scored.map_or(0, |i| i + 1);
        for i in first..self.obstacles.pair_count() {
            let Some(pair) = self.obstacles.pair(i) else {
                break;
            };
            if pair.right() >= self.bird.x {
                break;
            }
            self.score.add_half();
            self.last_scored = Some(i);
            self.cues.push(Cue::Score);
            log::debug!("passed pair {i}, score {:.1}", self.score.as_f64());
        }
    }

    fn draw_intro(&self, surface: &mut dyn Surface) {
        surface.draw_text(
            "Tap to start!",
            self.width / 2.0,
            self.height / 4.0,
            &TextStyle::outlined(25.0),
        );
    }

    fn draw_game_over(&mut self, surface: &mut dyn Surface) {
        self.high_score = self.high_score.max(self.score);
        let cx = self.width / 2.0;
        let big = TextStyle::outlined(30.0);
        surface.draw_text("Game Over!", cx, 100.0, &big);
        surface.draw_text(&format!("Score: {}", self.score), cx, 150.0, &big);
        surface.draw_text(&format!("High Score: {}", self.high_score), cx, 200.0, &big);
        surface.draw_text("Tap to play again", cx, 300.0, &TextStyle::outlined(20.0));
    }
}
