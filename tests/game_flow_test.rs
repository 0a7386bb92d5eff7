//! Integration test: full game flow
//!
//! Drives the game through the frame driver on a manual clock, the same
//! way the binary does with the wall clock.

use std::time::Duration;

use flappy_sprite::assets::Assets;
use flappy_sprite::consts::{FPS, RESTART_COOLDOWN};
use flappy_sprite::driver::{Clock, FrameDriver, ManualClock};
use flappy_sprite::obstacles::{PIPE_LAYOUT, build_obstacle_set};
use flappy_sprite::{Cue, GameState, Mode, PixelCanvas, Score};

const W: u32 = 320;
const H: u32 = 480;

struct Harness {
    game: GameState,
    canvas: PixelCanvas,
    driver: FrameDriver<ManualClock>,
}

impl Harness {
    fn new() -> Self {
        Self {
            game: GameState::new(Assets::load(W, H), W, H),
            canvas: PixelCanvas::new(W, H),
            driver: FrameDriver::new(ManualClock::new(std::time::Instant::now()), FPS),
        }
    }

    fn tap(&mut self) {
        let now = self.driver.clock().now();
        self.game.on_input(now);
    }

    fn frame(&mut self) {
        self.driver.tick(&mut self.game, &mut self.canvas);
    }

    /// Hold the bird level at `y` for one frame
    fn glide(&mut self, y: f64) {
        let bird = self.game.bird_mut();
        bird.y = y;
        bird.vy = 0.0;
        self.frame();
    }
}

// =============================================================================
// Course
// =============================================================================

#[test]
fn test_course_matches_layout_on_any_surface() {
    for (w, h) in [(320, 480), (1024, 768), (100, 900)] {
        let assets = Assets::load(w, h);
        let set = build_obstacle_set(&assets.pipe, &assets.finish);
        assert_eq!(set.len(), 27);
        let xs: Vec<f64> = set.pairs().map(|p| p.top.x).collect();
        assert_eq!(
            xs,
            vec![
                500.0, 800.0, 1000.0, 1200.0, 1600.0, 1800.0, 2000.0, 2200.0, 2400.0, 2700.0,
                3000.0, 3300.0, 3600.0
            ]
        );
        let gaps: Vec<f64> = set.pairs().map(|p| p.bottom.y - 140.0).collect();
        assert_eq!(
            gaps,
            vec![
                100.0, 50.0, 250.0, 150.0, 100.0, 150.0, 200.0, 250.0, 30.0, 300.0, 100.0, 250.0,
                50.0
            ]
        );
        assert_eq!(set.finish().unwrap().x, 3900.0);
    }
}

// =============================================================================
// Mode transitions
// =============================================================================

#[test]
fn test_first_tap_starts_running() {
    let mut h = Harness::new();
    h.frame();
    assert_eq!(h.game.mode(), Mode::Prestart);
    h.tap();
    assert_eq!(h.game.mode(), Mode::Running);
    assert_eq!(h.game.take_cues(), vec![Cue::Start]);
}

#[test]
fn test_falling_below_floor_ends_game() {
    let mut h = Harness::new();
    h.tap();
    h.frame();
    let bird_h = h.game.bird().height();
    h.game.bird_mut().y = H as f64 - bird_h + 0.5;
    h.game.bird_mut().vy = 0.0;
    h.frame();
    assert_eq!(h.game.mode(), Mode::Over);
    assert_eq!(h.game.bird().vy, 0.0);
}

#[test]
fn test_unattended_bird_crashes() {
    let mut h = Harness::new();
    h.tap();
    for _ in 0..200 {
        h.frame();
        if h.game.mode() == Mode::Over {
            break;
        }
    }
    assert_eq!(h.game.mode(), Mode::Over);
    assert_eq!(h.game.score(), Score::ZERO);
}

#[test]
fn test_restart_cooldown() {
    let mut h = Harness::new();
    h.tap();
    h.game.bird_mut().y = 2000.0;
    h.frame();
    assert_eq!(h.game.mode(), Mode::Over);

    // Early taps are dropped, not queued
    for _ in 0..10 {
        h.frame();
        h.tap();
        assert_eq!(h.game.mode(), Mode::Over);
    }

    h.driver.clock_mut().advance(RESTART_COOLDOWN);
    h.tap();
    assert_eq!(h.game.mode(), Mode::Running);
    assert_eq!(h.game.score(), Score::ZERO);
    assert_eq!(h.game.last_scored(), None);
    assert_eq!(h.game.obstacles().len(), 27);
}

// =============================================================================
// Scoring
// =============================================================================

#[test]
fn test_passing_first_pair_scores_half_once() {
    let mut h = Harness::new();
    h.tap();
    let bird_x = h.game.bird().x;
    let mut scored_at = None;
    for frame in 0..300 {
        // Inside the first gap (100..240)
        h.glide(150.0);
        assert_eq!(h.game.mode(), Mode::Running, "crashed at frame {frame}");
        if scored_at.is_none() && h.game.score() > Score::ZERO {
            scored_at = Some(frame);
            let right = h.game.obstacles().pair(0).unwrap().right();
            assert!(right < bird_x);
        }
    }
    assert!(scored_at.is_some());
    assert_eq!(h.game.score(), Score::from_halves(1));
    assert_eq!(h.game.score().as_f64(), 0.5);
    assert_eq!(h.game.last_scored(), Some(0));
    let scores = h
        .game
        .take_cues()
        .into_iter()
        .filter(|c| *c == Cue::Score)
        .count();
    assert_eq!(scores, 1);
}

#[test]
fn test_score_never_decreases_and_stops_when_over() {
    let mut h = Harness::new();
    h.tap();
    let mut last = Score::ZERO;
    for _ in 0..380 {
        h.glide(150.0);
        assert!(h.game.score() >= last);
        assert!(h.game.score().halves() - last.halves() <= 1);
        last = h.game.score();
    }
    assert_eq!(last, Score::from_halves(2));

    h.game.bird_mut().y = 2000.0;
    h.frame();
    assert_eq!(h.game.mode(), Mode::Over);
    for _ in 0..100 {
        h.frame();
    }
    assert_eq!(h.game.score(), last);
    assert_eq!(h.game.high_score(), last);
}

#[test]
fn test_game_over_screen_shows_scores() {
    let mut h = Harness::new();
    h.tap();
    for _ in 0..380 {
        h.glide(150.0);
    }
    h.game.bird_mut().y = 2000.0;
    h.frame();
    h.frame();
    let texts: Vec<String> = h.canvas.texts().iter().map(|t| t.text.clone()).collect();
    assert_eq!(
        texts,
        vec!["Game Over!", "Score: 1", "High Score: 1", "Tap to play again"]
    );
}

#[test]
fn test_finish_line_crash_is_ordinary_game_over() {
    let mut h = Harness::new();
    h.tap();
    // Fly every gap at its center until something ends the run
    let gap_centers: Vec<(f64, f64)> = PIPE_LAYOUT
        .iter()
        .map(|&(x, y)| (x, y + 70.0 - 12.0))
        .collect();
    let bird_x = h.game.bird().x;
    let mut frames = 0;
    while h.game.mode() == Mode::Running && frames < 3000 {
        let travelled = frames as f64 * 2.0;
        // Next pair whose right edge is still ahead of the bird's tail
        let y = gap_centers
            .iter()
            .find(|(x, _)| x - travelled + 52.0 >= bird_x - 2.0)
            .map_or(200.0, |&(_, y)| y);
        h.glide(y);
        frames += 1;
    }
    assert_eq!(h.game.mode(), Mode::Over);
    // All 13 pairs cleared before the finish banner stopped the bird
    assert_eq!(h.game.score(), Score::from_halves(13));
    let finish = h.game.obstacles().finish().unwrap();
    assert!(finish.x <= bird_x + h.game.bird().width());
}

#[test]
fn test_frames_run_at_forty_hertz() {
    let mut h = Harness::new();
    let start = h.driver.clock().now();
    for _ in 0..41 {
        h.frame();
    }
    assert_eq!(h.driver.clock().now() - start, Duration::from_secs(1));
    assert_eq!(h.driver.frames(), 41);
}
