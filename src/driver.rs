//! Fixed-rate frame driver
//!
//! A `Ticker` hands out frame deadlines at a fixed interval; the `Clock`
//! it waits on is swappable so tests can step time by hand.

use std::time::{Duration, Instant};

use crate::frame_interval;
use crate::game::GameState;
use crate::surface::Surface;

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep_until(&mut self, deadline: Instant);
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&mut self, deadline: Instant) {
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

/// Clock that only moves when told to. Sleeping jumps straight to the
/// deadline.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: Instant,
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self { now: start }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now
    }

    fn sleep_until(&mut self, deadline: Instant) {
        if deadline > self.now {
            self.now = deadline;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
    frames: u64,
}

impl Ticker {
    /// First frame is due immediately at `start`
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            next: start,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time left before the next frame is due
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Sleep until the next frame is due and return the frame's timestamp.
    /// After a stall longer than one interval the schedule restarts from
    /// now instead of bursting to catch up.
    pub fn wait(&mut self, clock: &mut impl Clock) -> Instant {
        clock.sleep_until(self.next);
        let now = clock.now();
        self.next += self.interval;
        if now > self.next {
            log::debug!("frame {} late by {:?}", self.frames, now - self.next);
            self.next = now + self.interval;
        }
        self.frames += 1;
        now
    }
}

/// One frame: clear, bird, ground, then the mode's own behavior
pub fn run_frame(game: &mut GameState, surface: &mut dyn Surface, now: Instant) {
    surface.clear();
    game.bird().draw(surface);
    game.bird_mut().advance();
    game.draw_ground(surface);
    game.step(now, surface);
}

pub struct FrameDriver<C: Clock> {
    clock: C,
    ticker: Ticker,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(clock: C, fps: u32) -> Self {
        let ticker = Ticker::new(frame_interval(fps), clock.now());
        Self { clock, ticker }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn frames(&self) -> u64 {
        self.ticker.frames()
    }

    pub fn time_to_next_frame(&self) -> Duration {
        self.ticker.remaining(self.clock.now())
    }

    /// Wait for the next deadline and run one frame. Returns the frame time.
    pub fn tick(&mut self, game: &mut GameState, surface: &mut dyn Surface) -> Instant {
        let now = self.ticker.wait(&mut self.clock);
        run_frame(game, surface, now);
        now
    }
}
