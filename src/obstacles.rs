//! The pipe course
//!
//! A fixed list of pipe pairs followed by an unpaired finish-line sprite.
//! Everything scrolls left at `PIPE_SPEED`.

use std::rc::Rc;

use crate::consts::{FINISH_X, GAP_SIZE, PIPE_SPEED};
use crate::sprite::{Image, Sprite};

/// (x, gap top) for every pipe pair, left to right
#[rustfmt::skip]
pub const PIPE_LAYOUT: [(f64, f64); 13] = [
    (500.0, 100.0), (800.0, 50.0), (1000.0, 250.0), (1200.0, 150.0),
    (1600.0, 100.0), (1800.0, 150.0), (2000.0, 200.0), (2200.0, 250.0),
    (2400.0, 30.0), (2700.0, 300.0), (3000.0, 100.0), (3300.0, 250.0),
    (3600.0, 50.0),
];

/// Top and bottom halves of one gap. Index into [`ObstacleSet::pair`].
#[derive(Debug, Clone, Copy)]
pub struct ObstaclePair<'a> {
    pub top: &'a Sprite,
    pub bottom: &'a Sprite,
}

impl ObstaclePair<'_> {
    /// Right edge shared by both halves
    pub fn right(&self) -> f64 {
        self.top.x + self.top.width()
    }
}

/// Pipe pairs stored flat as `[top0, bottom0, top1, bottom1, ..., finish]`
#[derive(Debug, Clone)]
pub struct ObstacleSet {
    sprites: Vec<Sprite>,
}

impl ObstacleSet {
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.sprites.len() / 2
    }

    pub fn pair(&self, i: usize) -> Option<ObstaclePair<'_>> {
        if i >= self.pair_count() {
            return None;
        }
        Some(ObstaclePair {
            top: &self.sprites[i * 2],
            bottom: &self.sprites[i * 2 + 1],
        })
    }

    pub fn pairs(&self) -> impl Iterator<Item = ObstaclePair<'_>> {
        (0..self.pair_count()).filter_map(|i| self.pair(i))
    }

    /// The unpaired last sprite
    pub fn finish(&self) -> Option<&Sprite> {
        (self.sprites.len() % 2 == 1)
            .then(|| self.sprites.last())
            .flatten()
    }

    /// Move every sprite by one frame of velocity
    pub fn advance(&mut self) {
        for s in &mut self.sprites {
            s.advance();
        }
    }
}

/// Top sprite ends at `gap_y`, flipped bottom sprite starts at
/// `gap_y + gap_size`.
fn push_pair(sprites: &mut Vec<Sprite>, pipe: &Rc<Image>, x: f64, gap_y: f64, gap_size: f64) {
    let mut top = Sprite::at(Rc::clone(pipe), x, gap_y - pipe.height() as f64);
    top.vx = PIPE_SPEED;
    sprites.push(top);

    let mut bottom = Sprite::at(Rc::clone(pipe), x, gap_y + gap_size);
    bottom.flip_v = true;
    bottom.vx = PIPE_SPEED;
    sprites.push(bottom);
}

/// Build the full course. Takes loaded images, so it can only run after
/// the assets exist.
pub fn build_obstacle_set(pipe: &Rc<Image>, finish: &Rc<Image>) -> ObstacleSet {
    let mut sprites = Vec::with_capacity(PIPE_LAYOUT.len() * 2 + 1);
    for &(x, gap_y) in &PIPE_LAYOUT {
        push_pair(&mut sprites, pipe, x, gap_y, GAP_SIZE);
    }
    let mut finish_line = Sprite::at(Rc::clone(finish), FINISH_X, 0.0);
    finish_line.vx = PIPE_SPEED;
    sprites.push(finish_line);
    ObstacleSet { sprites }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images() -> (Rc<Image>, Rc<Image>) {
        (Rc::new(Image::blank(52, 400)), Rc::new(Image::blank(30, 480)))
    }

    #[test]
    fn test_course_has_13_pairs_and_finish() {
        let (pipe, finish) = images();
        let set = build_obstacle_set(&pipe, &finish);
        assert_eq!(set.len(), 27);
        assert_eq!(set.pair_count(), 13);
        let f = set.finish().unwrap();
        assert_eq!((f.x, f.y, f.vx), (3900.0, 0.0, -2.0));
    }

    #[test]
    fn test_pairs_match_layout() {
        let (pipe, finish) = images();
        let set = build_obstacle_set(&pipe, &finish);
        for (pair, &(x, gap_y)) in set.pairs().zip(PIPE_LAYOUT.iter()) {
            assert_eq!(pair.top.x, x);
            assert_eq!(pair.bottom.x, x);
            assert_eq!(pair.top.y, gap_y - 400.0);
            assert_eq!(pair.bottom.y, gap_y + 140.0);
            assert_eq!(pair.bottom.y - pair.top.bounding_box().bottom, GAP_SIZE);
            assert!(!pair.top.flip_v);
            assert!(pair.bottom.flip_v);
            assert_eq!(pair.top.vx, -2.0);
            assert_eq!(pair.bottom.vx, -2.0);
        }
    }

    #[test]
    fn test_pair_halves_stay_aligned() {
        let (pipe, finish) = images();
        let mut set = build_obstacle_set(&pipe, &finish);
        for _ in 0..100 {
            set.advance();
        }
        for pair in set.pairs() {
            assert_eq!(pair.top.x, pair.bottom.x);
        }
        assert_eq!(set.pair(0).unwrap().top.x, 300.0);
        assert_eq!(set.finish().unwrap().x, 3700.0);
    }

    #[test]
    fn test_pair_out_of_range() {
        let (pipe, finish) = images();
        let set = build_obstacle_set(&pipe, &finish);
        assert!(set.pair(13).is_none());
        assert_eq!(set.pair(0).unwrap().right(), 552.0);
    }
}
