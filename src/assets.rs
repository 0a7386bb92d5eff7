//! Pixel-art images, built once at startup
//!
//! The obstacle course needs the pipe and finish images, so nothing that
//! builds it can run before [`Assets::load`] returns.

use std::rc::Rc;

use crate::sprite::Image;
use crate::surface::Rgb;

// ── Palette ─────────────────────────────────────────────────────────────────

const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const FLAG_DARK: Rgb = Rgb(30, 30, 30);
const FLAG_LIGHT: Rgb = Rgb(250, 250, 250);

pub const BIRD_W: u32 = 34;
pub const BIRD_H: u32 = 24;
pub const PIPE_W: u32 = 52;
pub const PIPE_H: u32 = 400;
pub const FINISH_W: u32 = 30;
pub const GROUND_H: u32 = 20;
/// Horizontal repeat of the ground pattern; the scroll offset wraps at this
const GROUND_TILE: u32 = 24;

#[derive(Debug, Clone)]
pub struct Assets {
    pub bird: Rc<Image>,
    pub pipe: Rc<Image>,
    pub finish: Rc<Image>,
    pub ground: Rc<Image>,
}

impl Assets {
    /// Build every image for a surface of the given size
    pub fn load(width: u32, height: u32) -> Self {
        let assets = Self {
            bird: Rc::new(bird()),
            pipe: Rc::new(pipe()),
            finish: Rc::new(finish_line(height)),
            ground: Rc::new(ground_bar(width)),
        };
        log::debug!(
            "assets loaded: pipe {}x{}, ground {}x{}",
            assets.pipe.width(),
            assets.pipe.height(),
            assets.ground.width(),
            assets.ground.height()
        );
        assets
    }
}

fn bird() -> Image {
    let mut img = Image::blank(BIRD_W, BIRD_H);
    // Body
    img.fill_rect(6, 3, 22, 18, BIRD_Y);
    img.fill_rect(4, 6, 26, 12, BIRD_Y);
    img.fill_rect(8, 3, 16, 3, BIRD_HI);
    // Wing
    img.fill_rect(5, 11, 10, 6, BIRD_WING);
    // Eye
    img.fill_rect(20, 5, 6, 6, BIRD_EYE);
    img.fill_rect(23, 7, 2, 3, BIRD_PUPIL);
    // Beak
    img.fill_rect(26, 11, 8, 3, BIRD_BEAK_HI);
    img.fill_rect(26, 14, 7, 3, BIRD_BEAK);
    // Tail
    img.fill_rect(0, 9, 4, 5, BIRD_WING);
    img
}

/// Upright pipe: open cap at the bottom edge, which faces the gap. The
/// bottom half of a pair is the same image flipped.
fn pipe() -> Image {
    let mut img = Image::blank(PIPE_W, PIPE_H);
    let (w, h) = (PIPE_W as i32, PIPE_H as i32);
    let cap_h = 24;
    let inset = 3;

    // Body
    let body_w = w - inset * 2;
    for x in 0..body_w {
        let c = pipe_shade(x, body_w);
        for y in 0..h - cap_h {
            img.set(inset + x, y, c);
        }
    }
    // Cap
    for x in 0..w {
        let c = pipe_shade(x, w);
        for y in (h - cap_h)..h {
            img.set(x, y, c);
        }
        img.set(x, h - cap_h, CAP_DARK);
        img.set(x, h - 1, CAP_DARK);
    }
    img
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

/// Full-height checkered banner
fn finish_line(height: u32) -> Image {
    let mut img = Image::blank(FINISH_W, height);
    let square = 6;
    for y in 0..height as i32 {
        for x in 0..FINISH_W as i32 {
            let dark = (x / square + y / square) % 2 == 0;
            img.set(x, y, if dark { FLAG_DARK } else { FLAG_LIGHT });
        }
    }
    img
}

/// Grass and dirt strip, one tile wider than the surface so a scroll of up
/// to a full tile never shows a gap
fn ground_bar(width: u32) -> Image {
    let w = (width + GROUND_TILE * 2) as i32;
    let h = GROUND_H as i32;
    let mut img = Image::blank(w as u32, GROUND_H);
    for x in 0..w {
        let alt = (x / 3) % 2 == 0;
        img.set(x, 0, if alt { GRASS } else { GRASS_LIGHT });
        img.set(x, 1, GRASS);
        img.set(x, 2, GRASS);
    }
    for y in 3..h {
        for x in 0..w {
            let stripe = (x + y * 2) % 12 < 6;
            img.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_sizes() {
        let assets = Assets::load(320, 480);
        assert_eq!((assets.bird.width(), assets.bird.height()), (34, 24));
        assert_eq!((assets.pipe.width(), assets.pipe.height()), (52, 400));
        assert_eq!((assets.finish.width(), assets.finish.height()), (30, 480));
        assert_eq!(assets.ground.width(), 320 + 48);
        assert_eq!(assets.ground.height(), GROUND_H);
    }

    #[test]
    fn test_pipe_cap_is_at_bottom() {
        let pipe = pipe();
        // Body is inset, cap spans the full width
        assert_eq!(pipe.get(0, 0), None);
        assert!(pipe.get(0, PIPE_H - 1).is_some());
    }

    #[test]
    fn test_ground_pattern_repeats_every_tile() {
        let ground = ground_bar(100);
        for y in 0..GROUND_H {
            for x in 0..100 {
                assert_eq!(ground.get(x, y), ground.get(x + GROUND_TILE, y));
            }
        }
    }
}
