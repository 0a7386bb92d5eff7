//! Sprites: images that move, tilt and flip
//!
//! The bounding box is never stored. Collision and drawing both read it from
//! the current position and the image size.

use std::rc::Rc;

use crate::surface::{Rgb, Surface};

/// Immutable bitmap. `None` pixels are transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    px: Vec<Option<Rgb>>,
}

impl Image {
    /// Build from row-major pixels. Short buffers are padded with transparency.
    pub fn new(width: u32, height: u32, mut px: Vec<Option<Rgb>>) -> Self {
        px.resize(width as usize * height as usize, None);
        Self { width, height, px }
    }

    pub fn filled(width: u32, height: u32, c: Rgb) -> Self {
        Self::new(width, height, vec![Some(c); width as usize * height as usize])
    }

    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, Vec::new())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.px[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.px[(y as u32 * self.width + x as u32) as usize] = Some(c);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }
}

/// Axis-aligned box, `left/top` inclusive, `right/bottom` exclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub visible: bool,
    /// Rotation about the image center, in degrees
    pub angle: f64,
    pub flip_v: bool,
    pub flip_h: bool,
    image: Rc<Image>,
}

impl Sprite {
    pub fn new(image: Rc<Image>) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            visible: true,
            angle: 0.0,
            flip_v: false,
            flip_h: false,
            image,
        }
    }

    pub fn at(image: Rc<Image>, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::new(image)
        }
    }

    pub fn width(&self) -> f64 {
        self.image.width() as f64
    }

    pub fn height(&self) -> f64 {
        self.image.height() as f64
    }

    /// Move by one frame of velocity
    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            left: self.x,
            top: self.y,
            right: self.x + self.width(),
            bottom: self.y + self.height(),
        }
    }

    /// Draw rotated and flipped about the image center. Invisible sprites
    /// still push and pop their transform but blit nothing.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let (hw, hh) = (self.width() / 2.0, self.height() / 2.0);
        surface.save();
        surface.translate(self.x + hw, self.y + hh);
        surface.rotate(self.angle.to_radians());
        if self.flip_v {
            surface.scale(1.0, -1.0);
        }
        if self.flip_h {
            surface.scale(-1.0, 1.0);
        }
        if self.visible {
            surface.draw_image(&self.image, -hw, -hh);
        }
        surface.restore();
    }
}
