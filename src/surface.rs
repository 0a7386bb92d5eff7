//! 2D drawing surface
//!
//! `Surface` is the canvas-like API the game draws through: clear, a
//! save/restore transform stack, image blits and stroked text.
//! `PixelCanvas` is the software implementation, rendered later to the
//! terminal by [`crate::terminal`].

use glam::{DAffine2, DVec2};

use crate::sprite::Image;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

pub const SKY_TOP: Rgb = Rgb(70, 180, 200);
pub const SKY_BOT: Rgb = Rgb(190, 232, 245);

// ── Transforms ──────────────────────────────────────────────────────────────

/// 2D affine transform, canvas convention: each operation applies to
/// coordinates before the existing transform
pub type Transform = DAffine2;

/// Inverse of `t`, `None` if degenerate (e.g. scaled by zero)
pub fn inverse(t: &Transform) -> Option<Transform> {
    (t.matrix2.determinant().abs() >= 1e-12).then(|| t.inverse())
}

// ── Surface ─────────────────────────────────────────────────────────────────

/// Text appearance: outline in `stroke`, body in `fill`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub fill: Rgb,
    pub stroke: Rgb,
}

impl TextStyle {
    pub const fn outlined(size: f64) -> Self {
        Self {
            size,
            fill: Rgb(255, 255, 255),
            stroke: Rgb(0, 0, 0),
        }
    }
}

/// A line of text drawn this frame, anchored at its horizontal center
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub style: TextStyle,
}

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Wipe the whole surface to its background and drop queued text
    fn clear(&mut self);

    /// Push the current transform
    fn save(&mut self);
    /// Pop back to the last saved transform
    fn restore(&mut self);

    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    /// Blit `image` with its top-left corner at (x, y) in current coordinates
    fn draw_image(&mut self, image: &Image, x: f64, y: f64);

    /// Stroke then fill `text`, horizontally centered on (x, y)
    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);
}

// ── Pixel canvas ────────────────────────────────────────────────────────────

pub struct PixelCanvas {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
    transform: Transform,
    saved: Vec<Transform>,
    texts: Vec<TextItem>,
}

impl PixelCanvas {
    pub fn new(w: u32, h: u32) -> Self {
        let (w, h) = (w as usize, h as usize);
        let mut canvas = Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
            transform: Transform::IDENTITY,
            saved: Vec::new(),
            texts: Vec::new(),
        };
        canvas.clear();
        canvas
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let (x, y) = (x as usize, y as usize);
        (x < self.w && y < self.h).then(|| self.px[y * self.w + x])
    }

    pub fn texts(&self) -> &[TextItem] {
        &self.texts
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    fn fill_row(&mut self, y: usize, c: Rgb) {
        let row = y * self.w;
        self.px[row..row + self.w].fill(c);
    }
}

impl Surface for PixelCanvas {
    fn width(&self) -> u32 {
        self.w as u32
    }

    fn height(&self) -> u32 {
        self.h as u32
    }

    fn clear(&mut self) {
        for y in 0..self.h {
            let t = (y * 256 / self.h.max(1)) as u16;
            self.fill_row(y, Rgb::lerp(SKY_TOP, SKY_BOT, t));
        }
        self.texts.clear();
    }

    fn save(&mut self) {
        self.saved.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.saved.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.transform = self.transform * DAffine2::from_translation(DVec2::new(x, y));
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform * DAffine2::from_angle(radians);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform * DAffine2::from_scale(DVec2::new(sx, sy));
    }

    fn draw_image(&mut self, image: &Image, x: f64, y: f64) {
        let t = self.transform;
        let Some(inv) = inverse(&t) else { return };
        let origin = DVec2::new(x, y);
        let size = DVec2::new(image.width() as f64, image.height() as f64);

        // Device-space bounds of the transformed image, clipped to the canvas
        let corners = [
            origin,
            origin + DVec2::new(size.x, 0.0),
            origin + DVec2::new(0.0, size.y),
            origin + size,
        ]
        .map(|c| t.transform_point2(c));
        let min = corners.iter().copied().fold(DVec2::INFINITY, DVec2::min);
        let max = corners.iter().copied().fold(DVec2::NEG_INFINITY, DVec2::max);

        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.w);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.h);

        for py in y0..y1 {
            for px in x0..x1 {
                // Sample at the pixel center
                let local = inv.transform_point2(DVec2::new(px as f64 + 0.5, py as f64 + 0.5));
                let u = (local.x - x).floor();
                let v = (local.y - y).floor();
                if u < 0.0 || v < 0.0 || u >= size.x || v >= size.y {
                    continue;
                }
                if let Some(c) = image.get(u as u32, v as u32) {
                    self.px[py * self.w + px] = c;
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        let at = self.transform.transform_point2(DVec2::new(x, y));
        self.texts.push(TextItem {
            text: text.to_string(),
            x: at.x,
            y: at.y,
            style: *style,
        });
    }
}
