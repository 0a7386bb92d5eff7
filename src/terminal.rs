//! Half-block terminal presentation
//!
//! The logical canvas is box-filtered down to the terminal's pixel grid
//! (one cell = two vertically stacked pixels, drawn with `▀`), letterboxed,
//! and text is printed on top as real characters.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color as CColor},
};

use crate::surface::{PixelCanvas, Rgb, Surface, TextItem};

const LETTERBOX: Rgb = Rgb(30, 30, 30);

fn color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, LETTERBOX);
    }

    fn set(&mut self, x: usize, y: usize, c: Rgb) {
        if x < self.w && y < self.h {
            self.px[y * self.w + x] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)
    }
}

// ── Canvas to terminal mapping ──────────────────────────────────────────────

/// Where the canvas lands inside the terminal pixel grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Terminal pixels per canvas pixel
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    /// Largest uniform fit of a `cw`x`ch` canvas in `pw`x`ph` pixels, centered
    pub fn fit(cw: u32, ch: u32, pw: usize, ph: usize) -> Self {
        let scale = (pw as f64 / cw.max(1) as f64).min(ph as f64 / ch.max(1) as f64);
        Self {
            scale,
            offset_x: (pw as f64 - cw as f64 * scale) / 2.0,
            offset_y: (ph as f64 - ch as f64 * scale) / 2.0,
        }
    }

    /// Canvas point to terminal pixel
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.offset_x + x * self.scale,
            self.offset_y + y * self.scale,
        )
    }
}

/// Average of the canvas pixels under one terminal pixel, or `None` in the
/// letterbox
fn sample(canvas: &PixelCanvas, vp: &Viewport, tx: usize, ty: usize) -> Option<Rgb> {
    let (cw, ch) = (canvas.width() as f64, canvas.height() as f64);
    let sx0 = (tx as f64 - vp.offset_x) / vp.scale;
    let sy0 = (ty as f64 - vp.offset_y) / vp.scale;
    let sx1 = (tx as f64 + 1.0 - vp.offset_x) / vp.scale;
    let sy1 = (ty as f64 + 1.0 - vp.offset_y) / vp.scale;
    if sx1 <= 0.0 || sy1 <= 0.0 || sx0 >= cw || sy0 >= ch {
        return None;
    }

    let x0 = sx0.max(0.0).floor() as u32;
    let y0 = sy0.max(0.0).floor() as u32;
    // Always cover at least one source pixel when upscaling
    let x1 = (sx1.min(cw).ceil() as u32).max(x0 + 1);
    let y1 = (sy1.min(ch).ceil() as u32).max(y0 + 1);

    let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
    for y in y0..y1 {
        for x in x0..x1 {
            if let Some(c) = canvas.pixel(x, y) {
                r += c.0 as u32;
                g += c.1 as u32;
                b += c.2 as u32;
                n += 1;
            }
        }
    }
    (n > 0).then(|| Rgb((r / n) as u8, (g / n) as u8, (b / n) as u8))
}

pub struct TerminalView {
    buf: PixelBuf,
    cols: u16,
    rows: u16,
}

impl TerminalView {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            buf: PixelBuf::new(cols as usize, rows as usize * 2),
            cols,
            rows,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.buf.resize(cols as usize, rows as usize * 2);
    }

    pub fn viewport(&self, canvas: &PixelCanvas) -> Viewport {
        Viewport::fit(canvas.width(), canvas.height(), self.buf.w, self.buf.h)
    }

    /// Downsample `canvas` into the terminal buffer
    pub fn compose(&mut self, canvas: &PixelCanvas) {
        let vp = self.viewport(canvas);
        for ty in 0..self.buf.h {
            for tx in 0..self.buf.w {
                let c = sample(canvas, &vp, tx, ty).unwrap_or(LETTERBOX);
                self.buf.set(tx, ty, c);
            }
        }
    }

    /// Terminal pixel color after the last `compose`
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.buf.w && y < self.buf.h).then(|| self.buf.get(x, y))
    }

    /// Compose, draw and flush one frame
    pub fn present(&mut self, canvas: &PixelCanvas, out: &mut impl Write) -> io::Result<()> {
        self.compose(canvas);
        self.buf.render(out)?;
        let vp = self.viewport(canvas);
        for item in canvas.texts() {
            self.print_text(item, &vp, out)?;
        }
        out.flush()
    }

    /// Cell (column, row) where a text item starts, or `None` if it falls
    /// off screen
    pub fn text_cell(&self, item: &TextItem, vp: &Viewport) -> Option<(u16, u16)> {
        let (sx, sy) = vp.to_screen(item.x, item.y);
        let len = item.text.chars().count() as f64;
        let col = (sx - len / 2.0).round().max(0.0);
        let row = (sy / 2.0).floor();
        if row < 0.0 || row >= self.rows as f64 || col >= self.cols as f64 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    fn print_text(&self, item: &TextItem, vp: &Viewport, out: &mut impl Write) -> io::Result<()> {
        let Some((col, row)) = self.text_cell(item, vp) else {
            return Ok(());
        };
        let room = (self.cols - col) as usize;
        let text: String = item.text.chars().take(room).collect();
        queue!(out, cursor::MoveTo(col, row))?;
        if item.style.size >= 25.0 {
            queue!(out, style::SetAttribute(Attribute::Bold))?;
        }
        queue!(
            out,
            style::SetForegroundColor(color(item.style.fill)),
            style::SetBackgroundColor(color(item.style.stroke)),
            style::Print(text),
            style::SetAttribute(Attribute::Reset),
            style::ResetColor
        )
    }
}
