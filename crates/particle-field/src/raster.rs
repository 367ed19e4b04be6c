//! Software RGBA8 surface.
//!
//! Pixels are stored with straight alpha and composited source-over, so
//! repeated low-alpha trail fills converge on the background color the same
//! way a browser canvas does.

use crate::color::Rgba;
use crate::surface::{Fill, Stroke, Surface};

#[derive(Clone, Debug)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major RGBA bytes, unpremultiplied.
    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba, alpha: f64) {
        if alpha <= 0.0 {
            return;
        }
        let i = (y * self.width + x) * 4;
        let dst = &mut self.rgba[i..i + 4];

        let src_a = alpha.min(1.0);
        let dst_a = f64::from(dst[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        let mix = |src: u8, dst: u8| {
            let c = (f64::from(src) * src_a + f64::from(dst) * dst_a * (1.0 - src_a)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        dst[0] = mix(color.r, dst[0]);
        dst[1] = mix(color.g, dst[1]);
        dst[2] = mix(color.b, dst[2]);
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Pixel span covered by `[start, start + len)`, clipped to `limit`.
    fn span(start: f64, len: f64, limit: usize) -> std::ops::Range<usize> {
        let lo = start.round().max(0.0);
        let hi = (start + len).round().min(limit as f64);
        if hi <= lo {
            return 0..0;
        }
        lo as usize..hi as usize
    }

    fn plot(&mut self, x: f64, y: f64, thickness: usize, color: Rgba) {
        let half = (thickness / 2) as f64;
        let x0 = (x - half).floor();
        let y0 = (y - half).floor();
        for dy in 0..thickness {
            for dx in 0..thickness {
                let px = x0 + dx as f64;
                let py = y0 + dy as f64;
                if px < 0.0 || py < 0.0 {
                    continue;
                }
                let (px, py) = (px as usize, py as usize);
                if px < self.width && py < self.height {
                    self.blend(px, py, color, color.a);
                }
            }
        }
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0).round() as usize;
        self.height = height.max(0.0).round() as usize;
        self.rgba.clear();
        self.rgba.resize(self.width * self.height * 4, 0);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &Fill) {
        let xs = Self::span(x, width, self.width);
        let ys = Self::span(y, height, self.height);
        for py in ys {
            for px in xs.clone() {
                match fill {
                    Fill::Solid(color) => self.blend(px, py, *color, color.a),
                    Fill::Radial(glow) => {
                        let alpha = glow.alpha_at(px as f64 + 0.5, py as f64 + 0.5);
                        self.blend(px, py, glow.color, alpha);
                    }
                }
            }
        }
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke) {
        let thickness = stroke.width.round().max(1.0) as usize;
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        let count = steps as usize;
        let mut last = None;
        for i in 0..=count {
            let t = i as f64 / steps;
            let point = ((from.0 + dx * t).floor(), (from.1 + dy * t).floor());
            // Avoid double-blending the same pixel on the final step.
            if last == Some(point) {
                continue;
            }
            last = Some(point);
            self.plot(point.0, point.1, thickness, stroke.color);
        }
    }
}
