//! Drawing surface abstraction.
//!
//! The field only ever needs three primitives from its host: a rectangle
//! fill (solid or radial gradient), a stroked line, and resizing. Browser
//! canvases, the software rasterizer and the test recorder all implement
//! [`Surface`].

use crate::color::Rgba;

/// Radial gradient from `color` at the center to fully transparent at `radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialGlow {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub color: Rgba,
}

impl RadialGlow {
    /// Alpha of the gradient at `(x, y)`, linear between the two stops.
    pub fn alpha_at(&self, x: f64, y: f64) -> f64 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let distance = (x - self.cx).hypot(y - self.cy);
        self.color.a * (1.0 - distance / self.radius).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    Radial(RadialGlow),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

pub trait Surface {
    /// Current size in surface pixels.
    fn size(&self) -> (f64, f64);

    /// Resize the backing store. Contents are discarded, like a canvas.
    fn resize(&mut self, width: f64, height: f64);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &Fill);

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Resize {
        width: f64,
        height: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Fill,
    },
    StrokeLine {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Stroke,
    },
}

/// Surface that keeps every call instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn glows(&self) -> impl Iterator<Item = &RadialGlow> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::FillRect {
                fill: Fill::Radial(glow),
                ..
            } => Some(glow),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::StrokeLine { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.calls.push(DrawCall::Resize { width, height });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &Fill) {
        self.calls.push(DrawCall::FillRect {
            x,
            y,
            width,
            height,
            fill: *fill,
        });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke) {
        self.calls.push(DrawCall::StrokeLine {
            from,
            to,
            stroke: *stroke,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use approx::assert_abs_diff_eq;

    #[test]
    fn glow_alpha_falls_off_linearly() {
        let glow = RadialGlow {
            cx: 10.0,
            cy: 10.0,
            radius: 4.0,
            color: Rgb::new(0, 217, 255).with_alpha(0.8),
        };
        assert_abs_diff_eq!(glow.alpha_at(10.0, 10.0), 0.8);
        assert_abs_diff_eq!(glow.alpha_at(12.0, 10.0), 0.4);
        assert_abs_diff_eq!(glow.alpha_at(14.0, 10.0), 0.0);
        assert_abs_diff_eq!(glow.alpha_at(14.0, 14.0), 0.0);
    }

    #[test]
    fn zero_radius_glow_is_invisible() {
        let glow = RadialGlow {
            cx: 0.0,
            cy: 0.0,
            radius: 0.0,
            color: Rgb::new(255, 255, 255).with_alpha(1.0),
        };
        assert_eq!(glow.alpha_at(0.0, 0.0), 0.0);
    }

    #[test]
    fn recorder_tracks_resize() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        surface.resize(400.0, 300.0);
        assert_eq!(surface.size(), (400.0, 300.0));
        assert_eq!(
            surface.take_calls(),
            vec![DrawCall::Resize {
                width: 400.0,
                height: 300.0
            }]
        );
        assert!(surface.calls().is_empty());
    }
}
