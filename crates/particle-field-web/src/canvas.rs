use log::warn;
use particle_field::{Fill, Stroke, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// `Surface` over a 2D canvas context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn set_radial_fill(&self, cx: f64, cy: f64, radius: f64, inner: &str, outer: &str) -> Result<(), JsValue> {
        let gradient = self.ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, radius)?;
        gradient.add_color_stop(0.0, inner)?;
        gradient.add_color_stop(1.0, outer)?;
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &Fill) {
        match fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            Fill::Radial(glow) => {
                let inner = glow.color.to_css();
                let outer = glow.color.transparent().to_css();
                if let Err(err) = self.set_radial_fill(glow.cx, glow.cy, glow.radius, &inner, &outer) {
                    warn!("skipping glow at ({}, {}): {err:?}", glow.cx, glow.cy);
                    return;
                }
            }
        }
        self.ctx.fill_rect(x, y, width, height);
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke) {
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width);
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }
}
