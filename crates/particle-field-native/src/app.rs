use eframe::egui::{self, Color32, ColorImage, Key, Pos2, Rect, TextureHandle, TextureOptions};
use particle_field::{Animator, FieldConfig, ManualHost, PixelSurface, Surface};
use rand::rngs::StdRng;

type PreviewAnimator = Animator<PixelSurface, ManualHost, StdRng>;

pub struct ParticleFieldApp {
    animator: Option<PreviewAnimator>,
    texture: Option<TextureHandle>,
    background: Color32,
    show_overlay: bool,
}

impl ParticleFieldApp {
    pub fn new(config: FieldConfig, rng: StdRng, size: [usize; 2]) -> Self {
        let bg = config.background;
        let surface = PixelSurface::new(size[0], size[1]);
        Self {
            animator: Animator::start(Some(surface), ManualHost::new(), config, rng),
            texture: None,
            background: Color32::from_rgb(bg.r, bg.g, bg.b),
            show_overlay: true,
        }
    }

    /// Match the backing pixels to the panel in physical pixels, so the
    /// texture is not upscaled on HiDPI displays.
    fn sync_size(animator: &mut PreviewAnimator, rect: Rect, pixels_per_point: f32) {
        let width = f64::from((rect.width() * pixels_per_point).round().max(1.0));
        let height = f64::from((rect.height() * pixels_per_point).round().max(1.0));
        if animator.surface().size() != (width, height) {
            animator.on_resize(width, height);
        }
    }

    fn overlay_text(animator: &PreviewAnimator, dt: f32) -> String {
        let state = if animator.is_running() { "running" } else { "stopped" };
        format!(
            "{state} | frame {} | {} particles | FPS: {:.0}\n[space] stop  [o] overlay",
            animator.field().frame(),
            animator.field().particles().len(),
            1.0 / dt.max(f32::EPSILON),
        )
    }
}

impl eframe::App for ParticleFieldApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt);

        if ctx.input(|i| i.key_pressed(Key::Space)) {
            if let Some(animator) = self.animator.as_mut() {
                animator.stop();
            }
        }
        if ctx.input(|i| i.key_pressed(Key::O)) {
            self.show_overlay = !self.show_overlay;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(self.background))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let Some(animator) = self.animator.as_mut() else {
                    ui.label("particle field unavailable");
                    return;
                };

                Self::sync_size(animator, rect, ui.ctx().pixels_per_point());
                if animator.frame_pending() {
                    animator.on_frame();
                }

                let surface = animator.surface();
                let image = ColorImage::from_rgba_unmultiplied([surface.width(), surface.height()], surface.as_rgba());
                match &mut self.texture {
                    Some(texture) => texture.set(image, TextureOptions::LINEAR),
                    None => self.texture = Some(ui.ctx().load_texture("particle-field", image, TextureOptions::LINEAR)),
                }
                if let Some(texture) = &self.texture {
                    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                    ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
                }

                if self.show_overlay {
                    ui.painter().text(
                        rect.left_top() + egui::vec2(8.0, 8.0),
                        egui::Align2::LEFT_TOP,
                        Self::overlay_text(animator, dt),
                        egui::FontId::monospace(12.0),
                        Color32::from_gray(160),
                    );
                }
            });

        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn preview_starts_running() {
        let app = ParticleFieldApp::new(FieldConfig::default(), StdRng::seed_from_u64(1), [320, 200]);
        let animator = app.animator.as_ref().unwrap();
        assert!(animator.is_running());
        assert!(animator.frame_pending());
        assert_eq!(app.background, Color32::from_rgb(10, 14, 39));
    }

    #[test]
    fn sync_size_resizes_once() {
        let mut app = ParticleFieldApp::new(FieldConfig::default(), StdRng::seed_from_u64(1), [320, 200]);
        let animator = app.animator.as_mut().unwrap();
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(640.0, 400.0));
        ParticleFieldApp::sync_size(animator, rect, 1.0);
        assert_eq!(animator.surface().size(), (640.0, 400.0));
        assert_eq!(animator.field().bounds(), (640.0, 400.0));
    }

    #[test]
    fn sync_size_uses_physical_pixels() {
        let mut app = ParticleFieldApp::new(FieldConfig::default(), StdRng::seed_from_u64(1), [320, 200]);
        let animator = app.animator.as_mut().unwrap();
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(320.0, 200.0));
        ParticleFieldApp::sync_size(animator, rect, 2.0);
        assert_eq!(animator.surface().size(), (640.0, 400.0));
        assert_eq!((animator.surface().width(), animator.surface().height()), (640, 400));
        assert_eq!(animator.field().bounds(), (640.0, 400.0));
    }

    #[test]
    fn overlay_reports_state() {
        let mut app = ParticleFieldApp::new(FieldConfig::default(), StdRng::seed_from_u64(1), [32, 20]);
        let animator = app.animator.as_mut().unwrap();
        animator.on_frame();
        animator.stop();
        let text = ParticleFieldApp::overlay_text(animator, 1.0 / 60.0);
        assert!(text.starts_with("stopped | frame 1 | 50 particles"), "{text}");
    }
}
