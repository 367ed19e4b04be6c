use rand::Rng;
use std::f64::consts::PI;

use crate::color::Rgb;
use crate::config::FieldConfig;
use crate::surface::{Fill, RadialGlow};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub opacity: f64,
    /// Frames since the last (re)spawn.
    pub life: u32,
    pub max_life: f64,
}

impl Particle {
    /// Draws position, velocity, size, opacity and lifetime, in that order.
    pub fn spawn<R: Rng + ?Sized>(config: &FieldConfig, width: f64, height: f64, rng: &mut R) -> Self {
        Self {
            x: rng.random::<f64>() * width,
            y: rng.random::<f64>() * height,
            vx: config.sample_velocity(rng),
            vy: config.sample_velocity(rng),
            size: config.size.sample(rng),
            opacity: config.opacity.sample(rng),
            life: 0,
            max_life: config.max_life.sample(rng),
        }
    }

    /// New position and a reset life; everything else survives.
    pub fn respawn<R: Rng + ?Sized>(&mut self, width: f64, height: f64, rng: &mut R) {
        self.x = rng.random::<f64>() * width;
        self.y = rng.random::<f64>() * height;
        self.life = 0;
    }

    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life = self.life.saturating_add(1);
    }

    /// Teleport to the opposite edge once past a bound.
    pub fn wrap(&mut self, width: f64, height: f64) {
        if self.x < 0.0 {
            self.x = width;
        }
        if self.x > width {
            self.x = 0.0;
        }
        if self.y < 0.0 {
            self.y = height;
        }
        if self.y > height {
            self.y = 0.0;
        }
    }

    pub fn life_fraction(&self) -> f64 {
        f64::from(self.life) / self.max_life
    }

    /// Sine fade envelope: zero at spawn and expiry, `opacity` at mid-life.
    pub fn draw_opacity(&self) -> f64 {
        (self.opacity * (self.life_fraction() * PI).sin()).max(0.0)
    }

    pub fn is_expired(&self) -> bool {
        f64::from(self.life) >= self.max_life
    }

    /// Glow square of side `4 * size` centered on the particle.
    pub fn glow(&self, color: Rgb) -> (f64, f64, f64, f64, Fill) {
        let radius = self.size * 2.0;
        let fill = Fill::Radial(RadialGlow {
            cx: self.x,
            cy: self.y,
            radius,
            color: color.with_alpha(self.draw_opacity()),
        });
        (self.x - radius, self.y - radius, radius * 2.0, radius * 2.0, fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn particle(life: u32, max_life: f64) -> Particle {
        Particle {
            x: 100.0,
            y: 100.0,
            vx: 0.1,
            vy: -0.1,
            size: 2.0,
            opacity: 0.6,
            life,
            max_life,
        }
    }

    #[test]
    fn spawn_uses_injected_rng_in_order() {
        let config = FieldConfig::default();
        let spawned = Particle::spawn(&config, 800.0, 600.0, &mut StdRng::seed_from_u64(11));

        let mut rng = StdRng::seed_from_u64(11);
        let x = rng.random::<f64>() * 800.0;
        let y = rng.random::<f64>() * 600.0;
        let vx = (rng.random::<f64>() - 0.5) * 0.5;
        let vy = (rng.random::<f64>() - 0.5) * 0.5;
        let size = 1.0 + rng.random::<f64>() * 2.0;
        let opacity = 0.3 + rng.random::<f64>() * 0.5;
        let max_life = 2000.0 + rng.random::<f64>() * 3000.0;

        assert_abs_diff_eq!(spawned.x, x);
        assert_abs_diff_eq!(spawned.y, y);
        assert_abs_diff_eq!(spawned.vx, vx);
        assert_abs_diff_eq!(spawned.vy, vy);
        assert_abs_diff_eq!(spawned.size, size, epsilon = 1e-12);
        assert_abs_diff_eq!(spawned.opacity, opacity, epsilon = 1e-12);
        assert_abs_diff_eq!(spawned.max_life, max_life, epsilon = 1e-9);
        assert_eq!(spawned.life, 0);
    }

    #[test]
    fn fade_envelope_peaks_at_mid_life() {
        assert_abs_diff_eq!(particle(0, 2000.0).draw_opacity(), 0.0);
        assert_abs_diff_eq!(particle(1000, 2000.0).draw_opacity(), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(particle(2000, 2000.0).draw_opacity(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn fade_envelope_is_never_negative() {
        for life in 0..=2001 {
            let p = particle(life, 2000.5);
            assert!(p.draw_opacity() >= 0.0, "negative opacity at life {life}");
            assert!(p.draw_opacity() <= p.opacity);
        }
    }

    #[test]
    fn wrap_teleports_to_opposite_edge() {
        let mut p = particle(0, 2000.0);
        p.x = -0.1;
        p.y = 600.2;
        p.wrap(800.0, 600.0);
        assert_eq!((p.x, p.y), (800.0, 0.0));

        p.x = 800.4;
        p.y = -3.0;
        p.wrap(800.0, 600.0);
        assert_eq!((p.x, p.y), (0.0, 600.0));
    }

    #[test]
    fn wrap_keeps_velocity() {
        let mut p = particle(0, 2000.0);
        p.x = 900.0;
        p.wrap(800.0, 600.0);
        assert_eq!((p.vx, p.vy), (0.1, -0.1));
    }

    #[test]
    fn respawn_only_moves_and_resets_life() {
        let mut p = particle(2000, 2000.0);
        let before = p;
        p.respawn(800.0, 600.0, &mut StdRng::seed_from_u64(5));
        assert_eq!(p.life, 0);
        assert!((0.0..800.0).contains(&p.x));
        assert!((0.0..600.0).contains(&p.y));
        assert_eq!(
            (p.vx, p.vy, p.size, p.opacity, p.max_life),
            (before.vx, before.vy, before.size, before.opacity, before.max_life)
        );
    }

    #[test]
    fn glow_box_is_four_sizes_wide() {
        let p = particle(1000, 2000.0);
        let (x, y, w, h, fill) = p.glow(Rgb::new(0, 217, 255));
        assert_eq!((x, y, w, h), (96.0, 96.0, 8.0, 8.0));
        let Fill::Radial(glow) = fill else {
            panic!("particle glow should be radial");
        };
        assert_eq!(glow.radius, 4.0);
        assert_abs_diff_eq!(glow.color.a, 0.6, epsilon = 1e-12);
    }
}
