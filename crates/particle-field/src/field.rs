use log::trace;
use rand::Rng;

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::surface::{Fill, Stroke, Surface};

/// Fixed-size particle pool plus the bounds it lives in.
///
/// The pool length is set once from [`FieldConfig::particle_count`] and
/// particles are recycled in place, so indices are stable for the lifetime
/// of the field.
pub struct ParticleField<R> {
    config: FieldConfig,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    frame: u64,
    rng: R,
}

impl<R: Rng> ParticleField<R> {
    pub fn new(config: FieldConfig, width: f64, height: f64, mut rng: R) -> Self {
        let particles = (0..config.particle_count)
            .map(|_| Particle::spawn(&config, width, height, &mut rng))
            .collect();
        Self {
            config,
            particles,
            width,
            height,
            frame: 0,
            rng,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Frames stepped since the field was created.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// One display frame: fade the previous contents, then move, wrap, draw
    /// and recycle every particle in index order.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let trail = Fill::Solid(self.config.background.with_alpha(self.config.trail_alpha));
        surface.fill_rect(0.0, 0.0, self.width, self.height, &trail);

        for particle in &mut self.particles {
            particle.advance();
            particle.wrap(self.width, self.height);

            let (x, y, w, h, glow) = particle.glow(self.config.glow);
            surface.fill_rect(x, y, w, h, &glow);

            if particle.is_expired() {
                particle.respawn(self.width, self.height, &mut self.rng);
            }
        }

        self.frame += 1;
    }

    /// Static grid: a line every `grid_size` pixels on both axes, edges included.
    pub fn draw_grid<S: Surface + ?Sized>(&self, surface: &mut S) {
        let stroke = Stroke {
            color: self.config.glow.with_alpha(self.config.grid_alpha),
            width: self.config.grid_line_width,
        };

        let mut lines = 0usize;
        for x in grid_positions(self.config.grid_size, self.width) {
            surface.stroke_line((x, 0.0), (x, self.height), &stroke);
            lines += 1;
        }
        for y in grid_positions(self.config.grid_size, self.height) {
            surface.stroke_line((0.0, y), (self.width, y), &stroke);
            lines += 1;
        }
        trace!("drew {lines} grid lines over {}x{}", self.width, self.height);
    }

    /// Adopt new bounds. Particle positions are left alone unless
    /// `reclamp_on_resize` is configured.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;

        if self.config.reclamp_on_resize {
            for particle in &mut self.particles {
                particle.x = reclamp(particle.x, width);
                particle.y = reclamp(particle.y, height);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

fn grid_positions(spacing: f64, extent: f64) -> impl Iterator<Item = f64> {
    // A non-positive (or NaN) spacing would never pass `extent`.
    let count = if spacing > 0.0 { u32::MAX } else { 0 };
    (0..count)
        .map(move |i| f64::from(i) * spacing)
        .take_while(move |&offset| offset <= extent)
}

fn reclamp(value: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    if (0.0..extent).contains(&value) {
        value
    } else {
        value.rem_euclid(extent)
    }
}
