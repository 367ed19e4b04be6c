use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse field config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("range `{field}` has min {min} greater than max {max}")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("`{field}` is out of bounds: {value}")]
    OutOfBounds { field: &'static str, value: f64 },
}

/// Half-open `[min, max)` sampling range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.min + rng.random::<f64>() * (self.max - self.min)
    }

    pub fn contains(&self, value: f64) -> bool {
        if self.min == self.max {
            return value == self.min;
        }
        (self.min..self.max).contains(&value)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max || self.min.is_nan() || self.max.is_nan() {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

// Configuration for the particle field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // Pool
    pub particle_count: usize,
    /// Velocity components are drawn from `[-velocity_range, velocity_range)` per frame.
    pub velocity_range: f64,
    pub size: Range,
    pub opacity: Range,
    /// Lifetime in frames.
    pub max_life: Range,

    // Rendering
    pub trail_alpha: f64,
    pub background: Rgb,
    pub glow: Rgb,

    // Static grid
    pub grid_size: f64,
    pub grid_alpha: f64,
    pub grid_line_width: f64,

    /// Wrap out-of-bounds particles back inside after a resize instead of
    /// letting them drift back on their own.
    pub reclamp_on_resize: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 50,
            velocity_range: 0.25,
            size: Range::new(1.0, 3.0),
            opacity: Range::new(0.3, 0.8),
            max_life: Range::new(2000.0, 5000.0),

            trail_alpha: 0.05,
            background: Rgb::new(10, 14, 39),
            glow: Rgb::new(0, 217, 255),

            grid_size: 50.0,
            grid_alpha: 0.05,
            grid_line_width: 1.0,

            reclamp_on_resize: false,
        }
    }
}

impl FieldConfig {
    /// Parse a possibly partial JSON document; absent keys keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] on malformed input and the validation
    /// errors of [`FieldConfig::validate`] otherwise.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Fails when a range is inverted or a scalar lies outside its domain.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.size.check("size")?;
        self.opacity.check("opacity")?;
        self.max_life.check("max_life")?;

        let out_of_bounds = |field, value| Err(ConfigError::OutOfBounds { field, value });
        if !(self.grid_size > 0.0) {
            return out_of_bounds("grid_size", self.grid_size);
        }
        if !(self.velocity_range >= 0.0) {
            return out_of_bounds("velocity_range", self.velocity_range);
        }
        if self.size.min < 0.0 {
            return out_of_bounds("size.min", self.size.min);
        }
        if !(self.max_life.min > 0.0) {
            return out_of_bounds("max_life.min", self.max_life.min);
        }
        for (field, value) in [
            ("opacity.min", self.opacity.min),
            ("opacity.max", self.opacity.max),
            ("trail_alpha", self.trail_alpha),
            ("grid_alpha", self.grid_alpha),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return out_of_bounds(field, value);
            }
        }
        if !(self.grid_line_width > 0.0) {
            return out_of_bounds("grid_line_width", self.grid_line_width);
        }
        Ok(())
    }

    /// Per-axis velocity sample, `(U - 0.5) * 2 * velocity_range`.
    pub fn sample_velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        (rng.random::<f64>() - 0.5) * 2.0 * self.velocity_range
    }
}
