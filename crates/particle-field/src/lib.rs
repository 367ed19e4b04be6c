//! Ambient particle field.
//!
//! A fixed pool of softly glowing particles drifts across a full-viewport
//! surface over a faint static grid. Every frame paints a low-alpha
//! background fill instead of clearing, which leaves short motion trails;
//! each particle fades in and out along a sine envelope over its lifetime
//! and respawns in place when that lifetime runs out.
//!
//! [`ParticleField`] holds the simulation, [`Animator`] wraps it in a
//! start/stop lifecycle bound to a host [`Surface`] and [`FrameHost`].

pub mod animator;
pub mod color;
pub mod config;
pub mod field;
pub mod particle;
pub mod raster;
pub mod surface;

pub use animator::{Animator, FrameHost, ManualHost};
pub use color::{ColorParseError, Rgb, Rgba};
pub use config::{ConfigError, FieldConfig, Range};
pub use field::ParticleField;
pub use particle::Particle;
pub use raster::PixelSurface;
pub use surface::{DrawCall, Fill, RadialGlow, RecordingSurface, Stroke, Surface};
