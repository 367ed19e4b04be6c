//! Start/stop lifecycle around a [`ParticleField`].
//!
//! The animator owns its surface, its random source and the host's frame
//! scheduling primitive. Hosts call [`Animator::on_frame`] when a requested
//! frame fires and [`Animator::on_resize`] when the viewport changes; both
//! entry points take `&mut self`, so a resize can never interleave with a
//! draw pass.

use log::{debug, warn};
use rand::Rng;
use std::fmt;

use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::surface::Surface;

/// "Run this once before the next repaint", plus its cancellation.
pub trait FrameHost {
    type Handle: Copy + fmt::Debug;

    /// Schedule one callback. `None` when the host cannot schedule.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    fn cancel_frame(&mut self, handle: Self::Handle);

    /// Release any listeners the host installed (e.g. resize). Called once.
    fn detach(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Running,
    Stopped,
}

pub struct Animator<S: Surface, H: FrameHost, R: Rng> {
    field: ParticleField<R>,
    surface: S,
    host: H,
    pending: Option<H::Handle>,
    state: State,
}

impl<S: Surface, H: FrameHost, R: Rng> Animator<S, H, R> {
    /// Allocate the pool for the surface's current size, draw the grid and
    /// schedule the first frame.
    ///
    /// No particles are drawn until the host fires that frame, one refresh
    /// after `start` returns; until then the surface only shows the grid.
    ///
    /// Without a surface, or with a config that fails
    /// [`FieldConfig::validate`], nothing is allocated or scheduled and `None`
    /// comes back; an ambient background simply stays absent.
    pub fn start(surface: Option<S>, host: H, config: FieldConfig, rng: R) -> Option<Self> {
        let Some(mut surface) = surface else {
            debug!("no drawing surface, particle field not started");
            return None;
        };
        if let Err(err) = config.validate() {
            warn!("particle field not started: {err}");
            return None;
        }

        let (width, height) = surface.size();
        let field = ParticleField::new(config, width, height, rng);
        field.draw_grid(&mut surface);

        let mut animator = Self {
            field,
            surface,
            host,
            pending: None,
            state: State::Running,
        };
        animator.pending = animator.host.request_frame();
        debug!(
            "particle field started: {} particles on {width}x{height}",
            animator.field.particles().len()
        );
        Some(animator)
    }

    /// Body of the scheduled frame callback. Returns `false`, touching
    /// nothing, once the animator has been stopped.
    pub fn on_frame(&mut self) -> bool {
        if self.state == State::Stopped {
            return false;
        }
        self.pending = None;
        self.field.step(&mut self.surface);
        self.pending = self.host.request_frame();
        true
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        if self.state == State::Stopped {
            return;
        }
        self.surface.resize(width, height);
        self.field.resize(width, height);
        self.field.draw_grid(&mut self.surface);
        debug!("particle field resized to {width}x{height}");
    }

    /// Cancel the pending frame and release host listeners. Safe to call
    /// repeatedly and before the first frame.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        if self.state == State::Running {
            self.state = State::Stopped;
            self.host.detach();
            debug!("particle field stopped after {} frames", self.field.frame());
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn frame_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<S: Surface, H: FrameHost, R: Rng> Drop for Animator<S, H, R> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Frame host driven by hand: the owner decides when an outstanding frame
/// fires. Used by the native preview loop and by tests.
#[derive(Debug, Default)]
pub struct ManualHost {
    next: u64,
    outstanding: Option<u64>,
    requested: u64,
    cancelled: Vec<u64>,
    detached: bool,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding(&self) -> Option<u64> {
        self.outstanding
    }

    /// Total frames ever requested.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> &[u64] {
        &self.cancelled
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

impl FrameHost for ManualHost {
    type Handle = u64;

    fn request_frame(&mut self) -> Option<u64> {
        self.next += 1;
        self.requested += 1;
        self.outstanding = Some(self.next);
        Some(self.next)
    }

    fn cancel_frame(&mut self, handle: u64) {
        if self.outstanding == Some(handle) {
            self.outstanding = None;
        }
        self.cancelled.push(handle);
    }

    fn detach(&mut self) {
        self.detached = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type TestAnimator = Animator<RecordingSurface, ManualHost, StdRng>;

    fn start(count: usize) -> TestAnimator {
        let config = FieldConfig {
            particle_count: count,
            ..FieldConfig::default()
        };
        Animator::start(
            Some(RecordingSurface::new(800.0, 600.0)),
            ManualHost::new(),
            config,
            StdRng::seed_from_u64(1),
        )
        .unwrap()
    }

    #[test]
    fn missing_surface_does_not_start() {
        let animator: Option<TestAnimator> =
            Animator::start(None, ManualHost::new(), FieldConfig::default(), StdRng::seed_from_u64(1));
        assert!(animator.is_none());
    }

    #[test]
    fn invalid_config_does_not_start() {
        for grid_size in [0.0, -50.0] {
            let config = FieldConfig {
                grid_size,
                ..FieldConfig::default()
            };
            let animator = Animator::start(
                Some(RecordingSurface::new(800.0, 600.0)),
                ManualHost::new(),
                config,
                StdRng::seed_from_u64(1),
            );
            assert!(animator.is_none(), "grid_size {grid_size} should be rejected");
        }
    }

    #[test]
    fn start_draws_grid_and_requests_a_frame() {
        let animator = start(5);
        assert!(animator.is_running());
        assert!(animator.frame_pending());
        // particles wait for the first scheduled frame
        assert_eq!(animator.field().frame(), 0);
        assert_eq!(animator.surface().glows().count(), 0);
        assert_eq!(animator.host().requested(), 1);
        // 17 vertical (0..=800) and 13 horizontal (0..=600) lines
        assert_eq!(animator.surface().lines().count(), 17 + 13);
        assert_eq!(animator.field().particles().len(), 5);
    }

    #[test]
    fn each_frame_reschedules() {
        let mut animator = start(5);
        for _ in 0..3 {
            assert!(animator.on_frame());
        }
        assert_eq!(animator.host().requested(), 4);
        assert_eq!(animator.field().frame(), 3);
    }

    #[test]
    fn stop_cancels_pending_frame_and_detaches() {
        let mut animator = start(5);
        let pending = animator.host().outstanding().unwrap();
        animator.stop();
        assert!(!animator.is_running());
        assert!(!animator.frame_pending());
        assert_eq!(animator.host().cancelled(), &[pending]);
        assert!(animator.host().is_detached());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut animator = start(5);
        animator.stop();
        animator.stop();
        animator.stop();
        assert_eq!(animator.host().cancelled().len(), 1);
    }

    #[test]
    fn frame_after_stop_draws_nothing() {
        let mut animator = start(4);
        let before = animator.field().particles().to_vec();
        let calls = animator.surface().calls().len();
        animator.stop();

        assert!(!animator.on_frame());
        assert_eq!(animator.surface().calls().len(), calls);
        assert_eq!(animator.field().particles(), before.as_slice());
        assert_eq!(animator.field().frame(), 0);
    }

    #[test]
    fn resize_after_stop_is_ignored() {
        let mut animator = start(4);
        animator.stop();
        animator.on_resize(100.0, 100.0);
        assert_eq!(animator.surface().size(), (800.0, 600.0));
    }

    struct FailingHost;

    impl FrameHost for FailingHost {
        type Handle = ();

        fn request_frame(&mut self) -> Option<()> {
            None
        }

        fn cancel_frame(&mut self, (): ()) {
            panic!("nothing was ever scheduled");
        }
    }

    #[test]
    fn host_without_scheduling_leaves_nothing_pending() {
        let mut animator = Animator::start(
            Some(RecordingSurface::new(10.0, 10.0)),
            FailingHost,
            FieldConfig::default(),
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert!(!animator.frame_pending());
        animator.stop();
    }
}
