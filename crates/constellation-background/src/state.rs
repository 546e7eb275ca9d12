//! Renderer state and lifecycle.

use constellation_core::{Palette, Theme};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::constellation::{draw, max_connection_distance};
use crate::host::{FrameHandle, Host, ListenerId};
use crate::particle::{self, Particle};
use crate::surface::Surface;

/// Construction inputs for a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountOptions {
    /// Palette selector.
    pub theme: Theme,
    /// Tag for the drawing surface. Carried for styling and test hooks only.
    pub id: Option<String>,
}

impl MountOptions {
    pub fn new(theme: Theme) -> Self {
        Self { theme, id: None }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Whether the frame loop has a callback outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// A frame is scheduled under this handle.
    Scheduled(FrameHandle),
    /// No frame is scheduled and none will be.
    Stopped,
}

/// A mounted constellation background.
///
/// Mounting acquires every host resource the renderer needs: a resize
/// listener and, unless motion is reduced, a scheduled frame. Dropping the
/// renderer (or calling [`teardown`](Self::teardown)) releases them.
///
/// Particles are generated once per mount. A theme change is a new mount.
#[derive(Debug)]
pub struct ConstellationBackground<H: Host, R: Rng = StdRng> {
    /// Environment the renderer is mounted in.
    host: H,
    /// Randomness for spawning and jitter.
    rng: R,
    /// Surface tag.
    id: Option<String>,
    /// Theme the palette was chosen from.
    theme: Theme,
    /// Palette fixed at mount.
    palette: Palette,
    /// Current logical size and pixel ratio.
    surface: Surface,
    /// Particle population fixed at mount.
    particles: Vec<Particle>,
    /// Squared connection cutoff fixed at mount.
    max_dist_sq: f64,
    /// Reduced-motion preference sampled at mount.
    reduced_motion: bool,
    /// Frame loop state.
    loop_state: LoopState,
    /// Registered resize listener, if still mounted.
    resize_listener: Option<ListenerId>,
    /// Frames drawn since mount.
    frames_drawn: u64,
}

impl<H: Host> ConstellationBackground<H> {
    /// Mount a renderer seeded from system entropy.
    pub fn mount(host: H, options: MountOptions) -> Self {
        Self::mount_with_rng(host, options, StdRng::from_entropy())
    }
}

impl<H: Host, R: Rng> ConstellationBackground<H, R> {
    /// Mount a renderer with an explicit random source.
    pub fn mount_with_rng(mut host: H, options: MountOptions, mut rng: R) -> Self {
        let surface = Surface::new(host.container_size(), host.device_pixel_ratio());
        surface.apply(host.canvas());

        let palette = options.theme.palette();
        let particles = particle::spawn(&mut rng, surface.width(), surface.height(), &palette);
        let max_dist = max_connection_distance(surface.width(), surface.height());
        let reduced_motion = host.prefers_reduced_motion();
        let resize_listener = Some(host.add_resize_listener());

        debug!(
            id = options.id.as_deref().unwrap_or(""),
            theme = %options.theme,
            width = surface.width(),
            height = surface.height(),
            dpr = surface.dpr(),
            particles = particles.len(),
            reduced_motion,
            "mounted constellation background"
        );

        let mut background = Self {
            host,
            rng,
            id: options.id,
            theme: options.theme,
            palette,
            surface,
            particles,
            max_dist_sq: max_dist * max_dist,
            reduced_motion,
            loop_state: LoopState::Stopped,
            resize_listener,
            frames_drawn: 0,
        };

        if reduced_motion {
            background.draw_frame();
        } else {
            background.schedule_next();
        }
        background
    }

    /// Run the frame callback for `handle`.
    ///
    /// Returns `false` and does nothing if `handle` is not the frame this
    /// renderer is waiting for (stale, cancelled, or after teardown).
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.loop_state != LoopState::Scheduled(handle) {
            trace!(?handle, "ignoring stale frame");
            return false;
        }
        self.loop_state = LoopState::Stopped;

        self.draw_frame();
        if !self.reduced_motion {
            particle::advance(
                &mut self.particles,
                &mut self.rng,
                self.surface.width(),
                self.surface.height(),
            );
            self.schedule_next();
        }
        true
    }

    /// Handle a container resize.
    ///
    /// Re-measures and resizes the backing buffer. Particles are left
    /// exactly as they are, and the connection cutoff keeps its mount-time
    /// value.
    pub fn on_resize(&mut self) {
        if self.resize_listener.is_none() {
            return;
        }
        self.surface.remeasure(self.host.container_size());
        self.surface.apply(self.host.canvas());
        debug!(
            id = self.id.as_deref().unwrap_or(""),
            width = self.surface.width(),
            height = self.surface.height(),
            "resized constellation surface"
        );

        // Resizing discards the backing buffer, so the static frame must be
        // redrawn when nothing else will.
        if self.reduced_motion {
            self.draw_frame();
        }
    }

    /// Cancel the pending frame and release the resize listener.
    ///
    /// Safe to call any number of times.
    pub fn teardown(&mut self) {
        let mut released = false;
        if let LoopState::Scheduled(handle) =
            std::mem::replace(&mut self.loop_state, LoopState::Stopped)
        {
            self.host.cancel_frame(handle);
            released = true;
        }
        if let Some(listener) = self.resize_listener.take() {
            self.host.remove_resize_listener(listener);
            released = true;
        }
        if released {
            debug!(
                id = self.id.as_deref().unwrap_or(""),
                frames = self.frames_drawn,
                "tore down constellation background"
            );
        }
    }

    /// Surface tag passed at mount.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Squared connection cutoff in logical pixels.
    pub fn max_dist_sq(&self) -> f64 {
        self.max_dist_sq
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    /// Whether a frame callback is outstanding.
    pub fn is_scheduled(&self) -> bool {
        matches!(self.loop_state, LoopState::Scheduled(_))
    }

    /// Whether the renderer is still listening for resizes.
    pub fn is_mounted(&self) -> bool {
        self.resize_listener.is_some()
    }

    /// Frames drawn since mount.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn draw_frame(&mut self) {
        draw(
            self.host.canvas(),
            &self.particles,
            &self.palette,
            self.surface.width(),
            self.surface.height(),
            self.max_dist_sq,
        );
        self.frames_drawn += 1;
        trace!(frame = self.frames_drawn, "drew constellation frame");
    }

    fn schedule_next(&mut self) {
        self.loop_state = match self.host.request_frame() {
            Some(handle) => LoopState::Scheduled(handle),
            None => {
                debug!("host cannot schedule frames; constellation stays blank");
                LoopState::Stopped
            }
        };
    }
}

impl<H: Host, R: Rng> Drop for ConstellationBackground<H, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Transform;
    use crate::testing::{ManualHost, Op};

    fn mount(host: ManualHost, theme: Theme) -> ConstellationBackground<ManualHost> {
        ConstellationBackground::mount_with_rng(
            host,
            MountOptions::new(theme),
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_mount_sizes_surface() {
        let bg = mount(ManualHost::new(400.0, 300.0).with_dpr(2.0), Theme::Dark);
        let canvas = &bg.host().canvas;
        assert_eq!(canvas.backing, (800, 600));
        assert_eq!(canvas.display, (400.0, 300.0));
        assert_eq!(canvas.transform, Transform::scale(2.0));
    }

    #[test]
    fn test_mount_scenario_counts() {
        let bg = mount(ManualHost::new(400.0, 400.0), Theme::Dark);
        assert_eq!(bg.particles().len(), 18);
        let bg = mount(ManualHost::new(1200.0, 900.0), Theme::Dark);
        assert_eq!(bg.particles().len(), 18);
    }

    #[test]
    fn test_mount_schedules_and_listens() {
        let bg = mount(ManualHost::new(800.0, 600.0), Theme::Light);
        assert!(bg.is_scheduled());
        assert!(bg.is_mounted());
        assert_eq!(bg.host().pending_frames(), 1);
        assert_eq!(bg.host().resize_listeners(), 1);
        assert_eq!(bg.frames_drawn(), 0);
        assert_eq!(bg.palette(), &Theme::Light.palette());
    }

    #[test]
    fn test_max_dist_fixed_at_mount() {
        let mut bg = mount(ManualHost::new(500.0, 250.0), Theme::Dark);
        assert!((bg.max_dist_sq() - 3600.0).abs() < 1e-6);
        bg.host_mut().size = Some((2000.0, 2000.0));
        bg.on_resize();
        assert!((bg.max_dist_sq() - 3600.0).abs() < 1e-6);
    }

    #[test]
    fn test_frame_loop_reschedules() {
        let mut bg = mount(ManualHost::new(800.0, 600.0), Theme::Dark);
        for _ in 0..5 {
            let handle = bg.host_mut().take_frame().unwrap();
            assert!(bg.on_frame(handle));
            assert_eq!(bg.host().pending_frames(), 1);
        }
        assert_eq!(bg.frames_drawn(), 5);
        assert_eq!(bg.host().canvas.count_clears(), 5);
    }

    #[test]
    fn test_stale_frame_ignored() {
        let mut bg = mount(ManualHost::new(800.0, 600.0), Theme::Dark);
        let first = bg.host_mut().take_frame().unwrap();
        assert!(bg.on_frame(first));
        assert!(!bg.on_frame(first));
        assert_eq!(bg.frames_drawn(), 1);
    }

    #[test]
    fn test_frame_moves_particles() {
        let mut bg = mount(ManualHost::new(800.0, 600.0), Theme::Dark);
        let before = bg.particles().to_vec();
        let handle = bg.host_mut().take_frame().unwrap();
        bg.on_frame(handle);
        assert_ne!(bg.particles(), before.as_slice());
        for (a, b) in before.iter().zip(bg.particles()) {
            assert_eq!(a.vx, b.vx);
            assert_eq!(a.r, b.r);
        }
    }

    #[test]
    fn test_reduced_motion_draws_once() {
        let mut bg = mount(
            ManualHost::new(800.0, 600.0).with_reduced_motion(),
            Theme::Dark,
        );
        let initial = bg.particles().to_vec();
        assert_eq!(bg.frames_drawn(), 1);
        assert!(!bg.is_scheduled());
        assert_eq!(bg.host().pending_frames(), 0);

        for _ in 0..10 {
            assert!(bg.host_mut().take_frame().is_none());
            assert!(!bg.on_frame(FrameHandle(1)));
        }
        assert_eq!(bg.particles(), initial.as_slice());
        assert_eq!(bg.host().canvas.count_clears(), 1);
    }

    #[test]
    fn test_reduced_motion_redraws_after_resize() {
        let mut bg = mount(
            ManualHost::new(800.0, 600.0).with_reduced_motion(),
            Theme::Light,
        );
        bg.host_mut().size = Some((1024.0, 768.0));
        bg.on_resize();
        assert_eq!(bg.frames_drawn(), 2);
        assert!(!bg.is_scheduled());
    }

    #[test]
    fn test_without_scheduler_never_draws() {
        let bg = mount(
            ManualHost::new(800.0, 600.0).without_scheduler(),
            Theme::Dark,
        );
        assert_eq!(bg.loop_state(), LoopState::Stopped);
        assert_eq!(bg.frames_drawn(), 0);
        assert_eq!(bg.host().canvas.count_clears(), 0);
    }

    #[test]
    fn test_zero_area_is_inert() {
        let mut host = ManualHost::new(0.0, 0.0);
        host.size = None;
        let mut bg = mount(host, Theme::Dark);
        assert!(bg.particles().is_empty());
        let handle = bg.host_mut().take_frame().unwrap();
        assert!(bg.on_frame(handle));
        assert_eq!(bg.host().canvas.count_lines(), 0);
        assert_eq!(bg.host().canvas.count_circles(), 0);
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut bg = mount(ManualHost::new(800.0, 600.0).with_dpr(2.0), Theme::Dark);
        let before = bg.particles().to_vec();
        bg.host_mut().size = Some((1600.0, 1200.0));
        bg.on_resize();
        assert_eq!(bg.particles(), before.as_slice());
        assert_eq!(bg.host().canvas.backing, (3200, 2400));
        assert_eq!(bg.surface().width(), 1600.0);
        assert_eq!(bg.host().canvas.transform, Transform::scale(2.0));
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut bg = mount(ManualHost::new(800.0, 600.0), Theme::Dark);
        bg.teardown();
        bg.teardown();
        assert!(!bg.is_scheduled());
        assert!(!bg.is_mounted());
        assert_eq!(bg.host().pending_frames(), 0);
        assert_eq!(bg.host().resize_listeners(), 0);
        assert_eq!(bg.host().cancellations, 1);
    }

    #[test]
    fn test_teardown_ignores_later_events() {
        let mut bg = mount(ManualHost::new(800.0, 600.0), Theme::Dark);
        let handle = bg.host_mut().take_frame().unwrap();
        bg.teardown();
        assert!(!bg.on_frame(handle));
        let ops = bg.host().canvas.ops.len();
        bg.host_mut().size = Some((10.0, 10.0));
        bg.on_resize();
        assert_eq!(bg.host().canvas.ops.len(), ops);
        assert_eq!(bg.host().pending_frames(), 0);
    }

    #[test]
    fn test_resize_records_backing_op() {
        let mut bg = mount(ManualHost::new(100.0, 100.0), Theme::Dark);
        bg.host_mut().size = Some((50.0, 20.0));
        bg.on_resize();
        assert_eq!(
            bg.host().canvas.ops.last(),
            Some(&Op::Resize {
                width: 50,
                height: 20
            })
        );
    }

    #[test]
    fn test_id_is_passthrough() {
        let bg = ConstellationBackground::mount_with_rng(
            ManualHost::new(100.0, 100.0),
            MountOptions::new(Theme::Dark).with_id("hero-canvas"),
            StdRng::seed_from_u64(0),
        );
        assert_eq!(bg.id(), Some("hero-canvas"));
        assert_eq!(bg.theme(), Theme::Dark);
    }
}
