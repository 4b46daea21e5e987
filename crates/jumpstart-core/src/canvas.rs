//! The layered canvas wrapper.
//!
//! Owns three stacked surfaces sized to a host container, drives the
//! update/draw loop from the host's frame scheduler, and dispatches resize
//! and pointer events to user callbacks.
//!
//! ## Lifecycle
//!
//! | State | Entered by | Self-schedules |
//! |-------|------------|----------------|
//! | `Uninitialized` | construction | no |
//! | `Detached` | `initialize()` with no host element or surfaces | no |
//! | `Running` | `initialize()` or `start()` while active | yes |
//! | `Paused` | `initialize()` or `stop()` while inactive | no |

use crate::callbacks::Callbacks;
use crate::config::{CanvasConfig, FramePacing};
use crate::control::LoopControl;
use crate::host::{Host, Surface};
use crate::input::{PointerKind, PointerPosition};
use crate::surface::{Layer, SurfaceStack};
use crate::timing::FrameClock;
use kurbo::{Point, Size};

/// The 2D context type produced by a host's surfaces.
pub type ContextOf<H> = <<H as Host>::Surface as Surface>::Context;

/// Result of [`LayeredCanvas::initialize`]. Neither variant is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Surfaces appended to the host element and setup invoked.
    Attached,
    /// No element with the configured id; nothing was attached.
    HostMissing,
    /// The host could not create the drawing surfaces.
    SurfacesUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Detached,
    Running,
    Paused,
}

struct Mounted<H: Host> {
    element: H::Element,
    surfaces: SurfaceStack<H::Surface>,
}

/// Three stacked drawing surfaces plus a frame loop.
pub struct LayeredCanvas<H: Host> {
    host: H,
    container_id: String,
    config: CanvasConfig,
    pacing: FramePacing,
    mounted: Option<Mounted<H>>,
    detached: bool,
    clock: FrameClock,
    control: LoopControl<H::Scheduler>,
    callbacks: Callbacks<ContextOf<H>>,
}

impl<H: Host> LayeredCanvas<H> {
    pub fn new(host: H, container_id: impl Into<String>, config: CanvasConfig) -> Self {
        let config = config.sanitized();
        let control = LoopControl::new(config.active, host.scheduler());
        Self {
            container_id: container_id.into(),
            pacing: config.pacing(),
            clock: FrameClock::new(config.delta_cap),
            config,
            mounted: None,
            detached: false,
            control,
            callbacks: Callbacks::default(),
            host,
        }
    }

    /// Create the surfaces, attach them to the host element, run setup and
    /// start the loop if active.
    ///
    /// A missing host element is not an error: the surfaces are discarded
    /// and no callback runs. A later call may retry. Once attached, further
    /// calls do nothing.
    pub fn initialize(&mut self) -> InitOutcome {
        if self.mounted.is_some() {
            log::debug!("canvas '{}' already initialized", self.container_id);
            return InitOutcome::Attached;
        }

        let [Some(background), Some(middle), Some(foreground)] =
            Layer::ALL.map(|layer| self.host.create_surface(layer))
        else {
            log::warn!("host could not create canvas surfaces");
            self.detached = true;
            return InitOutcome::SurfacesUnavailable;
        };
        let mut surfaces = SurfaceStack::new(background, middle, foreground);

        let Some(element) = self.host.find_element(&self.container_id) else {
            log::warn!(
                "host element '{}' not found; canvas not attached",
                self.container_id
            );
            self.detached = true;
            return InitOutcome::HostMissing;
        };

        for surface in surfaces.iter() {
            self.host.append(&element, surface);
        }
        let size = self.host.content_size(&element);
        surfaces.resize(size);
        self.mounted = Some(Mounted { element, surfaces });
        self.detached = false;
        log::debug!(
            "canvas '{}' attached at {}x{}",
            self.container_id,
            size.width,
            size.height
        );

        self.callbacks.setup(size.width, size.height);

        let now = self.host.now();
        self.clock.reset(now);
        if self.control.is_active() {
            self.control.request_frame();
            self.run_frame(now);
        }
        InitOutcome::Attached
    }

    pub fn start(&self) {
        self.control.start();
    }

    pub fn stop(&self) {
        self.control.stop();
    }

    /// Advance exactly one frame, whether or not the loop is active.
    /// Returns `false` if the canvas is not attached.
    pub fn step_once(&mut self) -> bool {
        if self.mounted.is_none() {
            return false;
        }
        let now = self.host.now();
        self.run_frame(now);
        true
    }

    /// Frame step, called by the host scheduler once per tick.
    ///
    /// Returns whether update/draw ran.
    pub fn tick(&mut self) -> bool {
        if !self.control.is_active() || self.mounted.is_none() {
            log::trace!("tick ignored: loop inactive or detached");
            return false;
        }
        self.control.request_frame();

        let now = self.host.now();
        if let FramePacing::Capped { interval_ms } = self.pacing
            && self.clock.elapsed(now) < interval_ms
        {
            return false;
        }
        self.run_frame(now);
        true
    }

    fn run_frame(&mut self, now: f64) {
        let delta = self.clock.advance(now);
        let Some(mounted) = self.mounted.as_ref() else {
            return;
        };
        let size = mounted.surfaces.size();

        self.callbacks.update(size.width, size.height, delta);

        if !self.callbacks.has_draw() {
            return;
        }
        match mounted.surfaces.contexts() {
            Some((fore, mid, bg)) => {
                self.callbacks
                    .draw(size.width, size.height, delta, (&fore, &mid, &bg));
            }
            None => log::trace!("2D context unavailable; draw skipped"),
        }
    }

    /// Re-measure the host element and resize every surface to match.
    pub fn handle_resize(&mut self) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        let size = self.host.content_size(&mounted.element);
        mounted.surfaces.resize(size);
        log::debug!("canvas resized to {}x{}", size.width, size.height);
        self.callbacks.resize();
    }

    /// Dispatch a pointer event given in client coordinates.
    pub fn handle_pointer(&mut self, kind: PointerKind, client: Point) {
        let Some(mounted) = self.mounted.as_ref() else {
            return;
        };
        if self.callbacks.pointer_mut(kind).is_none() {
            return;
        }
        let origin = mounted.surfaces.foreground().origin();
        let pos = PointerPosition::relative_to(client, origin);
        self.callbacks.pointer(kind, pos);
    }

    // ─── Callback registration ──────────────────────────────────────────

    pub fn on_setup(&mut self, f: impl FnMut(f64, f64) + 'static) {
        self.callbacks.setup = Some(Box::new(f));
    }

    pub fn on_update(&mut self, f: impl FnMut(f64, f64, f64) + 'static) {
        self.callbacks.update = Some(Box::new(f));
    }

    pub fn on_draw(
        &mut self,
        f: impl FnMut(f64, f64, f64, &ContextOf<H>, &ContextOf<H>, &ContextOf<H>) + 'static,
    ) {
        self.callbacks.draw = Some(Box::new(f));
    }

    pub fn on_resize(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.resize = Some(Box::new(f));
    }

    pub fn on_pointer(&mut self, kind: PointerKind, f: impl FnMut(PointerPosition) + 'static) {
        *self.callbacks.pointer_mut(kind) = Some(Box::new(f));
    }

    pub fn on_pointer_down(&mut self, f: impl FnMut(PointerPosition) + 'static) {
        self.on_pointer(PointerKind::Down, f);
    }

    pub fn on_pointer_up(&mut self, f: impl FnMut(PointerPosition) + 'static) {
        self.on_pointer(PointerKind::Up, f);
    }

    pub fn on_pointer_move(&mut self, f: impl FnMut(PointerPosition) + 'static) {
        self.on_pointer(PointerKind::Move, f);
    }

    // ─── Configuration ──────────────────────────────────────────────────

    /// Change the frame-rate target; `<= 0` removes the cap.
    pub fn set_framerate_target(&mut self, fps: f64) {
        self.config = self.config.with_framerate_target(fps);
        self.pacing = self.config.pacing();
    }

    pub fn set_delta_cap(&mut self, cap_ms: f64) {
        self.config = self.config.with_delta_cap(cap_ms);
        self.clock.set_delta_cap(self.config.delta_cap);
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Current surface size; zero until attached.
    pub fn size(&self) -> Size {
        self.mounted
            .as_ref()
            .map_or(Size::ZERO, |m| m.surfaces.size())
    }

    pub fn is_active(&self) -> bool {
        self.control.is_active()
    }

    /// A handle that can start or stop the loop without borrowing the canvas.
    pub fn control(&self) -> LoopControl<H::Scheduler> {
        self.control.clone()
    }

    pub fn surfaces(&self) -> Option<&SurfaceStack<H::Surface>> {
        self.mounted.as_ref().map(|m| &m.surfaces)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> LifecycleState {
        match (&self.mounted, self.detached) {
            (Some(_), _) if self.control.is_active() => LifecycleState::Running,
            (Some(_), _) => LifecycleState::Paused,
            (None, true) => LifecycleState::Detached,
            (None, false) => LifecycleState::Uninitialized,
        }
    }
}
