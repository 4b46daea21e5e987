//! Loop activity flag.

use crate::host::FrameScheduler;
use std::cell::Cell;
use std::rc::Rc;

/// Shared handle to the run loop's activity flag and scheduler.
///
/// Cloning is cheap and every clone controls the same loop, so a handle
/// can be captured by user callbacks and flipped while a frame is running.
#[derive(Clone)]
pub struct LoopControl<S> {
    active: Rc<Cell<bool>>,
    scheduler: S,
}

impl<S: FrameScheduler> LoopControl<S> {
    pub fn new(active: bool, scheduler: S) -> Self {
        Self {
            active: Rc::new(Cell::new(active)),
            scheduler,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Mark the loop active and request a tick.
    pub fn start(&self) {
        if !self.active.replace(true) {
            log::debug!("frame loop started");
        }
        self.scheduler.request_frame();
    }

    /// Mark the loop inactive. A tick that is already pending still fires
    /// but does nothing.
    pub fn stop(&self) {
        if self.active.replace(false) {
            log::debug!("frame loop stopped");
        }
    }

    pub fn request_frame(&self) {
        self.scheduler.request_frame();
    }
}
