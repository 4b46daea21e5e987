//! Host environment boundary.
//!
//! The canvas wrapper never touches the DOM directly. Element lookup,
//! surface creation, geometry, the clock, and frame scheduling all go through
//! these traits. `jumpstart-wasm` implements them with `web-sys`; tests use
//! an in-memory fake.

use crate::surface::Layer;
use kurbo::{Point, Size};

/// The host's per-frame scheduling primitive (`requestAnimationFrame`).
pub trait FrameScheduler {
    /// Ask for the frame step to run once on the next tick.
    ///
    /// Implementations coalesce: while a tick is already pending, further
    /// requests are no-ops.
    fn request_frame(&self);
}

/// A drawing target owned by the wrapper.
pub trait Surface {
    /// The 2D drawing context handed to the draw callback.
    type Context;

    /// Set the backing pixel size.
    fn set_size(&self, size: Size);

    /// Current backing pixel size.
    fn size(&self) -> Size;

    /// Acquire the 2D context, if the host can provide one.
    fn context_2d(&self) -> Option<Self::Context>;

    /// Top-left corner of the surface's bounding box in client coordinates.
    fn origin(&self) -> Point;
}

/// Everything the wrapper needs from its environment.
pub trait Host {
    /// A container element that surfaces get appended to.
    type Element;
    type Surface: Surface;
    type Scheduler: FrameScheduler + Clone;

    fn find_element(&self, id: &str) -> Option<Self::Element>;

    /// Create a detached surface styled for `layer` (absolute, top/left 0,
    /// full size, the layer's z-index).
    fn create_surface(&self, layer: Layer) -> Option<Self::Surface>;

    fn append(&self, parent: &Self::Element, surface: &Self::Surface);

    /// Content-box size of a container element.
    fn content_size(&self, element: &Self::Element) -> Size;

    /// Monotonic clock in milliseconds.
    fn now(&self) -> f64;

    fn scheduler(&self) -> Self::Scheduler;
}
