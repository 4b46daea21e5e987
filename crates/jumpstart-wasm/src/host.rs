//! `web-sys` implementation of the host traits.
//!
//! Surfaces are `<canvas>` elements, the scheduler is
//! `requestAnimationFrame`, and the clock is `performance.now()`.

use jumpstart_core::{FrameScheduler, Host, Layer, Point, Size, Surface};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, Window};

// ─── Scheduler ──────────────────────────────────────────────────────────

struct FrameLoopInner {
    window: Window,
    /// A `requestAnimationFrame` call is outstanding.
    pending: Cell<bool>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

/// Coalescing `requestAnimationFrame` scheduler.
///
/// The frame callback is installed once; every request re-arms it. At most
/// one request is outstanding at a time.
#[derive(Clone)]
pub struct FrameLoop {
    inner: Rc<FrameLoopInner>,
}

impl FrameLoop {
    pub fn new(window: Window) -> Self {
        Self {
            inner: Rc::new(FrameLoopInner {
                window,
                pending: Cell::new(false),
                callback: RefCell::new(None),
            }),
        }
    }

    /// Install the per-tick body. The pending flag is cleared before `body`
    /// runs so that it can request the next tick.
    pub fn install(&self, mut body: impl FnMut() + 'static) {
        let inner = Rc::downgrade(&self.inner);
        let cb = Closure::wrap(Box::new(move |_ts: f64| {
            if let Some(inner) = inner.upgrade() {
                inner.pending.set(false);
            }
            body();
        }) as Box<dyn FnMut(f64)>);
        *self.inner.callback.borrow_mut() = Some(cb);
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&self) {
        if self.inner.pending.get() {
            return;
        }
        let callback = self.inner.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            log::trace!("frame requested before the loop body was installed");
            return;
        };
        match self
            .inner
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
        {
            Ok(_) => self.inner.pending.set(true),
            Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
        }
    }
}

// ─── Surfaces ───────────────────────────────────────────────────────────

/// One `<canvas>` layer.
pub struct CanvasSurface {
    pub canvas: HtmlCanvasElement,
}

impl Surface for CanvasSurface {
    type Context = CanvasRenderingContext2d;

    fn set_size(&self, size: Size) {
        self.canvas.set_width(size.width.max(0.0).round() as u32);
        self.canvas.set_height(size.height.max(0.0).round() as u32);
    }

    fn size(&self) -> Size {
        Size::new(f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn context_2d(&self) -> Option<CanvasRenderingContext2d> {
        self.canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()
    }

    fn origin(&self) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        Point::new(rect.left(), rect.top())
    }
}

// ─── Host ───────────────────────────────────────────────────────────────

/// The browser document the canvas lives in.
#[derive(Clone)]
pub struct WebHost {
    window: Window,
    document: Document,
    frames: FrameLoop,
}

impl WebHost {
    /// `None` outside a window context (e.g. in a worker).
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            frames: FrameLoop::new(window.clone()),
            window,
            document,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    /// Sum of two computed padding properties, in px.
    fn padding(&self, element: &HtmlElement, a: &str, b: &str) -> f64 {
        let Ok(Some(style)) = self.window.get_computed_style(element) else {
            return 0.0;
        };
        [a, b]
            .iter()
            .filter_map(|prop| style.get_property_value(prop).ok())
            .filter_map(|value| value.trim_end_matches("px").trim().parse::<f64>().ok())
            .sum()
    }
}

impl Host for WebHost {
    type Element = HtmlElement;
    type Surface = CanvasSurface;
    type Scheduler = FrameLoop;

    fn find_element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn create_surface(&self, layer: Layer) -> Option<CanvasSurface> {
        let canvas = self
            .document
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let style = canvas.style();
        let z_index = layer.z_index().to_string();
        for (prop, value) in [
            ("width", "100%"),
            ("height", "100%"),
            ("position", "absolute"),
            ("top", "0"),
            ("left", "0"),
            ("z-index", z_index.as_str()),
        ] {
            if let Err(e) = style.set_property(prop, value) {
                log::warn!("failed to set canvas style {prop}: {e:?}");
            }
        }
        Some(CanvasSurface { canvas })
    }

    fn append(&self, parent: &HtmlElement, surface: &CanvasSurface) {
        if let Err(e) = parent.append_child(&surface.canvas) {
            log::warn!("failed to append canvas layer: {e:?}");
        }
    }

    fn content_size(&self, element: &HtmlElement) -> Size {
        let width = f64::from(element.client_width())
            - self.padding(element, "padding-left", "padding-right");
        let height = f64::from(element.client_height())
            - self.padding(element, "padding-top", "padding-bottom");
        Size::new(width.max(0.0), height.max(0.0))
    }

    fn now(&self) -> f64 {
        self.window
            .performance()
            .map_or_else(js_sys::Date::now, |p| p.now())
    }

    fn scheduler(&self) -> FrameLoop {
        self.frames.clone()
    }
}
