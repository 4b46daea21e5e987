//! In-memory host for driving `LayeredCanvas` deterministically.
//!
//! The clock only moves when a test says so, and scheduled frames fire only
//! when a test pumps them.

#![allow(dead_code)]

use jumpstart_core::{
    CanvasConfig, FrameScheduler, Host, Layer, LayeredCanvas, PointerKind, Point, Size, Surface,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shared state behind the fake host, its surfaces and its scheduler.
pub struct World {
    pub now: Cell<f64>,
    pub elements: RefCell<HashMap<String, Size>>,
    /// `(element id, z-index)` in append order.
    pub appended: RefCell<Vec<(String, i32)>>,
    pub created: Cell<usize>,
    pub surfaces_available: Cell<bool>,
    pub frame_pending: Cell<bool>,
    pub frame_requests: Cell<usize>,
    pub contexts_available: Cell<bool>,
    pub surface_origin: Cell<Point>,
}

impl World {
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set_element_size(&self, id: &str, width: f64, height: f64) {
        self.elements
            .borrow_mut()
            .insert(id.to_string(), Size::new(width, height));
    }

    /// Consume the pending frame, if any.
    pub fn take_frame(&self) -> bool {
        self.frame_pending.replace(false)
    }
}

#[derive(Clone)]
pub struct FakeHost {
    pub world: Rc<World>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            world: Rc::new(World {
                now: Cell::new(1_000.0),
                elements: RefCell::new(HashMap::new()),
                appended: RefCell::new(Vec::new()),
                created: Cell::new(0),
                surfaces_available: Cell::new(true),
                frame_pending: Cell::new(false),
                frame_requests: Cell::new(0),
                contexts_available: Cell::new(true),
                surface_origin: Cell::new(Point::ORIGIN),
            }),
        }
    }

    /// A host with one element of the given size.
    pub fn with_element(id: &str, width: f64, height: f64) -> Self {
        let host = Self::new();
        host.world.set_element_size(id, width, height);
        host
    }
}

pub struct FakeElement(pub String);

pub struct FakeSurface {
    layer: Layer,
    size: Cell<Size>,
    world: Rc<World>,
}

impl Surface for FakeSurface {
    /// The context identifies which layer it belongs to.
    type Context = Layer;

    fn set_size(&self, size: Size) {
        self.size.set(size);
    }

    fn size(&self) -> Size {
        self.size.get()
    }

    fn context_2d(&self) -> Option<Layer> {
        self.world.contexts_available.get().then_some(self.layer)
    }

    fn origin(&self) -> Point {
        self.world.surface_origin.get()
    }
}

#[derive(Clone)]
pub struct ManualScheduler {
    world: Rc<World>,
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self) {
        self.world
            .frame_requests
            .set(self.world.frame_requests.get() + 1);
        self.world.frame_pending.set(true);
    }
}

impl Host for FakeHost {
    type Element = FakeElement;
    type Surface = FakeSurface;
    type Scheduler = ManualScheduler;

    fn find_element(&self, id: &str) -> Option<FakeElement> {
        self.world
            .elements
            .borrow()
            .contains_key(id)
            .then(|| FakeElement(id.to_string()))
    }

    fn create_surface(&self, layer: Layer) -> Option<FakeSurface> {
        if !self.world.surfaces_available.get() {
            return None;
        }
        self.world.created.set(self.world.created.get() + 1);
        Some(FakeSurface {
            layer,
            size: Cell::new(Size::ZERO),
            world: Rc::clone(&self.world),
        })
    }

    fn append(&self, parent: &FakeElement, surface: &FakeSurface) {
        self.world
            .appended
            .borrow_mut()
            .push((parent.0.clone(), surface.layer.z_index()));
    }

    fn content_size(&self, element: &FakeElement) -> Size {
        self.world
            .elements
            .borrow()
            .get(&element.0)
            .copied()
            .unwrap_or(Size::ZERO)
    }

    fn now(&self) -> f64 {
        self.world.now.get()
    }

    fn scheduler(&self) -> ManualScheduler {
        ManualScheduler {
            world: Rc::clone(&self.world),
        }
    }
}

/// Everything a canvas reported to its callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Setup { width: f64, height: f64 },
    Update { width: f64, height: f64, delta: f64 },
    Draw { delta: f64, layers: [Layer; 3] },
    Resize,
    Pointer { kind: PointerKind, x: f64, y: f64 },
}

pub type Recorder = Rc<RefCell<Vec<Event>>>;

/// Register a recording handler in every callback slot.
pub fn record_all(canvas: &mut LayeredCanvas<FakeHost>) -> Recorder {
    let events: Recorder = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&events);
    canvas.on_setup(move |width, height| log.borrow_mut().push(Event::Setup { width, height }));
    let log = Rc::clone(&events);
    canvas.on_update(move |width, height, delta| {
        log.borrow_mut().push(Event::Update {
            width,
            height,
            delta,
        })
    });
    let log = Rc::clone(&events);
    canvas.on_draw(move |_, _, delta, fore, mid, bg| {
        log.borrow_mut().push(Event::Draw {
            delta,
            layers: [*fore, *mid, *bg],
        })
    });
    let log = Rc::clone(&events);
    canvas.on_resize(move || log.borrow_mut().push(Event::Resize));
    for kind in PointerKind::ALL {
        let log = Rc::clone(&events);
        canvas.on_pointer(kind, move |pos| {
            log.borrow_mut().push(Event::Pointer {
                kind,
                x: pos.x,
                y: pos.y,
            })
        });
    }
    events
}

pub fn count(events: &Recorder, pred: impl Fn(&Event) -> bool) -> usize {
    events.borrow().iter().filter(|e| pred(e)).count()
}

pub fn draws(events: &Recorder) -> usize {
    count(events, |e| matches!(e, Event::Draw { .. }))
}

pub fn updates(events: &Recorder) -> usize {
    count(events, |e| matches!(e, Event::Update { .. }))
}

/// Fire the pending frame (if any) `ticks` times, moving the clock by
/// `interval` ms before each one.
pub fn pump(canvas: &mut LayeredCanvas<FakeHost>, world: &World, ticks: usize, interval: f64) {
    for _ in 0..ticks {
        world.advance(interval);
        if world.take_frame() {
            canvas.tick();
        }
    }
}

pub fn canvas(host: &FakeHost, id: &str, config: CanvasConfig) -> LayeredCanvas<FakeHost> {
    init_logging();
    LayeredCanvas::new(host.clone(), id, config)
}
