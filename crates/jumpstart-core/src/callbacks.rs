//! User callback registry.
//!
//! Every slot is optional; an empty slot means the event is dropped.

use crate::input::{PointerKind, PointerPosition};

/// `setup(width, height)`
pub type SetupFn = Box<dyn FnMut(f64, f64)>;
/// `update(width, height, delta_ms)`
pub type UpdateFn = Box<dyn FnMut(f64, f64, f64)>;
/// `draw(width, height, delta_ms, foreground, middle, background)`
pub type DrawFn<C> = Box<dyn FnMut(f64, f64, f64, &C, &C, &C)>;
/// `resize()`
pub type ResizeFn = Box<dyn FnMut()>;
/// `pointer(position)`
pub type PointerFn = Box<dyn FnMut(PointerPosition)>;

pub struct Callbacks<C> {
    pub setup: Option<SetupFn>,
    pub update: Option<UpdateFn>,
    pub draw: Option<DrawFn<C>>,
    pub resize: Option<ResizeFn>,
    pub pointer_down: Option<PointerFn>,
    pub pointer_up: Option<PointerFn>,
    pub pointer_move: Option<PointerFn>,
}

impl<C> Default for Callbacks<C> {
    fn default() -> Self {
        Self {
            setup: None,
            update: None,
            draw: None,
            resize: None,
            pointer_down: None,
            pointer_up: None,
            pointer_move: None,
        }
    }
}

impl<C> Callbacks<C> {
    pub fn pointer_mut(&mut self, kind: PointerKind) -> &mut Option<PointerFn> {
        match kind {
            PointerKind::Down => &mut self.pointer_down,
            PointerKind::Up => &mut self.pointer_up,
            PointerKind::Move => &mut self.pointer_move,
        }
    }

    pub fn has_draw(&self) -> bool {
        self.draw.is_some()
    }

    pub(crate) fn setup(&mut self, width: f64, height: f64) {
        if let Some(cb) = self.setup.as_mut() {
            cb(width, height);
        }
    }

    pub(crate) fn update(&mut self, width: f64, height: f64, delta: f64) {
        if let Some(cb) = self.update.as_mut() {
            cb(width, height, delta);
        }
    }

    pub(crate) fn draw(&mut self, width: f64, height: f64, delta: f64, layers: (&C, &C, &C)) {
        if let Some(cb) = self.draw.as_mut() {
            let (fore, mid, bg) = layers;
            cb(width, height, delta, fore, mid, bg);
        }
    }

    pub(crate) fn resize(&mut self) {
        if let Some(cb) = self.resize.as_mut() {
            cb();
        }
    }

    pub(crate) fn pointer(&mut self, kind: PointerKind, pos: PointerPosition) {
        if let Some(cb) = self.pointer_mut(kind).as_mut() {
            cb(pos);
        }
    }
}
