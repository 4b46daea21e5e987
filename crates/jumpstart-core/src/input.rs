//! Pointer input normalization.
//!
//! Raw client coordinates from the host are translated into positions
//! relative to the foreground surface before reaching user callbacks.

use kurbo::Point;

/// Which pointer callback an event is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Up,
    Move,
}

impl PointerKind {
    /// Map a DOM event type (`pointerdown`, `mouseup`, ...) to a kind.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "pointerdown" | "mousedown" => Some(Self::Down),
            "pointerup" | "mouseup" => Some(Self::Up),
            "pointermove" | "mousemove" => Some(Self::Move),
            _ => None,
        }
    }

    /// DOM event name the web bridge listens for.
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Down => "pointerdown",
            Self::Up => "pointerup",
            Self::Move => "pointermove",
        }
    }

    pub const ALL: [PointerKind; 3] = [Self::Down, Self::Up, Self::Move];
}

/// Pointer position relative to the foreground surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate client coordinates into the space of a surface whose
    /// bounding box starts at `origin`.
    pub fn relative_to(client: Point, origin: Point) -> Self {
        let local = client - origin.to_vec2();
        Self {
            x: local.x,
            y: local.y,
        }
    }
}

impl From<PointerPosition> for Point {
    fn from(pos: PointerPosition) -> Self {
        Point::new(pos.x, pos.y)
    }
}
