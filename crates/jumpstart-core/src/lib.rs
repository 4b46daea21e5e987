pub mod callbacks;
pub mod canvas;
pub mod config;
pub mod control;
pub mod host;
pub mod input;
pub mod surface;
pub mod timing;

pub use canvas::{ContextOf, InitOutcome, LayeredCanvas, LifecycleState};
pub use config::{CanvasConfig, DEFAULT_DELTA_CAP_MS, FramePacing};
pub use control::LoopControl;
pub use host::{FrameScheduler, Host, Surface};
pub use input::{PointerKind, PointerPosition};
pub use surface::{Layer, SurfaceStack};
pub use timing::FrameClock;

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Size};
