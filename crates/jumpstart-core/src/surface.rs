//! The three-layer surface stack.

use crate::host::Surface;
use kurbo::Size;

/// Depth position of a surface within the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Middle,
    Foreground,
}

impl Layer {
    /// Bottom to top.
    pub const ALL: [Layer; 3] = [Layer::Background, Layer::Middle, Layer::Foreground];

    /// CSS z-index assigned to the layer.
    pub fn z_index(self) -> i32 {
        match self {
            Layer::Background => 5,
            Layer::Middle => 6,
            Layer::Foreground => 7,
        }
    }
}

/// Background, middle and foreground surfaces, always the same size.
pub struct SurfaceStack<S> {
    background: S,
    middle: S,
    foreground: S,
    size: Size,
}

impl<S: Surface> SurfaceStack<S> {
    pub fn new(background: S, middle: S, foreground: S) -> Self {
        Self {
            background,
            middle,
            foreground,
            size: Size::ZERO,
        }
    }

    pub fn get(&self, layer: Layer) -> &S {
        match layer {
            Layer::Background => &self.background,
            Layer::Middle => &self.middle,
            Layer::Foreground => &self.foreground,
        }
    }

    pub fn foreground(&self) -> &S {
        &self.foreground
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        Layer::ALL.into_iter().map(move |layer| self.get(layer))
    }

    /// Resize every surface to `size`.
    pub fn resize(&mut self, size: Size) {
        for surface in [&self.background, &self.middle, &self.foreground] {
            surface.set_size(size);
        }
        self.size = size;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Contexts in draw-callback order: foreground, middle, background.
    /// `None` if any surface has no 2D context.
    pub fn contexts(&self) -> Option<(S::Context, S::Context, S::Context)> {
        let fore = self.foreground.context_2d()?;
        let mid = self.middle.context_2d()?;
        let bg = self.background.context_2d()?;
        Some((fore, mid, bg))
    }
}
