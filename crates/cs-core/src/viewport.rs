//! Viewport math: fitting the workspace into the visible container and
//! stepping the zoom.
//!
//! A viewport maps document coordinates to screen coordinates as
//! `screen = doc * zoom + pan`.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Fraction of the container the fitted workspace occupies.
pub const FIT_RATIO: f64 = 0.85;
pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 1.0;
/// Zoom change per zoom-in / zoom-out step.
pub const ZOOM_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Vec2,
}

impl Viewport {
    pub const IDENTITY: Viewport = Viewport {
        zoom: 1.0,
        pan: Vec2::ZERO,
    };

    /// The viewport as an affine transform (document → screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    pub fn to_screen(&self, p: Point) -> Point {
        self.transform() * p
    }

    pub fn to_document(&self, p: Point) -> Point {
        Point::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    /// Zoom to `zoom` (clamped) keeping the document point under the screen
    /// point `anchor` fixed.
    #[must_use]
    pub fn zoom_to_point(&self, anchor: Point, zoom: f64) -> Viewport {
        let zoom = clamp_zoom(zoom);
        let doc = self.to_document(anchor);
        Viewport {
            zoom,
            pan: anchor.to_vec2() - doc.to_vec2() * zoom,
        }
    }

    /// Step the zoom by `steps` increments about the container center.
    #[must_use]
    pub fn step(&self, steps: i32, container: Size) -> Viewport {
        let center = container.to_rect().center();
        self.zoom_to_point(center, self.zoom + ZOOM_STEP * f64::from(steps))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Clamp a zoom level to the allowed range. Non-finite input maps to the
/// maximum.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        MAX_ZOOM
    }
}

/// Zoom at which the workspace fills `FIT_RATIO` of the container on its
/// tighter axis.
pub fn fit_zoom(container: Size, workspace: Size) -> f64 {
    let scale = (container.width / workspace.width).min(container.height / workspace.height);
    clamp_zoom(FIT_RATIO * scale)
}

/// Viewport that fits `workspace` into `container` and centers it.
pub fn fit_workspace(container: Size, workspace: Rect) -> Viewport {
    let zoom = fit_zoom(container, workspace.size());
    let center = container.to_rect().center();
    Viewport {
        zoom,
        pan: center.to_vec2() - workspace.center().to_vec2() * zoom,
    }
}
