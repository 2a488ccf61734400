//! The seam between the editor and the retained-mode renderer.
//!
//! The editor owns its surface and tells it what changed; the surface
//! never mutates the document. Pixel encodings come back from `capture`.

use cs_core::{Color, ObjectId, Rect, SceneDocument, Viewport};

/// A change to the scene document, fed to the surface after it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    Added(ObjectId),
    Removed(ObjectId),
    Modified(ObjectId),
    /// Workspace size or fill changed.
    WorkspaceChanged,
    /// Z-order of the object list changed.
    Reordered,
    /// Every object was dropped (start of a wholesale load).
    Cleared,
    /// A whole document was loaded.
    Loaded,
}

impl SceneEvent {
    /// Whether this event changes persisted document content.
    pub fn is_content_change(&self) -> bool {
        !matches!(self, SceneEvent::Cleared)
    }
}

/// Stroke used for freehand capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
        }
    }
}

/// What to capture and how to encode it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    pub format: RasterFormat,
    /// Region in document coordinates.
    pub region: Rect,
    /// Encoder quality, 0..=1.
    pub quality: f64,
}

pub trait RenderSurface {
    /// The document changed; `doc` is the state after the change.
    fn scene_changed(&mut self, doc: &SceneDocument, event: &SceneEvent);

    fn set_viewport(&mut self, _viewport: &Viewport) {}

    /// Enter freehand capture with `brush`, or leave it with `None`.
    fn set_drawing_mode(&mut self, _brush: Option<&Brush>) {}

    fn request_render(&mut self) {}

    /// Encode the given region as a data URL.
    fn capture(&mut self, _doc: &SceneDocument, _options: &CaptureOptions) -> Result<String, String> {
        Err("this surface cannot capture pixels".to_string())
    }
}

/// A surface that draws nothing. Useful for headless use of the editor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn scene_changed(&mut self, _doc: &SceneDocument, _event: &SceneEvent) {}
}
