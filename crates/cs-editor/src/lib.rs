pub mod clipboard;
pub mod editor;
pub mod error;
pub mod history;
pub mod persist;
pub mod selection;
pub mod shortcuts;
pub mod style;
pub mod surface;
pub mod tools;

pub use clipboard::Clipboard;
pub use editor::{
    Editor, EditorConfig, Export, ExportFormat, ImageHandle, ObjectPatch, TextOptions,
    coerce_dimension,
};
pub use error::{AssetLoadError, EditorError};
pub use history::History;
pub use persist::{Clock, DebouncedSaver, ManualClock, SavePayload, SaveSink, SystemClock};
pub use selection::{Selection, SelectionEvent};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use style::{DashArray, FromProperty, Property, PropertyValue, StyleState};
pub use surface::{Brush, CaptureOptions, NullSurface, RasterFormat, RenderSurface, SceneEvent};
pub use tools::{ActiveTool, DrawModeChange, ToolState};
