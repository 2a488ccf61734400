pub mod codec;
pub mod filters;
pub mod id;
pub mod lint;
pub mod model;
pub mod svg;
pub mod viewport;

pub use codec::{DecodeError, export_json, from_json, to_json};
pub use filters::{AppliedFilter, FILTER_NAMES, ImageFilter, UnknownFilter};
pub use id::ObjectId;
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use svg::render_svg;
pub use viewport::{Viewport, fit_workspace};

// Re-export kurbo geometry so downstream crates share one version.
pub use kurbo::{Affine, Point, Rect, Size, Vec2};
