//! JSON codec for scene documents.
//!
//! The encoding follows the renderer's native scene format: a top-level
//! `{ "version", "objects": [...] }` object whose entries use the
//! renderer's camelCase keys. The workspace is written as the first
//! (back-most) entry, tagged with the name `clip`, so a stored document
//! is self-describing. Keys this model does not interpret are carried
//! through verbatim.
//!
//! Two encodings are produced:
//!
//! - **Snapshot** (`to_json`): compact, complete. Used for history entries
//!   and the save callback. `to_json(from_json(to_json(d)))` is byte-stable.
//! - **Export** (`export_json`): tab-indented, with text objects
//!   canonicalized and internal renderer fields stripped.

use crate::filters::AppliedFilter;
use crate::id::ObjectId;
use crate::model::*;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::collections::HashSet;

/// Extra per-object keys the renderer is asked to include beyond its
/// defaults. Everything here round-trips through `extra` or a typed field.
pub const JSON_KEYS: &[&str] = &[
    "name",
    "gradientAngle",
    "selectable",
    "hasControls",
    "linkData",
    "editable",
    "extensionType",
    "extension",
];

/// Internal renderer fields that never appear in an exported document.
pub const EXPORT_DENY_LIST: &[&str] = &[
    "borderColor",
    "borderOpacityWhenMoving",
    "borderScaleFactor",
    "cornerColor",
    "cornerSize",
    "cornerStrokeColor",
    "cornerStyle",
    "evented",
    "hasBorders",
    "hoverCursor",
    "lockMovementX",
    "lockMovementY",
    "lockRotation",
    "lockScalingX",
    "lockScalingY",
    "moveCursor",
    "padding",
    "transparentCorners",
];

/// Type names the renderer uses for text objects. All decode to a text box.
const TEXT_TYPES: &[&str] = &["textbox", "text", "i-text"];

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document has no workspace object (name `{WORKSPACE_NAME}`)")]
    MissingWorkspace,
    #[error("document has {0} workspace objects, expected exactly one")]
    DuplicateWorkspace(usize),
    #[error("invalid `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("unknown object type `{0}`")]
    UnknownObjectType(String),
}

// ─── Wire types ──────────────────────────────────────────────────────────

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

/// Top-level document as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub objects: Vec<WireObject>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One object as it appears on the wire.
///
/// `fill` and `stroke` stay untyped here: gradient and pattern paints are
/// not editable, so anything other than a color string is preserved as
/// an opaque value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Value>,
    #[serde(default = "one")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_dash_array: Option<SmallVec<[f64; 4]>>,
    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "yes")]
    pub selectable: bool,
    #[serde(default = "yes")]
    pub has_controls: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linethrough: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<AppliedFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathCmd>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─── Encoding ────────────────────────────────────────────────────────────

fn encode_paint(paint: Option<Color>) -> Option<Value> {
    paint.map(|c| Value::String(c.to_hex()))
}

/// Convert one object to its wire form.
pub fn encode_object(obj: &DrawableObject) -> WireObject {
    let mut wire = WireObject {
        kind: obj.kind.type_name().to_string(),
        id: Some(obj.id),
        left: obj.left,
        top: obj.top,
        angle: obj.angle,
        scale_x: obj.scale_x,
        scale_y: obj.scale_y,
        fill: encode_paint(obj.fill),
        stroke: encode_paint(obj.stroke),
        stroke_width: obj.stroke_width,
        stroke_dash_array: Some(obj.stroke_dash_array.clone()),
        opacity: obj.opacity,
        shadow: obj.shadow.clone(),
        name: obj.name.clone(),
        selectable: obj.selectable,
        has_controls: obj.has_controls,
        extra: obj.extra.clone(),
        ..WireObject::default()
    };

    match &obj.kind {
        ObjectKind::Rect { width, height } | ObjectKind::Triangle { width, height } => {
            wire.width = Some(*width);
            wire.height = Some(*height);
        }
        ObjectKind::Circle { radius } => wire.radius = Some(*radius),
        ObjectKind::Polygon { points } => wire.points = Some(points.clone()),
        ObjectKind::Textbox { text, width, style } => {
            wire.text = Some(text.clone());
            wire.width = Some(*width);
            wire.font_family = Some(style.font_family.clone());
            wire.font_size = Some(style.font_size);
            wire.font_weight = Some(style.font_weight);
            wire.font_style = Some(style.font_style);
            wire.underline = Some(style.underline);
            wire.linethrough = Some(style.linethrough);
            wire.text_align = Some(style.text_align);
        }
        ObjectKind::Image {
            src,
            width,
            height,
            filters,
        } => {
            wire.src = Some(src.clone());
            wire.width = Some(*width);
            wire.height = Some(*height);
            wire.filters = Some(filters.to_vec());
        }
        ObjectKind::Path { commands } => wire.path = Some(commands.clone()),
    }

    // A typed paint supersedes a gradient kept from the encoding.
    if wire.fill.is_some() {
        wire.extra.remove("fill");
    }
    if wire.stroke.is_some() {
        wire.extra.remove("stroke");
    }
    wire
}

/// Convert a document to its wire form, workspace first.
pub fn encode_document(doc: &SceneDocument) -> WireDocument {
    let objects = std::iter::once(doc.workspace())
        .chain(doc.objects())
        .map(encode_object)
        .collect();
    WireDocument {
        version: doc.version.clone(),
        objects,
        extra: doc.extra.clone(),
    }
}

/// Compact snapshot encoding (history entries, save payloads).
pub fn to_json(doc: &SceneDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string(&encode_document(doc))
}

/// Export encoding: canonical text objects, no internal renderer fields,
/// redundant interaction flags dropped, tab indentation.
pub fn export_json(doc: &SceneDocument) -> Result<String, serde_json::Error> {
    let mut wire = encode_document(doc);
    for obj in &mut wire.objects {
        canonicalize_text(obj);
    }
    let mut value = serde_json::to_value(&wire)?;
    if let Some(objects) = value.get_mut("objects").and_then(Value::as_array_mut) {
        for obj in objects.iter_mut().filter_map(Value::as_object_mut) {
            strip_internal_fields(obj);
        }
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf)
        .map_err(|e| serde_json::Error::io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Give every text-like object the same shape regardless of which
/// renderer version wrote it.
pub fn canonicalize_text(obj: &mut WireObject) {
    if !TEXT_TYPES.contains(&obj.kind.as_str()) {
        return;
    }
    obj.kind = "textbox".to_string();
    let defaults = TextStyle::default();
    obj.text.get_or_insert_with(String::new);
    obj.font_family.get_or_insert(defaults.font_family);
    obj.font_size.get_or_insert(defaults.font_size);
    obj.font_weight.get_or_insert(defaults.font_weight);
    obj.font_style.get_or_insert(defaults.font_style);
    obj.underline.get_or_insert(defaults.underline);
    obj.linethrough.get_or_insert(defaults.linethrough);
    obj.text_align.get_or_insert(defaults.text_align);
    // Per-character style maps are `{}` in one renderer generation and `[]`
    // in the next.
    let empty_styles = match obj.extra.get("styles") {
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
        _ => false,
    };
    if empty_styles {
        obj.extra.insert("styles".into(), Value::Object(Map::new()));
    }
}

fn strip_internal_fields(obj: &mut Map<String, Value>) {
    for key in EXPORT_DENY_LIST {
        obj.remove(*key);
    }
    for flag in ["selectable", "hasControls"] {
        if obj.get(flag) == Some(&Value::Bool(true)) {
            obj.remove(flag);
        }
    }
}

// ─── Decoding ────────────────────────────────────────────────────────────

fn decode_paint(value: Option<Value>, key: &str, extra: &mut Map<String, Value>) -> Option<Color> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match Color::parse(&s) {
            Some(c) => Some(c),
            None => {
                log::warn!("unparseable {key} color `{s}` kept as-is");
                extra.insert(key.to_string(), Value::String(s));
                None
            }
        },
        Some(other) => {
            extra.insert(key.to_string(), other);
            None
        }
    }
}

/// Convert one wire object into the model. Objects without an `id` get
/// a placeholder that `decode_document` replaces.
pub fn decode_object(wire: WireObject) -> Result<DrawableObject, DecodeError> {
    let WireObject {
        kind: type_name,
        id,
        left,
        top,
        width,
        height,
        radius,
        angle,
        scale_x,
        scale_y,
        fill,
        stroke,
        stroke_width,
        stroke_dash_array,
        opacity,
        shadow,
        name,
        selectable,
        has_controls,
        points,
        text,
        font_family,
        font_size,
        font_weight,
        font_style,
        underline,
        linethrough,
        text_align,
        src,
        filters,
        path,
        mut extra,
    } = wire;

    let width = width.unwrap_or_default();
    let height = height.unwrap_or_default();
    let kind = match type_name.as_str() {
        "rect" => ObjectKind::Rect { width, height },
        "triangle" => ObjectKind::Triangle { width, height },
        "circle" => ObjectKind::Circle {
            radius: radius.unwrap_or_default(),
        },
        "polygon" => ObjectKind::Polygon {
            points: points.unwrap_or_default(),
        },
        t if TEXT_TYPES.contains(&t) => {
            let defaults = TextStyle::default();
            let style = TextStyle {
                font_family: font_family.unwrap_or(defaults.font_family),
                font_size: font_size.unwrap_or(defaults.font_size),
                font_weight: font_weight.unwrap_or(defaults.font_weight),
                font_style: font_style.unwrap_or(defaults.font_style),
                underline: underline.unwrap_or(defaults.underline),
                linethrough: linethrough.unwrap_or(defaults.linethrough),
                text_align: text_align.unwrap_or(defaults.text_align),
            };
            let text = text.unwrap_or_default();
            let width = if width > 0.0 {
                width
            } else {
                estimate_text_width(&text, style.font_size)
            };
            ObjectKind::Textbox { text, width, style }
        }
        "image" => ObjectKind::Image {
            src: src.ok_or(DecodeError::InvalidField {
                field: "src",
                reason: "image has no source".into(),
            })?,
            width,
            height,
            filters: filters.unwrap_or_default().into_iter().collect(),
        },
        "path" => ObjectKind::Path {
            commands: path.unwrap_or_default(),
        },
        other => return Err(DecodeError::UnknownObjectType(other.to_string())),
    };

    let fill = decode_paint(fill, "fill", &mut extra);
    let stroke = decode_paint(stroke, "stroke", &mut extra);

    Ok(DrawableObject {
        id: id.unwrap_or_else(|| ObjectId::intern("")),
        kind,
        left,
        top,
        angle,
        scale_x,
        scale_y,
        fill,
        stroke,
        stroke_width,
        stroke_dash_array: stroke_dash_array.unwrap_or_default(),
        opacity,
        shadow,
        name,
        selectable,
        has_controls,
        extra,
    })
}

/// Convert a wire document into the model.
///
/// Exactly one object must carry the workspace name tag. Objects with a
/// missing or repeated id are given fresh ones.
pub fn decode_document(wire: WireDocument) -> Result<SceneDocument, DecodeError> {
    let mut workspace = None;
    let mut workspace_count = 0;
    let mut objects = Vec::with_capacity(wire.objects.len());

    for wire_obj in wire.objects {
        let is_workspace = wire_obj.name.as_deref() == Some(WORKSPACE_NAME);
        let obj = decode_object(wire_obj)?;
        if is_workspace {
            workspace_count += 1;
            workspace = Some(obj);
        } else {
            objects.push(obj);
        }
    }

    if workspace_count > 1 {
        return Err(DecodeError::DuplicateWorkspace(workspace_count));
    }
    let mut workspace = workspace.ok_or(DecodeError::MissingWorkspace)?;
    if !matches!(workspace.kind, ObjectKind::Rect { .. }) {
        return Err(DecodeError::InvalidField {
            field: "type",
            reason: format!("workspace must be a rect, found `{}`", workspace.kind.type_name()),
        });
    }
    if workspace.id.is_blank() {
        workspace.id = ObjectId::intern("workspace");
    }
    workspace.selectable = false;
    workspace.has_controls = false;

    let mut doc = SceneDocument::with_workspace(workspace, Vec::with_capacity(objects.len()));
    doc.version = wire.version;
    doc.extra = wire.extra;

    let mut seen: HashSet<ObjectId> = HashSet::new();
    seen.insert(doc.workspace().id);
    for mut obj in objects {
        if obj.id.is_blank() || !seen.insert(obj.id) {
            obj.id = doc.fresh_id(obj.kind.type_name());
            seen.insert(obj.id);
        }
        doc.add(obj);
    }
    Ok(doc)
}

/// Parse a document from its JSON encoding.
pub fn from_json(json: &str) -> Result<SceneDocument, DecodeError> {
    let wire: WireDocument = serde_json::from_str(json)?;
    decode_document(wire)
}
