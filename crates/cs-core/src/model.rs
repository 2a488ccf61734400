//! Core data model for Canvas Studio documents.
//!
//! A document is an ordered list of drawable objects (back to front) plus
//! one workspace object: the background rectangle that defines the canvas
//! size and fill, and clips everything else. The workspace is a field of
//! its own rather than an entry in the list, so it can never be reordered,
//! selected or deleted by list operations.

use crate::filters::AppliedFilter;
use crate::id::{IdSerial, ObjectId};
use kurbo::{Point, Rect, Size};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::fmt;

/// Name tag carried by the workspace object on the wire.
pub const WORKSPACE_NAME: &str = "clip";

/// Default workspace size in document units.
pub const WORKSPACE_WIDTH: f64 = 900.0;
pub const WORKSPACE_HEIGHT: f64 = 1200.0;

/// Renderer scene-format version written into encoded documents.
pub const FORMAT_VERSION: &str = "5.3.0";

/// Line height multiplier used to size text boxes.
pub const TEXT_LINE_HEIGHT: f64 = 1.16;

/// Average glyph advance as a fraction of the font size. Text boxes are
/// sized before any glyphs are measured, so this stands in for metrics.
const GLYPH_ADVANCE: f64 = 0.6;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb8(0, 0, 0)),
    ("white", Color::rgb8(255, 255, 255)),
    ("red", Color::rgb8(255, 0, 0)),
    ("green", Color::rgb8(0, 128, 0)),
    ("blue", Color::rgb8(0, 0, 255)),
    ("yellow", Color::rgb8(255, 255, 0)),
    ("orange", Color::rgb8(255, 165, 0)),
    ("purple", Color::rgb8(128, 0, 128)),
    ("gray", Color::rgb8(128, 128, 128)),
    ("grey", Color::rgb8(128, 128, 128)),
    ("transparent", Color::rgba(0.0, 0.0, 0.0, 0.0)),
];

impl Color {
    pub const BLACK: Color = Color::rgb8(0, 0, 0);
    pub const WHITE: Color = Color::rgb8(255, 255, 255);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| v * 17);
        let long = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);

        let (r, g, b, a) = match bytes.len() {
            3 => (short(0)?, short(1)?, short(2)?, 255),
            4 => (short(0)?, short(1)?, short(2)?, short(3)?),
            6 => (long(0)?, long(2)?, long(4)?, 255),
            8 => (long(0)?, long(2)?, long(4)?, long(6)?),
            _ => return None,
        };
        Some(Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    /// Parse any color string the renderer accepts: hex, `rgb(...)`,
    /// `rgba(...)`, or a CSS color name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<f32> = args
                .split(',')
                .map(|p| p.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .ok()?;
            let (r, g, b, a) = match parts.as_slice() {
                [r, g, b] => (*r, *g, *b, 1.0),
                [r, g, b, a] => (*r, *g, *b, *a),
                _ => return None,
            };
            let channel = |v: f32| v.clamp(0.0, 255.0) / 255.0;
            return Some(Self::rgba(channel(r), channel(g), channel(b), a.clamp(0.0, 1.0)));
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, c)| *c)
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (byte(self.r), byte(self.g), byte(self.b), byte(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Emit as a CSS `rgba(...)` string (used by the SVG writer and Canvas2D).
    pub fn to_css(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({},{},{},{})",
            byte(self.r),
            byte(self.g),
            byte(self.b),
            (self.a * 1000.0).round() / 1000.0
        )
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Shadow ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: Color,
    #[serde(default)]
    pub blur: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
}

// ─── Text ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Font weight on the CSS 100..900 scale.
///
/// Accepts numbers, numeric strings and the `normal`/`bold` keywords on
/// input; always written back as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(FontWeight(n.clamp(1.0, 1000.0) as u16)),
            Raw::Str(s) => match s.as_str() {
                "normal" => Ok(FontWeight::NORMAL),
                "bold" => Ok(FontWeight::BOLD),
                other => other
                    .parse::<u16>()
                    .map(FontWeight)
                    .map_err(|_| de::Error::custom(format!("invalid font weight `{other}`"))),
            },
        }
    }
}

/// Font attributes of a text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub underline: bool,
    pub linethrough: bool,
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".into(),
            font_size: 32.0,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
            underline: false,
            linethrough: false,
            text_align: TextAlign::Left,
        }
    }
}

// ─── Path data ───────────────────────────────────────────────────────────

/// A single path command, encoded on the wire as `["M", x, y]` etc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo(f64, f64, f64, f64),            // control, end
    CubicTo(f64, f64, f64, f64, f64, f64), // c1, c2, end
    Close,
}

impl PathCmd {
    fn letter(&self) -> &'static str {
        match self {
            PathCmd::MoveTo(..) => "M",
            PathCmd::LineTo(..) => "L",
            PathCmd::QuadTo(..) => "Q",
            PathCmd::CubicTo(..) => "C",
            PathCmd::Close => "Z",
        }
    }

    fn args(&self) -> SmallVec<[f64; 6]> {
        match *self {
            PathCmd::MoveTo(x, y) | PathCmd::LineTo(x, y) => SmallVec::from_slice(&[x, y]),
            PathCmd::QuadTo(cx, cy, x, y) => SmallVec::from_slice(&[cx, cy, x, y]),
            PathCmd::CubicTo(a, b, c, d, e, f) => SmallVec::from_slice(&[a, b, c, d, e, f]),
            PathCmd::Close => SmallVec::new(),
        }
    }

    /// End points and control points, for bounding-box purposes.
    pub fn points(&self) -> SmallVec<[Point; 3]> {
        self.args()
            .chunks(2)
            .map(|c| Point::new(c[0], c[1]))
            .collect()
    }

    /// Render as SVG path data.
    pub fn to_svg(&self) -> String {
        let args = self.args();
        if args.is_empty() {
            return self.letter().to_string();
        }
        let nums: Vec<String> = args.iter().map(|v| v.to_string()).collect();
        format!("{} {}", self.letter(), nums.join(" "))
    }
}

impl Serialize for PathCmd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let args = self.args();
        let mut seq = serializer.serialize_seq(Some(args.len() + 1))?;
        seq.serialize_element(self.letter())?;
        for v in &args {
            seq.serialize_element(v)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for PathCmd {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CmdVisitor;

        impl<'de> Visitor<'de> for CmdVisitor {
            type Value = PathCmd;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a path command array like [\"L\", x, y]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PathCmd, A::Error> {
                let letter: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let mut args: SmallVec<[f64; 6]> = SmallVec::new();
                while let Some(v) = seq.next_element::<f64>()? {
                    args.push(v);
                }
                let cmd = match (letter.as_str(), args.as_slice()) {
                    ("M", &[x, y]) => PathCmd::MoveTo(x, y),
                    ("L", &[x, y]) => PathCmd::LineTo(x, y),
                    ("Q", &[cx, cy, x, y]) => PathCmd::QuadTo(cx, cy, x, y),
                    ("C", &[a, b, c, d, e, f]) => PathCmd::CubicTo(a, b, c, d, e, f),
                    ("Z" | "z", &[]) => PathCmd::Close,
                    (l, a) => {
                        return Err(de::Error::custom(format!(
                            "unsupported path command `{l}` with {} arguments",
                            a.len()
                        )));
                    }
                };
                Ok(cmd)
            }
        }

        deserializer.deserialize_seq(CmdVisitor)
    }
}

// ─── Drawable objects ────────────────────────────────────────────────────

/// What kind of drawable an object is, with its variant-specific data.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Rect {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    Triangle {
        width: f64,
        height: f64,
    },
    /// Diamonds and stars. Points are relative to the polygon's own box.
    Polygon {
        points: Vec<Point>,
    },
    Textbox {
        text: String,
        width: f64,
        style: TextStyle,
    },
    Image {
        src: String,
        width: f64,
        height: f64,
        filters: SmallVec<[AppliedFilter; 1]>,
    },
    /// Freehand path captured in draw mode.
    Path {
        commands: Vec<PathCmd>,
    },
}

impl ObjectKind {
    /// The renderer type name (`type` key on the wire).
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Rect { .. } => "rect",
            ObjectKind::Circle { .. } => "circle",
            ObjectKind::Triangle { .. } => "triangle",
            ObjectKind::Polygon { .. } => "polygon",
            ObjectKind::Textbox { .. } => "textbox",
            ObjectKind::Image { .. } => "image",
            ObjectKind::Path { .. } => "path",
        }
    }

    /// Intrinsic (unscaled, stroke-less) size.
    pub fn size(&self) -> Size {
        match self {
            ObjectKind::Rect { width, height }
            | ObjectKind::Triangle { width, height }
            | ObjectKind::Image { width, height, .. } => Size::new(*width, *height),
            ObjectKind::Circle { radius } => Size::new(radius * 2.0, radius * 2.0),
            ObjectKind::Polygon { points } => points_bounds(points.iter().copied()).size(),
            ObjectKind::Textbox { text, width, style } => {
                let lines = text.lines().count().max(1) as f64;
                Size::new(*width, lines * style.font_size * TEXT_LINE_HEIGHT)
            }
            ObjectKind::Path { commands } => {
                points_bounds(commands.iter().flat_map(|c| c.points())).size()
            }
        }
    }
}

/// Bounding box of a point set; empty input yields a zero rect.
pub fn points_bounds(points: impl IntoIterator<Item = Point>) -> Rect {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(first, first), |r, p| r.union_pt(p))
}

/// Width a text box needs to fit its widest word.
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    let widest = text
        .split_whitespace()
        .map(|w| w.chars().count())
        .max()
        .unwrap_or(1)
        .max(1);
    widest as f64 * font_size * GLYPH_ADVANCE
}

/// A single drawable object in the scene document.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub left: f64,
    pub top: f64,
    /// Rotation in degrees.
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub stroke_dash_array: SmallVec<[f64; 4]>,
    pub opacity: f64,
    pub shadow: Option<Shadow>,
    /// Name tag. Only the workspace carries one in practice.
    pub name: Option<String>,
    pub selectable: bool,
    pub has_controls: bool,
    /// Renderer fields this model does not interpret, kept verbatim.
    pub extra: Map<String, Value>,
}

impl DrawableObject {
    pub fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            kind,
            left: 0.0,
            top: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            stroke_dash_array: SmallVec::new(),
            opacity: 1.0,
            shadow: None,
            name: None,
            selectable: true,
            has_controls: true,
            extra: Map::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ObjectKind::Textbox { .. })
    }

    /// Set a solid fill, replacing any gradient kept from the encoding.
    pub fn set_fill(&mut self, color: Color) {
        self.fill = Some(color);
        self.extra.remove("fill");
    }

    /// Set a solid stroke, replacing any non-color stroke kept from the
    /// encoding.
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke = Some(color);
        self.extra.remove("stroke");
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ObjectKind::Image { .. })
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            ObjectKind::Textbox { style, .. } => Some(style),
            _ => None,
        }
    }

    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.kind {
            ObjectKind::Textbox { style, .. } => Some(style),
            _ => None,
        }
    }

    /// On-canvas size: intrinsic size plus stroke, times scale.
    pub fn scaled_size(&self) -> Size {
        let stroke = if self.stroke.is_some() {
            self.stroke_width
        } else {
            0.0
        };
        let size = self.kind.size();
        Size::new(
            (size.width + stroke) * self.scale_x,
            (size.height + stroke) * self.scale_y,
        )
    }

    /// Axis-aligned bounds, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size((self.left, self.top), self.scaled_size())
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Move so the object's center lands on `center`.
    pub fn set_center(&mut self, center: Point) {
        let size = self.scaled_size();
        self.left = center.x - size.width / 2.0;
        self.top = center.y - size.height / 2.0;
    }
}

// ─── Scene document ──────────────────────────────────────────────────────

/// The complete document: a workspace plus objects ordered back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDocument {
    /// Renderer format version.
    pub version: String,
    workspace: DrawableObject,
    objects: Vec<DrawableObject>,
    /// Top-level renderer fields this model does not interpret.
    pub extra: Map<String, Value>,
    serial: IdSerial,
}

impl SceneDocument {
    /// Create a document with a workspace of the given size and fill.
    #[must_use]
    pub fn new(width: f64, height: f64, fill: Color) -> Self {
        Self::with_workspace(default_workspace(width, height, fill), Vec::new())
    }

    /// Assemble a document from a decoded workspace and object list.
    pub fn with_workspace(workspace: DrawableObject, objects: Vec<DrawableObject>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            workspace,
            objects,
            extra: Map::new(),
            serial: IdSerial::default(),
        }
    }

    pub fn workspace(&self) -> &DrawableObject {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut DrawableObject {
        &mut self.workspace
    }

    /// Workspace bounds in document coordinates.
    pub fn workspace_rect(&self) -> Rect {
        Rect::from_origin_size(
            (self.workspace.left, self.workspace.top),
            self.workspace.kind.size(),
        )
    }

    /// Non-workspace objects, back to front.
    pub fn objects(&self) -> &[DrawableObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut DrawableObject> {
        self.objects.iter_mut()
    }

    /// Number of objects including the workspace.
    pub fn object_count(&self) -> usize {
        self.objects.len() + 1
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&DrawableObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut DrawableObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// A `{prefix}_{n}` id no object in this document uses.
    ///
    /// Serials continue above the highest one already present for the
    /// prefix, and never repeat within one document value even if the
    /// returned id is not inserted.
    pub fn fresh_id(&self, prefix: &str) -> ObjectId {
        let highest = std::iter::once(&self.workspace)
            .chain(&self.objects)
            .filter_map(|o| o.id.serial(prefix))
            .max()
            .unwrap_or(0);
        self.serial.raise_to(highest);
        loop {
            let id = ObjectId::numbered(prefix, self.serial.next());
            if id != self.workspace.id && !self.contains(id) {
                return id;
            }
        }
    }

    /// Append an object on top of the stack.
    pub fn add(&mut self, object: DrawableObject) {
        self.objects.push(object);
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<DrawableObject> {
        let idx = self.index_of(id)?;
        Some(self.objects.remove(idx))
    }

    /// Drop every object, keeping the workspace.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Center an object on the workspace.
    pub fn center_on_workspace(&self, object: &mut DrawableObject) {
        object.set_center(self.workspace_rect().center());
    }

    /// Move an object one step toward the front. Returns true if the
    /// z-order changed.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.objects.len() => {
                self.objects.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    /// Move an object one step toward the back. The workspace stays
    /// behind position 0.
    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                self.objects.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    /// Move an object to the front of the z-order.
    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.objects.len() => {
                let obj = self.objects.remove(pos);
                self.objects.push(obj);
                true
            }
            _ => false,
        }
    }

    /// Move an object to the back of the z-order (just above the workspace).
    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                let obj = self.objects.remove(pos);
                self.objects.insert(0, obj);
                true
            }
            _ => false,
        }
    }
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self::new(WORKSPACE_WIDTH, WORKSPACE_HEIGHT, Color::WHITE)
    }
}

/// The workspace rectangle every new document starts with.
pub fn default_workspace(width: f64, height: f64, fill: Color) -> DrawableObject {
    let mut ws = DrawableObject::new(
        ObjectId::intern("workspace"),
        ObjectKind::Rect { width, height },
    );
    ws.fill = Some(fill);
    ws.stroke_width = 0.0;
    ws.name = Some(WORKSPACE_NAME.to_string());
    ws.selectable = false;
    ws.has_controls = false;
    ws.shadow = Some(Shadow {
        color: Color::rgba(0.0, 0.0, 0.0, 0.8),
        blur: 5.0,
        offset_x: 0.0,
        offset_y: 0.0,
    });
    ws
}
