//! The command surface.
//!
//! `Editor` owns the scene document and is its only mutator. Every command
//! that changes the document emits scene events to the render surface and
//! records exactly one history entry, however many objects it touches.
//! UI collaborators hold the editor, never the document or the surface.

use crate::clipboard::Clipboard;
use crate::error::{AssetLoadError, EditorError};
use crate::history::{DEFAULT_MAX_DEPTH, History};
use crate::persist::{Clock, DEFAULT_DEBOUNCE_MS, DebouncedSaver, SavePayload, SaveSink, SystemClock};
use crate::selection::{ClearCallback, Selection, SelectionEvent};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::style::{DashArray, FromProperty, Property, PropertyValue, StyleState};
use crate::surface::{Brush, CaptureOptions, RasterFormat, RenderSurface, SceneEvent};
use crate::tools::{ActiveTool, DrawModeChange, ToolState};
use cs_core::viewport::{self, Viewport};
use cs_core::{
    AppliedFilter, Color, DrawableObject, FontStyle, FontWeight, ImageFilter, LintSeverity, ObjectId,
    ObjectKind, PathCmd, Point, SceneDocument, Size, TextAlign, TextStyle,
};
use serde::Deserialize;
use smallvec::smallvec;
use std::collections::HashMap;
use std::f64::consts::PI;

// ─── Default geometry ────────────────────────────────────────────────────

pub const CIRCLE_RADIUS: f64 = 180.0;
pub const SHAPE_SIZE: f64 = 300.0;
pub const STAR_SIZE: f64 = 400.0;
pub const STAR_POINTS: usize = 5;
/// Inner radius of the star as a fraction of the outer radius.
pub const STAR_INNER_RATIO: f64 = 0.4;
/// Initial position of a text box before it is centered.
pub const TEXT_ORIGIN: f64 = 100.0;

// ─── Configuration ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// History entries kept before the oldest are trimmed.
    pub history_depth: usize,
    /// Quiet period before a scheduled save is persisted.
    pub save_debounce_ms: u64,
    /// Initial size of the visible container, in screen pixels.
    pub container: Size,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_MAX_DEPTH,
            save_debounce_ms: DEFAULT_DEBOUNCE_MS,
            container: Size::new(1280.0, 800.0),
        }
    }
}

// ─── Command arguments ───────────────────────────────────────────────────

/// Overrides for a new text box. Unset fields use the font defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextOptions {
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub font_family: Option<String>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub underline: Option<bool>,
    pub linethrough: Option<bool>,
    pub fill: Option<Color>,
}

/// Geometry changes from the renderer's interactive transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectPatch {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub angle: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ObjectPatch {
    fn apply(&self, obj: &mut DrawableObject) {
        if let Some(v) = self.left {
            obj.left = v;
        }
        if let Some(v) = self.top {
            obj.top = v;
        }
        if let Some(v) = self.angle {
            obj.angle = v;
        }
        if let Some(v) = self.scale_x {
            obj.scale_x = v;
        }
        if let Some(v) = self.scale_y {
            obj.scale_y = v;
        }
        match &mut obj.kind {
            ObjectKind::Rect { width, height }
            | ObjectKind::Triangle { width, height }
            | ObjectKind::Image { width, height, .. } => {
                if let Some(w) = self.width {
                    *width = w.max(0.0);
                }
                if let Some(h) = self.height {
                    *height = h.max(0.0);
                }
            }
            ObjectKind::Textbox { width, .. } => {
                if let Some(w) = self.width {
                    *width = w.max(1.0);
                }
            }
            _ => {}
        }
    }
}

/// Handle for a pending image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Svg,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }
}

/// An encoded artifact ready for download. Raster formats carry a data URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub format: ExportFormat,
    pub contents: String,
}

impl Export {
    pub fn file_name(&self) -> String {
        format!("untitled.{}", self.format.extension())
    }
}

/// Parse the leading integer digits of a dimension field. Falls back to
/// `current` when there are none; never returns less than 1.
pub fn coerce_dimension(input: &str, current: f64) -> f64 {
    let digits: String = input
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    match digits.parse::<f64>() {
        Ok(v) => v.max(1.0),
        Err(_) => current.max(1.0),
    }
}

// ─── Editor ──────────────────────────────────────────────────────────────

pub struct Editor<S: RenderSurface> {
    doc: SceneDocument,
    surface: S,
    history: History,
    selection: Selection,
    style: StyleState,
    tools: ToolState,
    clipboard: Clipboard,
    saver: DebouncedSaver,
    clock: Box<dyn Clock>,
    viewport: Viewport,
    container: Size,
    drawing: bool,
    pending_images: HashMap<ImageHandle, String>,
    next_image: u64,
}

impl<S: RenderSurface> Editor<S> {
    /// Create an editor over a default document (900×1200, white).
    pub fn new(config: EditorConfig, surface: S) -> Self {
        Self::with_document(config, surface, SceneDocument::default())
    }

    /// Create an editor over `doc`. History is seeded with its snapshot.
    pub fn with_document(config: EditorConfig, surface: S, doc: SceneDocument) -> Self {
        let mut editor = Self {
            doc,
            surface,
            history: History::new(config.history_depth),
            selection: Selection::new(),
            style: StyleState::default(),
            tools: ToolState::new(),
            clipboard: Clipboard::new(),
            saver: DebouncedSaver::new(config.save_debounce_ms, Box::new(|_: SavePayload| {})),
            clock: Box::new(SystemClock::default()),
            viewport: Viewport::IDENTITY,
            container: config.container,
            drawing: false,
            pending_images: HashMap::new(),
            next_image: 0,
        };
        editor.surface.scene_changed(&editor.doc, &SceneEvent::Loaded);
        editor.reseed_history();
        editor.auto_zoom();
        editor
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn with_save_sink(mut self, sink: impl SaveSink + 'static) -> Self {
        self.saver.set_sink(Box::new(sink));
        self
    }

    pub fn set_save_sink(&mut self, sink: Box<dyn SaveSink>) {
        self.saver.set_sink(sink);
    }

    /// Register the callback fired whenever the selection is cleared.
    pub fn set_clear_selection_callback(&mut self, callback: ClearCallback) {
        self.selection.set_clear_callback(callback);
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn document(&self) -> &SceneDocument {
        &self.doc
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The surface alongside what it should paint.
    pub fn scene_parts(&mut self) -> (&mut S, &SceneDocument, &[ObjectId]) {
        (&mut self.surface, &self.doc, self.selection.ids())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &[ObjectId] {
        self.selection.ids()
    }

    pub fn selected_objects(&self) -> impl Iterator<Item = &DrawableObject> {
        self.selection.ids().iter().filter_map(|id| self.doc.get(*id))
    }

    pub fn style_state(&self) -> &StyleState {
        &self.style
    }

    pub fn active_tool(&self) -> ActiveTool {
        self.tools.active()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn has_pending_save(&self) -> bool {
        self.saver.is_pending()
    }

    /// Snapshot encoding of the live document.
    pub fn snapshot(&self) -> Result<String, EditorError> {
        Ok(cs_core::to_json(&self.doc)?)
    }

    /// Read `prop` from the first selected object, falling back to the
    /// style state or the property's constant default. `None` only when
    /// `T` does not match the property's shape.
    pub fn active_property<T: FromProperty>(&self, prop: Property) -> Option<T> {
        let value = self
            .first_selected_value(prop)
            .unwrap_or_else(|| prop.fallback(&self.style));
        T::from_property(value)
    }

    /// Read `prop` from the first selected object, or return `default`.
    pub fn active_property_or<T: FromProperty>(&self, prop: Property, default: T) -> T {
        self.first_selected_value(prop)
            .and_then(T::from_property)
            .unwrap_or(default)
    }

    fn first_selected_value(&self, prop: Property) -> Option<PropertyValue> {
        let id = self.selection.first()?;
        prop.read(self.doc.get(id)?)
    }

    fn brush(&self) -> Brush {
        Brush {
            color: self.style.stroke,
            width: self.style.stroke_width,
        }
    }

    // ─── Event plumbing ──────────────────────────────────────────────────

    /// Tell the surface about a change and record it unless a batch or a
    /// load is in progress.
    fn emit(&mut self, event: SceneEvent) {
        self.surface.scene_changed(&self.doc, &event);
        if event.is_content_change() && self.history.note_change() {
            self.record();
        }
    }

    /// Run `f` as one history entry.
    fn batch<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.history.begin_batch();
        let result = f(self);
        if self.history.end_batch() {
            self.record();
        }
        result
    }

    /// Append a snapshot to history and schedule persistence.
    fn record(&mut self) {
        match cs_core::to_json(&self.doc) {
            Ok(snapshot) => {
                if self.history.save(snapshot.clone(), false) {
                    self.schedule_persist(snapshot);
                }
            }
            Err(e) => log::error!("failed to snapshot document: {e}"),
        }
    }

    fn schedule_persist(&mut self, snapshot: String) {
        let payload = SavePayload::with_json(snapshot, &self.doc);
        self.saver.schedule(payload, self.clock.now_ms());
    }

    fn reseed_history(&mut self) {
        match cs_core::to_json(&self.doc) {
            Ok(snapshot) => self.history.reseed(snapshot),
            Err(e) => log::error!("failed to snapshot document: {e}"),
        }
    }

    /// Swap in a whole document. The caller decides how history reacts.
    fn replace_document(&mut self, doc: SceneDocument) {
        self.doc.clear();
        self.emit(SceneEvent::Cleared);
        self.doc = doc;
        self.emit(SceneEvent::Loaded);
    }

    fn log_lint(&self) {
        for diag in cs_core::lint_document(&self.doc) {
            match diag.severity {
                LintSeverity::Warning => log::warn!("{diag}"),
                LintSeverity::Info => log::info!("{diag}"),
            }
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Apply a selection event coming from the renderer. Ids that are not
    /// selectable objects of the document are ignored.
    pub fn handle_selection(&mut self, event: SelectionEvent) {
        match event {
            SelectionEvent::Created(ids) | SelectionEvent::Updated(ids) => self.select(ids),
            SelectionEvent::Cleared => self.clear_selection(),
        }
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        let ids: Vec<ObjectId> = ids
            .into_iter()
            .filter(|id| self.doc.get(*id).is_some_and(|o| o.selectable))
            .collect();
        if ids.is_empty() {
            self.clear_selection();
        } else {
            self.selection.replace(ids);
        }
    }

    pub fn select_all(&mut self) {
        let ids: Vec<ObjectId> = self
            .doc
            .objects()
            .iter()
            .filter(|o| o.selectable)
            .map(|o| o.id)
            .collect();
        self.select(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.tools.on_selection_cleared();
    }

    fn prune_selection(&mut self) {
        self.selection.retain_existing(&self.doc);
        if self.selection.is_empty() {
            self.tools.on_selection_cleared();
        }
    }

    // ─── Adding objects ──────────────────────────────────────────────────

    fn styled(&mut self, kind: ObjectKind) -> DrawableObject {
        let mut obj = DrawableObject::new(self.doc.fresh_id(kind.type_name()), kind);
        obj.fill = Some(self.style.fill);
        obj.stroke = Some(self.style.stroke);
        obj.stroke_width = self.style.stroke_width;
        obj.stroke_dash_array = self.style.stroke_dash_array.clone();
        obj
    }

    /// Center on the workspace, add on top, and make it the selection.
    fn add_centered(&mut self, mut obj: DrawableObject) -> ObjectId {
        let id = obj.id;
        self.doc.center_on_workspace(&mut obj);
        self.doc.add(obj);
        self.emit(SceneEvent::Added(id));
        self.selection.replace([id]);
        log::debug!("added {id}");
        id
    }

    pub fn add_circle(&mut self) -> ObjectId {
        let obj = self.styled(ObjectKind::Circle {
            radius: CIRCLE_RADIUS,
        });
        self.add_centered(obj)
    }

    pub fn add_square(&mut self) -> ObjectId {
        let obj = self.styled(ObjectKind::Rect {
            width: SHAPE_SIZE,
            height: SHAPE_SIZE,
        });
        self.add_centered(obj)
    }

    pub fn add_triangle(&mut self) -> ObjectId {
        let obj = self.styled(ObjectKind::Triangle {
            width: SHAPE_SIZE,
            height: SHAPE_SIZE,
        });
        self.add_centered(obj)
    }

    pub fn add_diamond(&mut self) -> ObjectId {
        let (w, h) = (SHAPE_SIZE, SHAPE_SIZE);
        let points = vec![
            Point::new(w / 2.0, 0.0),
            Point::new(w, h / 2.0),
            Point::new(w / 2.0, h),
            Point::new(0.0, h / 2.0),
        ];
        let obj = self.styled(ObjectKind::Polygon { points });
        self.add_centered(obj)
    }

    pub fn add_star(&mut self) -> ObjectId {
        let outer = STAR_SIZE / 2.0;
        let inner = outer * STAR_INNER_RATIO;
        let center = Point::new(outer, outer);
        let points = (0..STAR_POINTS * 2)
            .map(|i| {
                let r = if i % 2 == 0 { outer } else { inner };
                let angle = i as f64 * PI / STAR_POINTS as f64 - PI / 2.0;
                Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
            })
            .collect();
        let obj = self.styled(ObjectKind::Polygon { points });
        self.add_centered(obj)
    }

    pub fn add_text(&mut self, text: &str, options: TextOptions) -> ObjectId {
        let defaults = TextStyle::default();
        let style = TextStyle {
            font_family: options
                .font_family
                .unwrap_or_else(|| self.style.font_family.clone()),
            font_size: options.font_size.unwrap_or(defaults.font_size).max(1.0),
            font_weight: options.font_weight.unwrap_or(defaults.font_weight),
            font_style: options.font_style.unwrap_or(defaults.font_style),
            underline: options.underline.unwrap_or(defaults.underline),
            linethrough: options.linethrough.unwrap_or(defaults.linethrough),
            text_align: options.text_align.unwrap_or(defaults.text_align),
        };
        let width = cs_core::estimate_text_width(text, style.font_size);
        let kind = ObjectKind::Textbox {
            text: text.to_string(),
            width,
            style,
        };
        let mut obj = DrawableObject::new(self.doc.fresh_id(kind.type_name()), kind);
        obj.left = TEXT_ORIGIN;
        obj.top = TEXT_ORIGIN;
        obj.fill = Some(options.fill.unwrap_or(self.style.fill));
        self.add_centered(obj)
    }

    /// Start loading an image. The host loads `url` and reports back with
    /// `finish_image_load`.
    pub fn request_image(&mut self, url: &str) -> ImageHandle {
        let handle = ImageHandle(self.next_image);
        self.next_image += 1;
        self.pending_images.insert(handle, url.to_string());
        handle
    }

    /// Complete a pending image load. On success the image is stretched to
    /// the workspace, centered and selected. A failed load adds nothing.
    pub fn finish_image_load(
        &mut self,
        handle: ImageHandle,
        result: Result<Size, AssetLoadError>,
    ) -> Result<Option<ObjectId>, EditorError> {
        let src = self
            .pending_images
            .remove(&handle)
            .ok_or(EditorError::UnknownImageRequest(handle.0))?;
        let natural = match result {
            Ok(size) if size.width > 0.0 && size.height > 0.0 => size,
            Ok(size) => {
                log::warn!("image {src} has no area ({}x{})", size.width, size.height);
                return Ok(None);
            }
            Err(e) => {
                log::warn!("image {src} failed to load: {e}");
                return Ok(None);
            }
        };

        let ws = self.doc.workspace_rect();
        let kind = ObjectKind::Image {
            src,
            width: natural.width,
            height: natural.height,
            filters: smallvec![],
        };
        let mut obj = DrawableObject::new(self.doc.fresh_id(kind.type_name()), kind);
        obj.scale_x = ws.width() / natural.width;
        obj.scale_y = ws.height() / natural.height;
        Ok(Some(self.add_centered(obj)))
    }

    pub fn pending_image_count(&self) -> usize {
        self.pending_images.len()
    }

    /// Add a freehand path captured in draw mode, stroked with the brush.
    /// Commands are in document coordinates.
    pub fn add_path(&mut self, commands: Vec<PathCmd>) -> ObjectId {
        let bounds = cs_core::points_bounds(commands.iter().flat_map(|c| c.points()));
        let kind = ObjectKind::Path { commands };
        let mut obj = DrawableObject::new(self.doc.fresh_id(kind.type_name()), kind);
        let brush = self.brush();
        obj.stroke = Some(brush.color);
        obj.stroke_width = brush.width;
        obj.left = bounds.x0 - brush.width / 2.0;
        obj.top = bounds.y0 - brush.width / 2.0;
        let id = obj.id;
        self.doc.add(obj);
        self.emit(SceneEvent::Added(id));
        id
    }

    // ─── Removing & clipboard ────────────────────────────────────────────

    /// Remove every selected object and clear the selection.
    pub fn delete(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let ids = self.selection.ids().to_vec();
        self.batch(|ed| {
            for id in ids {
                if ed.doc.remove(id).is_some() {
                    ed.emit(SceneEvent::Removed(id));
                }
            }
        });
        self.clear_selection();
    }

    pub fn copy(&mut self) {
        let doc = &self.doc;
        let selected = self.selection.ids().iter().filter_map(|id| doc.get(*id));
        self.clipboard.copy(selected);
    }

    /// Insert the clipboard contents offset from the last paste and select
    /// them. Returns the new ids.
    pub fn paste(&mut self) -> Vec<ObjectId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let clones = self.clipboard.paste(&self.doc);
        let ids: Vec<ObjectId> = clones.iter().map(|o| o.id).collect();
        self.batch(|ed| {
            for obj in clones {
                let id = obj.id;
                ed.doc.add(obj);
                ed.emit(SceneEvent::Added(id));
            }
        });
        self.selection.replace(ids.iter().copied());
        ids
    }

    pub fn duplicate(&mut self) -> Vec<ObjectId> {
        self.copy();
        self.paste()
    }

    // ─── Styling ─────────────────────────────────────────────────────────

    /// Set a property on every selected object it applies to. Tracked
    /// properties also update the style state, even with no selection.
    pub fn set_property(&mut self, prop: Property, value: PropertyValue) {
        if prop.updates_style_state() {
            prop.write_state(&mut self.style, &value);
        }
        if self.drawing && matches!(prop, Property::StrokeColor | Property::StrokeWidth) {
            let brush = self.brush();
            self.surface.set_drawing_mode(Some(&brush));
        }
        let ids = self.selection.ids().to_vec();
        self.batch(|ed| {
            for id in ids {
                let changed = ed
                    .doc
                    .get_mut(id)
                    .is_some_and(|obj| prop.write(obj, &value));
                if changed {
                    ed.emit(SceneEvent::Modified(id));
                }
            }
        });
    }

    pub fn change_fill_color(&mut self, color: Color) {
        self.set_property(Property::Fill, color.into());
    }

    pub fn change_stroke_color(&mut self, color: Color) {
        self.set_property(Property::StrokeColor, color.into());
    }

    pub fn change_stroke_width(&mut self, width: f64) {
        self.set_property(Property::StrokeWidth, width.into());
    }

    pub fn change_stroke_dash_array(&mut self, dashes: DashArray) {
        self.set_property(Property::StrokeDashArray, dashes.into());
    }

    pub fn change_opacity(&mut self, opacity: f64) {
        self.set_property(Property::Opacity, opacity.into());
    }

    pub fn change_font_family(&mut self, family: &str) {
        self.set_property(Property::FontFamily, family.to_string().into());
    }

    pub fn change_font_size(&mut self, size: f64) {
        self.set_property(Property::FontSize, size.into());
    }

    pub fn change_font_weight(&mut self, weight: FontWeight) {
        self.set_property(Property::FontWeight, weight.into());
    }

    pub fn change_font_style(&mut self, style: FontStyle) {
        self.set_property(Property::FontStyle, style.into());
    }

    pub fn change_font_underline(&mut self, underline: bool) {
        self.set_property(Property::Underline, underline.into());
    }

    pub fn change_font_linethrough(&mut self, linethrough: bool) {
        self.set_property(Property::Linethrough, linethrough.into());
    }

    pub fn change_text_align(&mut self, align: TextAlign) {
        self.set_property(Property::TextAlign, align.into());
    }

    /// Replace the filter of every selected image. `None` clears it.
    pub fn change_image_filter(&mut self, filter: Option<ImageFilter>) {
        let ids = self.selection.ids().to_vec();
        self.batch(|ed| {
            for id in ids {
                let Some(obj) = ed.doc.get_mut(id) else {
                    continue;
                };
                if let ObjectKind::Image { filters, .. } = &mut obj.kind {
                    filters.clear();
                    filters.extend(filter.clone().map(AppliedFilter::from));
                    ed.emit(SceneEvent::Modified(id));
                }
            }
        });
    }

    /// Apply an interactive move/scale/rotate reported by the renderer.
    pub fn modify_object(&mut self, id: ObjectId, patch: ObjectPatch) -> bool {
        let Some(obj) = self.doc.get_mut(id) else {
            return false;
        };
        patch.apply(obj);
        self.emit(SceneEvent::Modified(id));
        true
    }

    // ─── Layers ──────────────────────────────────────────────────────────

    /// Selected ids ordered by z-index, back to front.
    fn selection_by_depth(&self) -> Vec<ObjectId> {
        let mut ids: Vec<(usize, ObjectId)> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.doc.index_of(*id).map(|i| (i, *id)))
            .collect();
        ids.sort_by_key(|(i, _)| *i);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    fn reorder(&mut self, front_first: bool, step: fn(&mut SceneDocument, ObjectId) -> bool) {
        let mut ids = self.selection_by_depth();
        if front_first {
            ids.reverse();
        }
        let mut moved = false;
        for id in ids {
            moved |= step(&mut self.doc, id);
        }
        if moved {
            self.emit(SceneEvent::Reordered);
        }
    }

    pub fn bring_forward(&mut self) {
        self.reorder(true, SceneDocument::bring_forward);
    }

    pub fn send_backward(&mut self) {
        self.reorder(false, SceneDocument::send_backward);
    }

    pub fn bring_to_front(&mut self) {
        self.reorder(false, SceneDocument::bring_to_front);
    }

    pub fn send_to_back(&mut self) {
        self.reorder(true, SceneDocument::send_to_back);
    }

    // ─── Workspace ───────────────────────────────────────────────────────

    pub fn workspace_size(&self) -> Size {
        self.doc.workspace().kind.size()
    }

    pub fn change_canvas_size(&mut self, width: f64, height: f64) {
        let ws = self.doc.workspace_mut();
        ws.kind = ObjectKind::Rect {
            width: width.max(1.0),
            height: height.max(1.0),
        };
        self.emit(SceneEvent::WorkspaceChanged);
        self.auto_zoom();
    }

    pub fn change_background(&mut self, color: Color) {
        self.doc.workspace_mut().set_fill(color);
        self.emit(SceneEvent::WorkspaceChanged);
    }

    // ─── Tools & draw mode ───────────────────────────────────────────────

    /// Switch the sidebar tool, toggling freehand capture as needed.
    pub fn choose_tool(&mut self, tool: ActiveTool) {
        match self.tools.choose(tool) {
            DrawModeChange::Enable => self.enable_draw_mode(),
            DrawModeChange::Disable => self.disable_draw_mode(),
            DrawModeChange::Unchanged => {}
        }
    }

    pub fn enable_draw_mode(&mut self) {
        self.clear_selection();
        self.drawing = true;
        let brush = self.brush();
        self.surface.set_drawing_mode(Some(&brush));
    }

    pub fn disable_draw_mode(&mut self) {
        self.drawing = false;
        self.surface.set_drawing_mode(None);
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    fn apply_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.surface.set_viewport(&viewport);
        self.surface.request_render();
    }

    /// Fit the workspace into the container.
    pub fn auto_zoom(&mut self) {
        let fitted = viewport::fit_workspace(self.container, self.doc.workspace_rect());
        self.apply_viewport(fitted);
    }

    pub fn resize_container(&mut self, container: Size) {
        self.container = container;
        self.auto_zoom();
    }

    pub fn zoom_in(&mut self) {
        let zoomed = self.viewport.step(1, self.container);
        self.apply_viewport(zoomed);
    }

    pub fn zoom_out(&mut self) {
        let zoomed = self.viewport.step(-1, self.container);
        self.apply_viewport(zoomed);
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Load a history snapshot without recording it.
    fn load_snapshot(&mut self, doc: SceneDocument, snapshot: String) {
        self.history.set_suppressed(true);
        self.replace_document(doc);
        self.history.set_suppressed(false);
        self.prune_selection();
        self.schedule_persist(snapshot);
        self.auto_zoom();
    }

    /// Step back one entry. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.peek_undo().map(str::to_owned) else {
            return Ok(false);
        };
        let doc = cs_core::from_json(&snapshot)?;
        self.history.undo();
        self.load_snapshot(doc, snapshot);
        Ok(true)
    }

    /// Step forward one entry. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.peek_redo().map(str::to_owned) else {
            return Ok(false);
        };
        let doc = cs_core::from_json(&snapshot)?;
        self.history.redo();
        self.load_snapshot(doc, snapshot);
        Ok(true)
    }

    // ─── Load / restore ──────────────────────────────────────────────────

    /// Replace the document with `json` as one undoable step. On error the
    /// live document is untouched.
    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        let doc = cs_core::from_json(json)?;
        self.clear_selection();
        self.batch(|ed| ed.replace_document(doc));
        log::debug!("loaded document with {} objects", self.doc.object_count());
        self.log_lint();
        self.auto_zoom();
        Ok(())
    }

    /// Load the initially stored document and make it the only history
    /// entry.
    pub fn restore_json(&mut self, json: &str) -> Result<(), EditorError> {
        let doc = cs_core::from_json(json)?;
        self.clear_selection();
        self.history.set_suppressed(true);
        self.replace_document(doc);
        self.history.set_suppressed(false);
        self.reseed_history();
        self.log_lint();
        self.auto_zoom();
        Ok(())
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Fire the debounced save if its quiet period has passed.
    pub fn tick(&mut self) -> bool {
        self.saver.poll(self.clock.now_ms())
    }

    /// Persist the current document now, without a history entry.
    pub fn save_now(&mut self) -> Result<(), EditorError> {
        let payload = SavePayload::from_document(&self.doc)?;
        self.saver.schedule(payload, self.clock.now_ms());
        self.saver.flush();
        Ok(())
    }

    /// Drop a pending debounced save.
    pub fn cancel_pending_save(&mut self) -> bool {
        self.saver.cancel()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Run `f` with the viewport reset to identity, refitting afterwards.
    fn with_identity_viewport<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.apply_viewport(Viewport::IDENTITY);
        let result = f(self);
        self.auto_zoom();
        result
    }

    fn export_raster(&mut self, format: RasterFormat) -> Result<Export, EditorError> {
        let options = CaptureOptions {
            format,
            region: self.doc.workspace_rect(),
            quality: 1.0,
        };
        let contents = self
            .with_identity_viewport(|ed| ed.surface.capture(&ed.doc, &options))
            .map_err(EditorError::Capture)?;
        let format = match format {
            RasterFormat::Png => ExportFormat::Png,
            RasterFormat::Jpeg => ExportFormat::Jpeg,
        };
        Ok(Export { format, contents })
    }

    pub fn export_png(&mut self) -> Result<Export, EditorError> {
        self.export_raster(RasterFormat::Png)
    }

    pub fn export_jpeg(&mut self) -> Result<Export, EditorError> {
        self.export_raster(RasterFormat::Jpeg)
    }

    pub fn export_svg(&mut self) -> Export {
        let contents = self.with_identity_viewport(|ed| cs_core::render_svg(&ed.doc));
        Export {
            format: ExportFormat::Svg,
            contents,
        }
    }

    pub fn export_json(&self) -> Result<Export, EditorError> {
        Ok(Export {
            format: ExportFormat::Json,
            contents: cs_core::export_json(&self.doc)?,
        })
    }

    // ─── Shortcuts ───────────────────────────────────────────────────────

    /// Resolve a key event and run its action. Returns the action taken.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        meta: bool,
    ) -> Result<Option<ShortcutAction>, EditorError> {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, meta) else {
            return Ok(None);
        };
        self.run_shortcut(action)?;
        Ok(Some(action))
    }

    pub fn run_shortcut(&mut self, action: ShortcutAction) -> Result<(), EditorError> {
        match action {
            ShortcutAction::Undo => {
                self.undo()?;
            }
            ShortcutAction::Redo => {
                self.redo()?;
            }
            ShortcutAction::Copy => self.copy(),
            ShortcutAction::Paste => {
                self.paste();
            }
            ShortcutAction::Duplicate => {
                self.duplicate();
            }
            ShortcutAction::Save => self.save_now()?,
            ShortcutAction::SelectAll => self.select_all(),
            ShortcutAction::Delete => self.delete(),
            ShortcutAction::Deselect => self.clear_selection(),
            ShortcutAction::SendBackward => self.send_backward(),
            ShortcutAction::BringForward => self.bring_forward(),
            ShortcutAction::SendToBack => self.send_to_back(),
            ShortcutAction::BringToFront => self.bring_to_front(),
            ShortcutAction::ZoomIn => self.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom_out(),
            ShortcutAction::ZoomToFit => self.auto_zoom(),
        }
        Ok(())
    }
}
