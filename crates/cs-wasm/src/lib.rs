//! WASM bridge for Canvas Studio: exposes the editor to the browser.
//!
//! Compiled via `wasm-pack build --target web`. Arguments arrive as the
//! strings the UI holds (colors, filter names, tool names, dimension
//! fields) and are parsed here; structured results go back as JSON.
//!
//! The host drives time: call `tick()` periodically so debounced saves
//! fire, and `render()` from `requestAnimationFrame`.

mod render2d;

use cs_core::{
    Color, FontStyle, FontWeight, ImageFilter, ObjectId, PathCmd, Point, SceneDocument, Size,
    TextAlign,
};
use cs_editor::style::{FONTS, PALETTE};
use cs_editor::{
    ActiveTool, AssetLoadError, Clock, DashArray, Editor, EditorConfig, Export, ImageHandle,
    ObjectPatch, Property, PropertyValue, SavePayload, SelectionEvent, ShortcutAction,
    TextOptions, coerce_dimension,
};
use render2d::Canvas2dSurface;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt::Display;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

/// The browser-facing editor.
///
/// Owns the editor, which owns the Canvas2D surface. All interaction from
/// the page goes through this struct.
#[wasm_bindgen]
pub struct DesignCanvas {
    editor: Editor<Canvas2dSurface>,
}

#[wasm_bindgen]
impl DesignCanvas {
    /// Create an editor drawing onto `canvas`, sized to its container.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, width: f64, height: f64) -> Result<DesignCanvas, JsValue> {
        init_logging();

        let mut surface = Canvas2dSurface::new(canvas)?;
        surface.resize(width, height);
        let config = EditorConfig {
            container: Size::new(width, height),
            ..EditorConfig::default()
        };
        let editor = Editor::new(config, surface).with_clock(JsClock);
        Ok(Self { editor })
    }

    /// Persist through `callback({ json, height, width })` after edits.
    pub fn set_save_callback(&mut self, callback: js_sys::Function) {
        self.editor.set_save_sink(Box::new(move |payload: SavePayload| {
            let arg = serde_json::to_string(&payload)
                .map_err(|e| JsValue::from_str(&e.to_string()))
                .and_then(|s| js_sys::JSON::parse(&s));
            match arg {
                Ok(arg) => {
                    if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                        log::error!("save callback failed: {e:?}");
                    }
                }
                Err(e) => log::error!("failed to encode save payload: {e:?}"),
            }
        }));
    }

    /// Called with no arguments whenever the selection is cleared.
    pub fn set_clear_selection_callback(&mut self, callback: js_sys::Function) {
        self.editor
            .set_clear_selection_callback(Box::new(move || {
                if let Err(e) = callback.call0(&JsValue::NULL) {
                    log::error!("clear-selection callback failed: {e:?}");
                }
            }));
    }

    // ─── Frame & timers ─────────────────────────────────────────────────

    /// Repaint if anything changed since the last frame. Returns whether
    /// a paint happened.
    pub fn render(&mut self) -> bool {
        if !self.editor.surface().needs_paint() {
            return false;
        }
        let (surface, doc, selected) = self.editor.scene_parts();
        surface.paint(doc, selected);
        true
    }

    /// Force a repaint on the next `render` (e.g. after an image decoded).
    pub fn invalidate(&mut self) {
        self.editor.surface_mut().invalidate();
    }

    /// Resize the canvas to its container and refit the workspace.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.editor.surface_mut().resize(width, height);
        self.editor.resize_container(Size::new(width, height));
    }

    /// Fire the debounced save if due.
    pub fn tick(&mut self) -> bool {
        self.editor.tick()
    }

    // ─── Documents ──────────────────────────────────────────────────────

    /// Load the stored document at startup. History starts from it.
    pub fn restore(&mut self, json: &str) -> Result<(), JsValue> {
        self.editor.restore_json(json).map_err(js_err)
    }

    /// Replace the document with an imported JSON file.
    pub fn load_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.editor.load_json(json).map_err(js_err)
    }

    pub fn save_now(&mut self) -> Result<(), JsValue> {
        self.editor.save_now().map_err(js_err)
    }

    // ─── Adding ─────────────────────────────────────────────────────────

    pub fn add_circle(&mut self) -> String {
        self.editor.add_circle().to_string()
    }

    pub fn add_square(&mut self) -> String {
        self.editor.add_square().to_string()
    }

    pub fn add_triangle(&mut self) -> String {
        self.editor.add_triangle().to_string()
    }

    pub fn add_diamond(&mut self) -> String {
        self.editor.add_diamond().to_string()
    }

    pub fn add_star(&mut self) -> String {
        self.editor.add_star().to_string()
    }

    /// Add a text box. `options` is a JSON object such as
    /// `{"fontSize": 80, "fontWeight": 700}`, or empty for defaults.
    pub fn add_text(&mut self, text: &str, options: &str) -> Result<String, JsValue> {
        let options: TextOptions = if options.trim().is_empty() {
            TextOptions::default()
        } else {
            serde_json::from_str(options).map_err(js_err)?
        };
        Ok(self.editor.add_text(text, options).to_string())
    }

    /// Start adding an image. The page loads `url` and reports back with
    /// `image_loaded` or `image_failed` using the returned handle.
    pub fn add_image(&mut self, url: &str) -> f64 {
        self.editor.request_image(url).0 as f64
    }

    /// Returns the new object's id.
    pub fn image_loaded(&mut self, handle: f64, natural_width: f64, natural_height: f64) -> Result<String, JsValue> {
        let added = self
            .editor
            .finish_image_load(
                ImageHandle(handle as u64),
                Ok(Size::new(natural_width, natural_height)),
            )
            .map_err(js_err)?;
        Ok(added.map(|id| id.to_string()).unwrap_or_default())
    }

    /// `reason` is `"cors"`, `"decode"` or a network message.
    pub fn image_failed(&mut self, handle: f64, reason: &str) -> Result<(), JsValue> {
        let error = match reason {
            "cors" => AssetLoadError::CrossOrigin,
            "decode" => AssetLoadError::Decode,
            other => AssetLoadError::Network(other.to_string()),
        };
        self.editor
            .finish_image_load(ImageHandle(handle as u64), Err(error))
            .map(|_| ())
            .map_err(js_err)
    }

    // ─── Freehand capture ───────────────────────────────────────────────

    /// Pointer down/move in draw mode, in screen coordinates.
    pub fn stroke_point(&mut self, x: f64, y: f64) -> bool {
        if !self.editor.is_drawing() {
            return false;
        }
        let p = self.editor.viewport().to_document(Point::new(x, y));
        self.editor.surface_mut().push_stroke_point(p);
        true
    }

    /// Pointer up in draw mode. Returns the new path's id, or an empty
    /// string if nothing was captured.
    pub fn end_stroke(&mut self) -> String {
        if !self.editor.surface().is_capturing_stroke() {
            return String::new();
        }
        let commands = self.editor.surface_mut().take_stroke();
        if commands.is_empty() {
            return String::new();
        }
        self.editor.add_path(commands).to_string()
    }

    /// Add a path from wire-format commands, e.g. `[["M",0,0],["L",5,5]]`.
    pub fn add_path(&mut self, commands: &str) -> Result<String, JsValue> {
        let commands: Vec<PathCmd> = serde_json::from_str(commands).map_err(js_err)?;
        Ok(self.editor.add_path(commands).to_string())
    }

    // ─── Selection & clipboard ──────────────────────────────────────────

    /// Select the topmost selectable object under a screen point.
    /// `additive` extends the selection. Returns the selected ids as JSON.
    pub fn select_at(&mut self, x: f64, y: f64, additive: bool) -> String {
        let p = self.editor.viewport().to_document(Point::new(x, y));
        let hit = hit_test(self.editor.document(), p);
        let mut ids: Vec<ObjectId> = if additive {
            self.editor.selection().to_vec()
        } else {
            Vec::new()
        };
        match hit {
            Some(id) if !ids.contains(&id) => ids.push(id),
            _ => {}
        }
        let event = if ids.is_empty() {
            SelectionEvent::Cleared
        } else {
            SelectionEvent::Updated(ids)
        };
        self.editor.handle_selection(event);
        self.editor.surface_mut().invalidate();
        self.get_selected_ids()
    }

    /// Select ids from a JSON array of strings.
    pub fn select_ids(&mut self, ids: &str) -> Result<(), JsValue> {
        let ids: Vec<String> = serde_json::from_str(ids).map_err(js_err)?;
        self.editor
            .select(ids.iter().map(|id| ObjectId::intern(id)));
        self.editor.surface_mut().invalidate();
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.editor.select_all();
        self.editor.surface_mut().invalidate();
    }

    pub fn clear_selection(&mut self) {
        self.editor.clear_selection();
        self.editor.surface_mut().invalidate();
    }

    pub fn get_selected_ids(&self) -> String {
        let ids: Vec<&str> = self.editor.selection().iter().map(|id| id.as_str()).collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn delete_selected(&mut self) {
        self.editor.delete();
    }

    pub fn copy(&mut self) {
        self.editor.copy();
    }

    pub fn paste(&mut self) -> String {
        let ids = self.editor.paste();
        id_list(&ids)
    }

    pub fn duplicate(&mut self) -> String {
        let ids = self.editor.duplicate();
        id_list(&ids)
    }

    /// Apply a move/scale/rotate from direct manipulation. `patch` is a
    /// JSON object with any of `left`, `top`, `angle`, `scaleX`, `scaleY`,
    /// `width`, `height`.
    pub fn modify_object(&mut self, id: &str, patch: &str) -> Result<bool, JsValue> {
        let patch: ObjectPatch = serde_json::from_str(patch).map_err(js_err)?;
        Ok(self.editor.modify_object(ObjectId::intern(id), patch))
    }

    // ─── Styling ────────────────────────────────────────────────────────

    /// Returns false if `color` is not a recognised CSS color.
    pub fn change_fill_color(&mut self, color: &str) -> bool {
        let Some(c) = parse_color(color) else {
            return false;
        };
        self.editor.change_fill_color(c);
        true
    }

    pub fn change_stroke_color(&mut self, color: &str) -> bool {
        let Some(c) = parse_color(color) else {
            return false;
        };
        self.editor.change_stroke_color(c);
        true
    }

    pub fn change_stroke_width(&mut self, width: f64) {
        self.editor.change_stroke_width(width);
    }

    /// `dashes` is a JSON array of numbers; `[]` is a solid line.
    pub fn change_stroke_dash_array(&mut self, dashes: &str) -> Result<(), JsValue> {
        let dashes: DashArray = serde_json::from_str(dashes).map_err(js_err)?;
        self.editor.change_stroke_dash_array(dashes);
        Ok(())
    }

    pub fn change_opacity(&mut self, opacity: f64) {
        self.editor.change_opacity(opacity);
    }

    pub fn change_font_family(&mut self, family: &str) {
        self.editor.change_font_family(family);
    }

    pub fn change_font_size(&mut self, size: f64) {
        self.editor.change_font_size(size);
    }

    /// Accepts `normal`, `bold` or a number such as `"600"`.
    pub fn change_font_weight(&mut self, weight: &str) -> bool {
        let Some(w) = parse_keyword::<FontWeight>(weight) else {
            return false;
        };
        self.editor.change_font_weight(w);
        true
    }

    pub fn change_font_style(&mut self, style: &str) -> bool {
        let Some(s) = parse_keyword::<FontStyle>(style) else {
            return false;
        };
        self.editor.change_font_style(s);
        true
    }

    pub fn change_font_underline(&mut self, underline: bool) {
        self.editor.change_font_underline(underline);
    }

    pub fn change_font_linethrough(&mut self, linethrough: bool) {
        self.editor.change_font_linethrough(linethrough);
    }

    pub fn change_text_align(&mut self, align: &str) -> bool {
        let Some(a) = parse_keyword::<TextAlign>(align) else {
            return false;
        };
        self.editor.change_text_align(a);
        true
    }

    /// Apply a catalog filter to the selected images; `"none"` clears.
    pub fn change_image_filter(&mut self, name: &str) -> Result<(), JsValue> {
        let filter = ImageFilter::from_name(name).map_err(js_err)?;
        self.editor.change_image_filter(filter);
        Ok(())
    }

    /// Current value of a property for the panels, as JSON. `key` is the
    /// camelCase property name (`fill`, `fontSize`, ...).
    pub fn get_active_property(&self, key: &str) -> Result<String, JsValue> {
        let prop: Property = key.parse().map_err(js_err)?;
        let value = self
            .editor
            .active_property::<PropertyValue>(prop)
            .unwrap_or_else(|| prop.fallback(self.editor.style_state()));
        serde_json::to_string(&value).map_err(js_err)
    }

    // ─── Layers ─────────────────────────────────────────────────────────

    pub fn bring_forward(&mut self) {
        self.editor.bring_forward();
    }

    pub fn send_backward(&mut self) {
        self.editor.send_backward();
    }

    pub fn bring_to_front(&mut self) {
        self.editor.bring_to_front();
    }

    pub fn send_to_back(&mut self) {
        self.editor.send_to_back();
    }

    // ─── Workspace, tools, zoom ─────────────────────────────────────────

    /// Resize the workspace from the settings form fields.
    pub fn change_canvas_size(&mut self, width: &str, height: &str) {
        let current = self.editor.workspace_size();
        let width = coerce_dimension(width, current.width);
        let height = coerce_dimension(height, current.height);
        self.editor.change_canvas_size(width, height);
    }

    pub fn change_background(&mut self, color: &str) -> bool {
        let Some(c) = parse_color(color) else {
            return false;
        };
        self.editor.change_background(c);
        true
    }

    pub fn choose_tool(&mut self, name: &str) -> Result<String, JsValue> {
        let tool: ActiveTool = name.parse().map_err(js_err)?;
        self.editor.choose_tool(tool);
        Ok(self.editor.active_tool().to_string())
    }

    pub fn zoom_in(&mut self) {
        self.editor.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.editor.zoom_out();
    }

    pub fn auto_zoom(&mut self) {
        self.editor.auto_zoom();
    }

    // ─── History ────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.editor.undo().map_err(js_err)
    }

    pub fn redo(&mut self) -> Result<bool, JsValue> {
        self.editor.redo().map_err(js_err)
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    /// Toolbar state as JSON.
    pub fn get_state(&self) -> String {
        let size = self.editor.workspace_size();
        json!({
            "canUndo": self.editor.can_undo(),
            "canRedo": self.editor.can_redo(),
            "activeTool": self.editor.active_tool().name(),
            "drawing": self.editor.is_drawing(),
            "zoom": self.editor.viewport().zoom,
            "width": size.width,
            "height": size.height,
            "selection": self.editor.selection().len(),
        })
        .to_string()
    }

    // ─── Export ─────────────────────────────────────────────────────────

    /// Each export returns `{"fileName": ..., "contents": ...}`.
    pub fn export_png(&mut self) -> Result<String, JsValue> {
        self.editor.export_png().map(export_json).map_err(js_err)
    }

    pub fn export_jpeg(&mut self) -> Result<String, JsValue> {
        self.editor.export_jpeg().map(export_json).map_err(js_err)
    }

    pub fn export_svg(&mut self) -> String {
        export_json(self.editor.export_svg())
    }

    pub fn export_json(&self) -> Result<String, JsValue> {
        self.editor.export_json().map(export_json).map_err(js_err)
    }

    // ─── Keyboard ───────────────────────────────────────────────────────

    /// Handle a key event the page did not route to a text input.
    /// Returns the action name, or an empty string when unbound.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, meta: bool) -> Result<String, JsValue> {
        let action = self
            .editor
            .handle_key(key, ctrl, shift, meta)
            .map_err(js_err)?;
        Ok(action.map(action_name).unwrap_or_default().to_string())
    }
}

// ─── Catalogs (no canvas needed) ─────────────────────────────────────────

#[wasm_bindgen]
pub fn fonts() -> String {
    serde_json::to_string(FONTS).unwrap_or_else(|_| "[]".to_string())
}

#[wasm_bindgen]
pub fn palette() -> String {
    serde_json::to_string(PALETTE).unwrap_or_else(|_| "[]".to_string())
}

#[wasm_bindgen]
pub fn filter_names() -> String {
    serde_json::to_string(cs_core::FILTER_NAMES).unwrap_or_else(|_| "[]".to_string())
}

/// Check a document before importing it. Returns `{"ok":true,"lint":[...]}`
/// or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(json: &str) -> String {
    validate_document(json).to_string()
}

/// Raise or lower console logging: `error`, `warn`, `info`, `debug`, `trace`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    if let Ok(filter) = level.parse::<log::LevelFilter>() {
        log::set_max_level(filter);
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn js_err(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_color(s: &str) -> Option<Color> {
    let color = Color::parse(s);
    if color.is_none() {
        log::warn!("ignoring unrecognised color `{s}`");
    }
    color
}

/// Parse a bare keyword through its serde representation.
fn parse_keyword<T: DeserializeOwned>(s: &str) -> Option<T> {
    serde_json::from_value(Value::String(s.to_string())).ok()
}

fn id_list(ids: &[ObjectId]) -> String {
    let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
}

fn export_json(export: Export) -> String {
    json!({ "fileName": export.file_name(), "contents": export.contents }).to_string()
}

/// Topmost selectable object whose bounds contain `p`.
fn hit_test(doc: &SceneDocument, p: Point) -> Option<ObjectId> {
    doc.objects()
        .iter()
        .rev()
        .find(|o| o.selectable && o.bounds().contains(p))
        .map(|o| o.id)
}

fn validate_document(json: &str) -> Value {
    match cs_core::from_json(json) {
        Ok(doc) => {
            let lint: Vec<String> = cs_core::lint_document(&doc)
                .iter()
                .map(|d| d.to_string())
                .collect();
            json!({ "ok": true, "objects": doc.object_count(), "lint": lint })
        }
        Err(e) => json!({ "ok": false, "error": e.to_string() }),
    }
}

fn action_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Copy => "copy",
        ShortcutAction::Paste => "paste",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::Save => "save",
        ShortcutAction::SelectAll => "selectAll",
        ShortcutAction::Delete => "delete",
        ShortcutAction::Deselect => "deselect",
        ShortcutAction::SendBackward => "sendBackward",
        ShortcutAction::BringForward => "bringForward",
        ShortcutAction::SendToBack => "sendToBack",
        ShortcutAction::BringToFront => "bringToFront",
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::ZoomToFit => "zoomToFit",
    }
}

// ─── Clock, logging, panics ──────────────────────────────────────────────

/// Milliseconds from `Date.now()`.
struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Forwards `log` records to the browser console.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Canvas Studio WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{DrawableObject, ObjectKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn keywords_parse_through_serde() {
        assert_eq!(parse_keyword::<FontWeight>("bold"), Some(FontWeight::BOLD));
        assert_eq!(parse_keyword::<FontWeight>("600"), Some(FontWeight(600)));
        assert_eq!(parse_keyword::<FontStyle>("italic"), Some(FontStyle::Italic));
        assert_eq!(parse_keyword::<TextAlign>("center"), Some(TextAlign::Center));
        assert_eq!(parse_keyword::<TextAlign>("middle"), None);
    }

    #[test]
    fn hit_test_prefers_topmost_selectable() {
        let mut doc = SceneDocument::default();
        let mut below = DrawableObject::new(
            ObjectId::intern("hit_below"),
            ObjectKind::Rect {
                width: 100.0,
                height: 100.0,
            },
        );
        below.left = 10.0;
        below.top = 10.0;
        let mut above = below.clone();
        above.id = ObjectId::intern("hit_above");
        doc.add(below);
        doc.add(above);

        assert_eq!(hit_test(&doc, Point::new(50.0, 50.0)), Some(ObjectId::intern("hit_above")));
        assert_eq!(hit_test(&doc, Point::new(500.0, 500.0)), None);

        doc.get_mut(ObjectId::intern("hit_above")).unwrap().selectable = false;
        assert_eq!(hit_test(&doc, Point::new(50.0, 50.0)), Some(ObjectId::intern("hit_below")));
    }

    #[test]
    fn validation_reports_errors_and_lint() {
        let ok = validate_document(&cs_core::to_json(&SceneDocument::default()).unwrap());
        assert_eq!(ok["ok"], true);
        assert_eq!(ok["objects"], 1);

        let bad = validate_document(r#"{"objects":[]}"#);
        assert_eq!(bad["ok"], false);
        assert!(bad["error"].as_str().unwrap().contains("workspace"));
    }

    #[test]
    fn export_envelope() {
        let out: Value = serde_json::from_str(&export_json(Export {
            format: cs_editor::ExportFormat::Svg,
            contents: "<svg/>".into(),
        }))
        .unwrap();
        assert_eq!(out["fileName"], "untitled.svg");
        assert_eq!(out["contents"], "<svg/>");
    }
}
