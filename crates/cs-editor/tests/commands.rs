//! Integration tests: the editor command surface.
//!
//! Drives `Editor` through a recording render surface and checks the
//! document, selection, style state, viewport and save payloads.

use cs_core::viewport::{MAX_ZOOM, MIN_ZOOM};
use cs_core::*;
use cs_editor::*;
use pretty_assertions::assert_eq;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct RecordingSurface {
    events: Vec<SceneEvent>,
    viewport: Option<Viewport>,
    brush: Option<Brush>,
    capture_zoom: Option<f64>,
}

impl RenderSurface for RecordingSurface {
    fn scene_changed(&mut self, _doc: &SceneDocument, event: &SceneEvent) {
        self.events.push(*event);
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.viewport = Some(*viewport);
    }

    fn set_drawing_mode(&mut self, brush: Option<&Brush>) {
        self.brush = brush.copied();
    }

    fn capture(&mut self, _doc: &SceneDocument, options: &CaptureOptions) -> Result<String, String> {
        self.capture_zoom = self.viewport.map(|v| v.zoom);
        Ok(format!("data:{};base64,AAAA", options.format.mime()))
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn editor() -> Editor<RecordingSurface> {
    init_logs();
    Editor::new(EditorConfig::default(), RecordingSurface::default())
}

fn accent() -> Color {
    Color::from_hex("#FF5722").unwrap()
}

// ─── Adding ─────────────────────────────────────────────────────────────

#[test]
fn every_add_counts_once() {
    let mut ed = editor();
    ed.add_circle();
    ed.add_square();
    ed.add_triangle();
    ed.add_diamond();
    ed.add_star();
    ed.add_text("Hello", TextOptions::default());
    assert_eq!(ed.document().object_count(), 7);
    assert_eq!(ed.history().len(), 7);
}

#[test]
fn shapes_take_style_and_are_selected() {
    let mut ed = editor();
    ed.change_fill_color(accent());
    ed.change_stroke_width(6.0);
    let id = ed.add_square();

    assert_eq!(ed.selection(), &[id]);
    let obj = ed.document().get(id).unwrap();
    assert_eq!(obj.fill, Some(accent()));
    assert_eq!(obj.stroke_width, 6.0);
    let c = obj.center();
    assert!((c.x - 450.0).abs() < 1e-9 && (c.y - 600.0).abs() < 1e-9);
    assert_eq!(ed.surface().events.last(), Some(&SceneEvent::Added(id)));
}

#[test]
fn image_fills_workspace_when_loaded() {
    let mut ed = editor();
    let handle = ed.request_image("https://img.example/cat.png");
    ed.add_circle();
    let id = ed
        .finish_image_load(handle, Ok(Size::new(1800.0, 600.0)))
        .unwrap()
        .unwrap();

    let obj = ed.document().get(id).unwrap();
    assert_eq!(obj.scaled_size(), Size::new(900.0, 1200.0));
    assert_eq!(ed.selection(), &[id]);
    assert_eq!(ed.pending_image_count(), 0);
}

#[test]
fn failed_image_load_adds_nothing() {
    let mut ed = editor();
    let handle = ed.request_image("https://img.example/missing.png");
    let added = ed
        .finish_image_load(handle, Err(AssetLoadError::Network("404".into())))
        .unwrap();
    assert_eq!(added, None);
    assert_eq!(ed.document().object_count(), 1);
    assert!(!ed.can_undo());

    assert!(matches!(
        ed.finish_image_load(handle, Ok(Size::new(10.0, 10.0))),
        Err(EditorError::UnknownImageRequest(_))
    ));
}

#[test]
fn freehand_path_uses_brush() {
    let mut ed = editor();
    ed.change_stroke_color(Color::from_hex("#2196F3").unwrap());
    ed.change_stroke_width(5.0);
    let id = ed.add_path(vec![
        PathCmd::MoveTo(100.0, 100.0),
        PathCmd::LineTo(200.0, 150.0),
    ]);
    let obj = ed.document().get(id).unwrap();
    assert_eq!(obj.fill, None);
    assert_eq!(obj.stroke_width, 5.0);
    assert_eq!(obj.stroke.unwrap().to_hex(), "#2196F3");
    assert!(ed.selection().is_empty());
}

// ─── Selection, delete, clipboard ───────────────────────────────────────

#[test]
fn delete_removes_exactly_the_selection() {
    let mut ed = editor();
    let cleared = Rc::new(Cell::new(0));
    let counter = Rc::clone(&cleared);
    ed.set_clear_selection_callback(Box::new(move || counter.set(counter.get() + 1)));

    let a = ed.add_circle();
    let b = ed.add_square();
    let c = ed.add_triangle();
    let before = ed.document().object_count();
    let workspace = ed.document().workspace().clone();
    let entries = ed.history().len();

    ed.select([a, c]);
    ed.delete();

    assert_eq!(ed.document().object_count(), before - 2);
    assert!(ed.document().contains(b));
    assert_eq!(ed.document().workspace(), &workspace);
    assert!(ed.selection().is_empty());
    assert_eq!(cleared.get(), 1);
    assert_eq!(ed.history().len(), entries + 1);

    // Nothing selected: nothing happens.
    ed.delete();
    assert_eq!(ed.history().len(), entries + 1);
}

#[test]
fn selection_ignores_workspace_and_unknown_ids() {
    let mut ed = editor();
    let a = ed.add_circle();
    let workspace = ed.document().workspace().id;
    ed.handle_selection(SelectionEvent::Created(vec![
        workspace,
        ObjectId::intern("ghost"),
        a,
    ]));
    assert_eq!(ed.selection(), &[a]);
}

#[test]
fn paste_cascades_and_selects_copies() {
    let mut ed = editor();
    let original = ed.add_square();
    let origin = ed.document().get(original).unwrap().bounds().origin();

    ed.copy();
    let first = ed.paste();
    let second = ed.paste();
    assert_eq!(ed.document().object_count(), 4);
    assert_eq!(ed.selection(), second.as_slice());

    let at = |id: ObjectId| ed.document().get(id).unwrap().bounds().origin();
    assert_eq!(at(first[0]), origin + Vec2::new(10.0, 10.0));
    assert_eq!(at(second[0]), origin + Vec2::new(20.0, 20.0));
}

#[test]
fn duplicate_and_select_all() {
    let mut ed = editor();
    ed.add_circle();
    ed.add_square();
    ed.select_all();
    let copies = ed.duplicate();
    assert_eq!(copies.len(), 2);
    assert_eq!(ed.document().object_count(), 5);
    ed.select_all();
    assert_eq!(ed.selection().len(), 4);
}

// ─── Styling ────────────────────────────────────────────────────────────

#[test]
fn style_change_without_selection_only_updates_state() {
    let mut ed = editor();
    ed.add_circle();
    ed.clear_selection();
    let entries = ed.history().len();

    ed.change_fill_color(accent());
    ed.change_opacity(0.5);
    assert_eq!(ed.style_state().fill, accent());
    assert_eq!(ed.history().len(), entries);
    assert_eq!(ed.active_property::<f64>(Property::Opacity), Some(1.0));
}

#[test]
fn one_entry_per_style_command() {
    let mut ed = editor();
    ed.add_circle();
    ed.add_square();
    ed.add_text("Caption", TextOptions::default());
    ed.select_all();
    let entries = ed.history().len();

    ed.change_fill_color(accent());
    assert_eq!(ed.history().len(), entries + 1);
    assert!(ed.document().objects().iter().all(|o| o.fill == Some(accent())));
}

#[test]
fn font_properties_only_touch_text() {
    let mut ed = editor();
    let circle = ed.add_circle();
    let text = ed.add_text("Title", TextOptions::default());
    ed.select([circle, text]);

    ed.change_font_size(64.0);
    ed.change_font_weight(FontWeight::BOLD);
    ed.change_text_align(TextAlign::Center);
    ed.change_font_underline(true);

    let style = ed.document().get(text).unwrap().text_style().unwrap().clone();
    assert_eq!(style.font_size, 64.0);
    assert_eq!(style.font_weight, FontWeight::BOLD);
    assert_eq!(style.text_align, TextAlign::Center);
    assert!(style.underline);
    assert_eq!(ed.document().get(circle).unwrap().text_style(), None);
    // Font size is not part of the style state.
    ed.clear_selection();
    assert_eq!(ed.active_property::<f64>(Property::FontSize), Some(32.0));
}

#[test]
fn stroke_color_recolors_text() {
    let mut ed = editor();
    let text = ed.add_text("Outline", TextOptions::default());
    ed.change_stroke_color(accent());
    let obj = ed.document().get(text).unwrap();
    assert_eq!(obj.fill, Some(accent()));
    assert_eq!(obj.stroke, Some(accent()));
}

#[test]
fn active_property_reads_first_selected() {
    let mut ed = editor();
    let a = ed.add_circle();
    ed.change_opacity(0.4);
    let b = ed.add_square();
    ed.select([a, b]);

    assert_eq!(ed.active_property::<f64>(Property::Opacity), Some(0.4));
    assert_eq!(ed.active_property::<Color>(Property::Fill), Some(Color::BLACK));
    assert_eq!(ed.active_property::<String>(Property::Opacity), None);
    assert_eq!(
        ed.active_property_or(Property::FontFamily, String::from("Georgia")),
        "Georgia"
    );
}

#[test]
fn image_filter_sepia_then_none() {
    let mut ed = editor();
    let handle = ed.request_image("https://img.example/beach.jpg");
    let id = ed
        .finish_image_load(handle, Ok(Size::new(900.0, 1200.0)))
        .unwrap()
        .unwrap();

    ed.change_image_filter(ImageFilter::from_name("sepia").unwrap());
    let filters = |ed: &Editor<RecordingSurface>| match &ed.document().get(id).unwrap().kind {
        ObjectKind::Image { filters, .. } => filters
            .iter()
            .map(|f| f.effect().cloned())
            .collect::<Vec<_>>(),
        _ => panic!("expected image"),
    };
    assert_eq!(filters(&ed), vec![Some(ImageFilter::Sepia)]);

    ed.change_image_filter(ImageFilter::from_name("none").unwrap());
    assert!(filters(&ed).is_empty());
}

#[test]
fn picking_a_filter_replaces_foreign_ones() {
    let mut ed = editor();
    ed.restore_json(
        r##"{"objects":[
            {"type":"rect","name":"clip","width":800,"height":600,"fill":"#FFFFFF"},
            {"type":"image","id":"shot","width":400,"height":300,"src":"https://img.example/shot.png",
             "filters":[{"type":"Noise","noise":100}]}
        ]}"##,
    )
    .expect("foreign filters should load");
    let shot = ObjectId::intern("shot");
    let raw_filters = |ed: &Editor<RecordingSurface>| match &ed.document().get(shot).unwrap().kind {
        ObjectKind::Image { filters, .. } => filters
            .iter()
            .map(|f| f.raw().clone())
            .collect::<Vec<_>>(),
        _ => panic!("expected image"),
    };
    let noise = raw_filters(&ed);
    assert_eq!(noise, vec![serde_json::json!({"type": "Noise", "noise": 100})]);

    ed.select([shot]);
    ed.change_image_filter(ImageFilter::from_name("invert").unwrap());
    assert_eq!(raw_filters(&ed), vec![serde_json::json!({"type": "Invert"})]);

    ed.undo().unwrap();
    assert_eq!(raw_filters(&ed), noise);

    ed.select([shot]);
    ed.change_image_filter(None);
    assert!(raw_filters(&ed).is_empty());
}

#[test]
fn modify_object_records_history() {
    let mut ed = editor();
    let id = ed.add_circle();
    let entries = ed.history().len();
    ed.modify_object(
        id,
        ObjectPatch {
            angle: Some(45.0),
            ..ObjectPatch::default()
        },
    );
    assert_eq!(ed.document().get(id).unwrap().angle, 45.0);
    assert_eq!(ed.history().len(), entries + 1);
}

// ─── Layers ─────────────────────────────────────────────────────────────

fn order(ed: &Editor<RecordingSurface>) -> Vec<ObjectId> {
    ed.document().objects().iter().map(|o| o.id).collect()
}

fn encoded_first_name(ed: &Editor<RecordingSurface>) -> String {
    let value: serde_json::Value = serde_json::from_str(&ed.snapshot().unwrap()).unwrap();
    value["objects"][0]["name"].as_str().unwrap_or_default().to_string()
}

#[test]
fn reordering_never_passes_the_workspace() {
    let mut ed = editor();
    let a = ed.add_circle();
    let b = ed.add_square();
    let c = ed.add_triangle();

    ed.select([c]);
    ed.send_backward();
    ed.send_backward();
    ed.send_backward();
    assert_eq!(order(&ed), [c, a, b]);
    assert_eq!(encoded_first_name(&ed), "clip");

    ed.bring_forward();
    assert_eq!(order(&ed), [a, c, b]);

    ed.select([a, c]);
    ed.bring_to_front();
    assert_eq!(order(&ed), [b, a, c]);

    ed.send_to_back();
    assert_eq!(order(&ed), [a, c, b]);
    assert_eq!(encoded_first_name(&ed), "clip");
}

#[test]
fn bring_forward_keeps_group_order() {
    let mut ed = editor();
    let a = ed.add_circle();
    let b = ed.add_square();
    let c = ed.add_triangle();
    ed.select([a, b]);
    ed.bring_forward();
    assert_eq!(order(&ed), [c, a, b]);

    // Already frontmost: no reorder, no entry.
    ed.select([b]);
    let entries = ed.history().len();
    ed.bring_forward();
    assert_eq!(ed.history().len(), entries);
    assert_eq!(order(&ed), [c, a, b]);
}

// ─── Workspace & viewport ───────────────────────────────────────────────

#[test]
fn canvas_resize_refits_viewport() {
    let mut ed = editor();
    ed.change_canvas_size(500.0, 500.0);
    assert_eq!(ed.workspace_size(), Size::new(500.0, 500.0));
    let zoom = ed.viewport().zoom;
    assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom));
    assert_eq!(ed.surface().viewport, Some(ed.viewport()));

    ed.change_canvas_size(coerce_dimension("abc", 500.0), coerce_dimension("0", 500.0));
    assert_eq!(ed.workspace_size(), Size::new(500.0, 1.0));
}

#[test]
fn fit_centers_the_workspace() {
    let mut ed = editor();
    ed.resize_container(Size::new(1000.0, 1000.0));
    let vp = ed.viewport();
    assert!((vp.zoom - 0.85 * 1000.0 / 1200.0).abs() < 1e-9);
    let center = vp.to_screen(ed.document().workspace_rect().center());
    assert!((center.x - 500.0).abs() < 1e-9 && (center.y - 500.0).abs() < 1e-9);
}

#[test]
fn manual_zoom_is_clamped() {
    let mut ed = editor();
    for _ in 0..30 {
        ed.zoom_out();
    }
    assert!((ed.viewport().zoom - MIN_ZOOM).abs() < 1e-9);
    for _ in 0..30 {
        ed.zoom_in();
    }
    assert!((ed.viewport().zoom - MAX_ZOOM).abs() < 1e-9);
}

#[test]
fn background_change_is_undoable() {
    let mut ed = editor();
    ed.change_background(accent());
    assert_eq!(ed.document().workspace().fill, Some(accent()));
    assert!(ed.undo().unwrap());
    assert_eq!(ed.document().workspace().fill, Some(Color::WHITE));
}

// ─── Tools & draw mode ──────────────────────────────────────────────────

#[test]
fn draw_tool_toggles_capture() {
    let mut ed = editor();
    ed.add_circle();
    ed.choose_tool(ActiveTool::Draw);
    assert!(ed.is_drawing());
    assert!(ed.selection().is_empty());
    assert_eq!(ed.surface().brush.map(|b| b.width), Some(2.0));

    ed.change_stroke_width(9.0);
    assert_eq!(ed.surface().brush.map(|b| b.width), Some(9.0));

    ed.choose_tool(ActiveTool::Shapes);
    assert!(!ed.is_drawing());
    assert_eq!(ed.surface().brush, None);
}

#[test]
fn selection_dependent_tool_snaps_back() {
    let mut ed = editor();
    ed.add_circle();
    ed.choose_tool(ActiveTool::Fill);
    ed.handle_selection(SelectionEvent::Cleared);
    assert_eq!(ed.active_tool(), ActiveTool::Select);

    ed.choose_tool(ActiveTool::Templates);
    ed.handle_selection(SelectionEvent::Cleared);
    assert_eq!(ed.active_tool(), ActiveTool::Templates);
}

// ─── Export ─────────────────────────────────────────────────────────────

#[test]
fn raster_export_captures_at_identity() {
    let mut ed = editor();
    ed.add_circle();
    let fitted = ed.viewport();

    let png = ed.export_png().unwrap();
    assert_eq!(png.file_name(), "untitled.png");
    assert!(png.contents.starts_with("data:image/png"));
    assert_eq!(ed.surface().capture_zoom, Some(1.0));
    assert_eq!(ed.viewport(), fitted);

    let jpeg = ed.export_jpeg().unwrap();
    assert_eq!(jpeg.file_name(), "untitled.jpg");
}

#[test]
fn headless_surface_cannot_capture() {
    let mut ed = Editor::new(EditorConfig::default(), NullSurface);
    assert!(matches!(ed.export_png(), Err(EditorError::Capture(_))));
    let svg = ed.export_svg();
    assert_eq!(svg.file_name(), "untitled.svg");
    assert!(svg.contents.starts_with("<svg"));
}

#[test]
fn export_reload_scenario() {
    let mut ed = editor();
    ed.add_circle();
    ed.add_text("Heading", TextOptions::default());
    ed.select_all();
    ed.change_fill_color(accent());
    let export = ed.export_json().unwrap();
    assert_eq!(export.file_name(), "untitled.json");

    let mut fresh = editor();
    fresh.load_json(&export.contents).unwrap();
    let doc = fresh.document();
    assert_eq!(doc.object_count(), 3);
    assert!(doc.objects().iter().all(|o| o.fill == Some(accent())));
    assert!(doc.objects()[1].is_text());
}

// ─── Load / restore ─────────────────────────────────────────────────────

#[test]
fn malformed_load_leaves_document_untouched() {
    let mut ed = editor();
    ed.add_circle();
    let before = ed.snapshot().unwrap();
    let entries = ed.history().len();

    assert!(matches!(
        ed.load_json("{ not json"),
        Err(EditorError::MalformedDocument(DecodeError::Json(_)))
    ));
    assert!(matches!(
        ed.load_json(r#"{"version":"5.3.0","objects":[]}"#),
        Err(EditorError::MalformedDocument(DecodeError::MissingWorkspace))
    ));
    assert_eq!(ed.snapshot().unwrap(), before);
    assert_eq!(ed.history().len(), entries);
}

#[test]
fn load_is_one_undoable_step() {
    let mut ed = editor();
    let id = ed.add_circle();
    let before = ed.snapshot().unwrap();

    let mut other = editor();
    other.add_square();
    other.add_star();
    let json = other.snapshot().unwrap();

    let entries = ed.history().len();
    ed.load_json(&json).unwrap();
    assert_eq!(ed.history().len(), entries + 1);
    assert_eq!(ed.document().object_count(), 3);
    assert!(ed.selection().is_empty());
    assert!(!ed.document().contains(id));

    ed.undo().unwrap();
    assert_eq!(ed.snapshot().unwrap(), before);
}

#[test]
fn restore_reseeds_history() {
    let mut ed = editor();
    ed.add_circle();
    ed.add_square();
    let stored = ed.snapshot().unwrap();

    let mut reopened = editor();
    reopened.restore_json(&stored).unwrap();
    assert_eq!(reopened.history().len(), 1);
    assert!(!reopened.can_undo());
    assert_eq!(reopened.snapshot().unwrap(), stored);
}

// ─── Persistence & shortcuts ────────────────────────────────────────────

fn saving_editor() -> (Editor<RecordingSurface>, ManualClock, Rc<RefCell<Vec<SavePayload>>>) {
    let clock = ManualClock::new();
    let saved = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&saved);
    let ed = editor()
        .with_clock(clock.clone())
        .with_save_sink(move |p: SavePayload| sink.borrow_mut().push(p));
    (ed, clock, saved)
}

#[test]
fn rapid_edits_persist_once() {
    let (mut ed, clock, saved) = saving_editor();
    ed.add_circle();
    clock.advance(300);
    ed.add_square();
    clock.advance(300);
    assert!(!ed.tick());
    clock.advance(200);
    assert!(ed.tick());
    assert!(!ed.tick());

    let saved = saved.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!((saved[0].width, saved[0].height), (900.0, 1200.0));
    assert_eq!(saved[0].json, ed.snapshot().unwrap());
}

#[test]
fn undo_schedules_a_save() {
    let (mut ed, clock, saved) = saving_editor();
    ed.add_circle();
    ed.save_now().unwrap();
    assert_eq!(saved.borrow().len(), 1);

    ed.undo().unwrap();
    assert!(ed.has_pending_save());
    clock.advance(500);
    ed.tick();
    assert_eq!(saved.borrow().len(), 2);
    assert_eq!(saved.borrow()[1].json, ed.snapshot().unwrap());
}

#[test]
fn save_shortcut_skips_history() {
    let (mut ed, _clock, saved) = saving_editor();
    ed.add_circle();
    let entries = ed.history().len();

    let action = ed.handle_key("s", true, false, false).unwrap();
    assert_eq!(action, Some(ShortcutAction::Save));
    assert_eq!(saved.borrow().len(), 1);
    assert_eq!(ed.history().len(), entries);
    assert!(!ed.has_pending_save());
}

#[test]
fn shortcuts_drive_commands() {
    let mut ed = editor();
    ed.add_circle();
    ed.handle_key("d", false, false, true).unwrap();
    assert_eq!(ed.document().object_count(), 3);

    ed.handle_key("a", true, false, false).unwrap();
    ed.handle_key("Delete", false, false, false).unwrap();
    assert_eq!(ed.document().object_count(), 1);

    ed.handle_key("z", true, false, false).unwrap();
    assert_eq!(ed.document().object_count(), 3);
    ed.handle_key("Z", true, true, false).unwrap();
    assert_eq!(ed.document().object_count(), 1);

    assert_eq!(ed.handle_key("q", false, false, false).unwrap(), None);
}
