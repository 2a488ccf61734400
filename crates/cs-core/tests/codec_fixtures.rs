//! Integration tests: stored document → model → snapshot / export.
//!
//! The fixture is shaped like a document written by the browser renderer,
//! with loose color syntax, legacy text types and renderer-only fields.

use cs_core::codec::{EXPORT_DENY_LIST, encode_document};
use cs_core::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const POSTER: &str = include_str!("fixtures/poster.json");
const GALLERY: &str = include_str!("fixtures/gallery.json");

fn poster() -> SceneDocument {
    from_json(POSTER).expect("fixture should decode")
}

// ─── Decoding ────────────────────────────────────────────────────────────

#[test]
fn fixture_decodes_workspace_and_objects() {
    let doc = poster();
    assert_eq!(doc.object_count(), 5);
    assert_eq!(doc.workspace_rect(), Rect::new(0.0, 0.0, 900.0, 1200.0));
    assert_eq!(doc.workspace().fill, Some(Color::WHITE));
    assert!(!doc.workspace().selectable);

    let types: Vec<&str> = doc.objects().iter().map(|o| o.kind.type_name()).collect();
    assert_eq!(types, ["circle", "textbox", "image", "path"]);
}

#[test]
fn objects_without_ids_get_prefixed_ones() {
    let doc = poster();
    assert!(doc.objects()[0].id.as_str().starts_with("circle_"));
    assert!(doc.objects()[1].id.as_str().starts_with("textbox_"));
    assert_eq!(doc.objects()[2].id, ObjectId::intern("hero"));
}

#[test]
fn text_fields_decode_from_legacy_type() {
    let doc = poster();
    let text = &doc.objects()[1];
    let style = text.text_style().expect("text style");
    assert_eq!(style.font_family, "Georgia");
    assert_eq!(style.font_size, 48.0);
    assert_eq!(style.font_weight, FontWeight::BOLD);
    assert_eq!(style.font_style, FontStyle::Italic);
    assert_eq!(style.text_align, TextAlign::Center);
    assert!(style.underline);
    assert_eq!(text.fill, Color::from_hex("#E91E63"));
}

#[test]
fn image_keeps_filter_and_scale() {
    let doc = poster();
    let hero = doc.get(ObjectId::intern("hero")).expect("hero image");
    match &hero.kind {
        ObjectKind::Image { filters, width, .. } => {
            let effects: Vec<_> = filters.iter().map(AppliedFilter::effect).collect();
            assert_eq!(effects, [Some(&ImageFilter::Sepia)]);
            assert_eq!(*width, 1800.0);
        }
        other => panic!("expected image, got {other:?}"),
    }
    assert_eq!(hero.scaled_size(), Size::new(900.0, 1200.0));
}

#[test]
fn workspace_flags_are_forced_off() {
    let doc = from_json(GALLERY).unwrap();
    assert!(!doc.workspace().selectable);
    assert!(!doc.workspace().has_controls);

    let snapshot: Value = serde_json::from_str(&to_json(&doc).unwrap()).unwrap();
    assert_eq!(snapshot["objects"][0]["selectable"], json!(false));
    assert_eq!(snapshot["objects"][0]["hasControls"], json!(false));
}

#[test]
fn foreign_filters_survive_snapshot() {
    let doc = from_json(GALLERY).expect("unknown filter types should load");
    let photo = doc.get(ObjectId::intern("photo")).unwrap();
    let ObjectKind::Image { filters, .. } = &photo.kind else {
        panic!("expected image, got {:?}", photo.kind);
    };
    let effects: Vec<_> = filters.iter().map(AppliedFilter::effect).collect();
    assert_eq!(
        effects,
        [None, Some(&ImageFilter::Grayscale), Some(&ImageFilter::Sepia)]
    );

    let snapshot: Value = serde_json::from_str(&to_json(&doc).unwrap()).unwrap();
    let source: Value = serde_json::from_str(GALLERY).unwrap();
    assert_eq!(snapshot["objects"][2]["filters"], source["objects"][2]["filters"]);

    let svg = render_svg(&doc);
    assert!(svg.contains("grayscale(1) sepia(1)"));
}

#[test]
fn solid_paint_replaces_kept_gradient() {
    let mut doc = from_json(GALLERY).unwrap();
    let banner = ObjectId::intern("banner");
    assert_eq!(doc.get(banner).unwrap().fill, None);
    assert!(doc.get(banner).unwrap().extra.contains_key("fill"));

    let red = Color::from_hex("#FF0000").unwrap();
    doc.get_mut(banner).unwrap().set_fill(red);
    let snapshot = to_json(&doc).unwrap();
    assert!(!snapshot.contains("colorStops"));

    let reloaded = from_json(&snapshot).expect("snapshot should reload");
    assert_eq!(reloaded.get(banner).unwrap().fill, Some(red));
    assert_eq!(to_json(&reloaded).unwrap(), snapshot);
}

#[test]
fn typed_paint_wins_over_stale_extra() {
    let mut doc = from_json(GALLERY).unwrap();
    let banner = doc.get_mut(ObjectId::intern("banner")).unwrap();
    banner.fill = Some(Color::BLACK);

    let wire = encode_document(&doc);
    assert_eq!(wire.objects[1].fill, Some(json!("#000000")));
    assert!(!wire.objects[1].extra.contains_key("fill"));
    assert!(from_json(&to_json(&doc).unwrap()).is_ok());
}

// ─── Snapshot encoding ───────────────────────────────────────────────────

#[test]
fn snapshot_roundtrip_is_stable() {
    let doc = poster();
    let first = to_json(&doc).unwrap();
    let second = to_json(&from_json(&first).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_fields_survive_snapshot() {
    let snapshot: Value = serde_json::from_str(&to_json(&poster()).unwrap()).unwrap();
    assert_eq!(snapshot["background"], json!("transparent"));
    assert_eq!(snapshot["objects"][0]["rx"], json!(0));
    assert_eq!(snapshot["objects"][3]["crossOrigin"], json!("anonymous"));
    assert_eq!(
        snapshot["objects"][4]["linkData"],
        json!({ "href": "https://example.com" })
    );
}

#[test]
fn colors_are_written_canonically() {
    let wire = encode_document(&poster());
    assert_eq!(wire.objects[0].fill, Some(json!("#FFFFFF")));
    assert_eq!(wire.objects[1].fill, Some(json!("#000000")));
    assert_eq!(
        wire.objects[0].shadow.as_ref().map(|s| s.color.to_hex()),
        Some("#000000CC".to_string())
    );
}

// ─── Export ──────────────────────────────────────────────────────────────

#[test]
fn export_is_tab_indented_and_canonical() {
    let exported = export_json(&poster()).unwrap();
    assert!(exported.starts_with("{\n\t\""));

    let value: Value = serde_json::from_str(&exported).unwrap();
    let objects = value["objects"].as_array().unwrap();
    assert_eq!(objects[0]["name"], json!("clip"));
    assert_eq!(objects[2]["type"], json!("textbox"));
    assert_eq!(objects[2]["styles"], json!({}));
    for obj in objects {
        for key in EXPORT_DENY_LIST {
            assert!(obj.get(*key).is_none(), "`{key}` leaked into export");
        }
    }
}

#[test]
fn export_reloads_to_same_content() {
    let doc = poster();
    let reloaded = from_json(&export_json(&doc).unwrap()).unwrap();
    assert_eq!(reloaded.object_count(), doc.object_count());
    for (a, b) in doc.objects().iter().zip(reloaded.objects()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.fill, b.fill);
    }
}

// ─── Lint & SVG ──────────────────────────────────────────────────────────

#[test]
fn fixture_is_lint_clean() {
    let diags = lint_document(&poster());
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn svg_covers_the_workspace() {
    let svg = render_svg(&poster());
    assert!(svg.contains("viewBox=\"0 0 900 1200\""));
    assert!(svg.contains("href=\"https://images.example.com/hero.jpg\""));
    assert!(svg.contains("filter: sepia(1)"));
    assert!(svg.contains(">Summer Sale</text>"));
    assert!(svg.contains("<path "));
}
