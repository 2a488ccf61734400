//! Integration tests: snapshot history through the editor.
//!
//! Undo must restore the previous encoding byte-for-byte, redo must
//! reproduce the undone state, and a save after an undo drops the redo
//! future.

use cs_core::*;
use cs_editor::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

type Ed = Editor<NullSurface>;

fn editor() -> Ed {
    let _ = env_logger::builder().is_test(true).try_init();
    Editor::new(EditorConfig::default(), NullSurface)
}

fn snap(ed: &Ed) -> String {
    ed.snapshot().unwrap()
}

// ─── Basic undo/redo ────────────────────────────────────────────────────

#[test]
fn add_then_undo_twice_returns_to_workspace() {
    let mut ed = editor();
    ed.add_circle();
    ed.add_square();
    assert!(ed.undo().unwrap());
    assert!(ed.undo().unwrap());

    assert_eq!(ed.history().cursor(), 0);
    assert_eq!(ed.document().object_count(), 1);
    assert!(!ed.can_undo());
    assert!(ed.can_redo());
    assert!(!ed.undo().unwrap());
}

#[test]
fn every_command_undoes_byte_for_byte() {
    let mut ed = editor();
    let circle = ed.add_circle();
    let text = ed.add_text("Body copy", TextOptions::default());

    let commands: Vec<Box<dyn Fn(&mut Ed)>> = vec![
        Box::new(|ed: &mut Ed| {
            ed.add_star();
        }),
        Box::new(move |ed: &mut Ed| {
            ed.select([circle, text]);
            ed.change_fill_color(Color::from_hex("#4CAF50").unwrap());
        }),
        Box::new(move |ed: &mut Ed| {
            ed.select([circle]);
            ed.change_stroke_dash_array(DashArray::from_slice(&[5.0, 5.0]));
        }),
        Box::new(move |ed: &mut Ed| {
            ed.select([text]);
            ed.change_font_family("Georgia");
        }),
        Box::new(move |ed: &mut Ed| {
            ed.select([circle]);
            ed.bring_to_front();
        }),
        Box::new(|ed: &mut Ed| ed.change_canvas_size(640.0, 480.0)),
        Box::new(|ed: &mut Ed| ed.change_background(Color::BLACK)),
        Box::new(move |ed: &mut Ed| {
            ed.select([text]);
            ed.delete();
        }),
        Box::new(move |ed: &mut Ed| {
            ed.select([circle]);
            ed.duplicate();
        }),
    ];

    for command in commands {
        let before = snap(&ed);
        command(&mut ed);
        let after = snap(&ed);
        assert_ne!(before, after);

        assert!(ed.undo().unwrap());
        assert_eq!(snap(&ed), before);
        assert!(ed.redo().unwrap());
        assert_eq!(snap(&ed), after);
    }
}

#[test]
fn undo_prunes_selection() {
    let mut ed = editor();
    let a = ed.add_circle();
    let b = ed.add_square();
    ed.select([a, b]);
    ed.undo().unwrap();
    assert_eq!(ed.selection(), &[a]);
    ed.undo().unwrap();
    assert!(ed.selection().is_empty());
}

#[test]
fn save_after_undo_drops_redo() {
    let mut ed = editor();
    ed.add_circle();
    ed.add_square();
    ed.undo().unwrap();
    assert!(ed.can_redo());

    ed.add_triangle();
    assert!(!ed.can_redo());
    assert_eq!(ed.history().len(), 3);
    assert!(!ed.redo().unwrap());
}

#[test]
fn depth_limit_trims_oldest() {
    let config = EditorConfig {
        history_depth: 3,
        ..EditorConfig::default()
    };
    let mut ed = Editor::new(config, NullSurface);
    for _ in 0..5 {
        ed.add_circle();
    }
    assert_eq!(ed.history().len(), 3);
    assert!(ed.undo().unwrap());
    assert!(ed.undo().unwrap());
    assert!(!ed.undo().unwrap());
    assert_eq!(ed.document().object_count(), 4);
}

#[test]
fn fixture_round_trips_through_history() {
    let mut ed = editor();
    ed.restore_json(include_str!("fixtures/flyer.json")).unwrap();
    let restored = snap(&ed);
    assert_eq!(ed.document().object_count(), 4);

    let reloaded = from_json(&restored).unwrap();
    assert_eq!(to_json(&reloaded).unwrap(), restored);

    let logo = ObjectId::intern("logo");
    ed.select([logo]);
    ed.change_opacity(0.25);
    ed.undo().unwrap();
    assert_eq!(snap(&ed), restored);
    assert!(!ed.can_undo());
}

#[test]
fn recoloring_a_gradient_keeps_history_loadable() {
    let mut ed = editor();
    ed.restore_json(
        r##"{"objects":[
            {"type":"rect","name":"clip","width":800,"height":600,"fill":"#FFFFFF"},
            {"type":"circle","id":"sun","radius":90,
             "fill":{"type":"linear","colorStops":[]},
             "stroke":{"type":"radial","colorStops":[]}}
        ]}"##,
    )
    .unwrap();
    let gradient = snap(&ed);
    let sun = ObjectId::intern("sun");

    ed.select([sun]);
    ed.change_fill_color(Color::from_hex("#FF0000").unwrap());
    ed.change_stroke_color(Color::from_hex("#0000FF").unwrap());
    let recolored = snap(&ed);
    let reloaded = from_json(&recolored).expect("recolored snapshot should reload");
    assert_eq!(to_json(&reloaded).unwrap(), recolored);
    assert!(!recolored.contains("colorStops"));

    assert!(ed.undo().unwrap());
    assert!(ed.undo().unwrap());
    assert_eq!(snap(&ed), gradient);
    assert!(ed.redo().unwrap());
    assert!(ed.redo().unwrap());
    assert_eq!(snap(&ed), recolored);
    assert_eq!(
        ed.document().get(sun).unwrap().fill,
        Color::from_hex("#FF0000")
    );
}

// ─── Linear-undo law ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Add), Just(Op::Undo), Just(Op::Redo)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The editor's history behaves like a list with a cursor where a
    /// save truncates everything after the cursor.
    #[test]
    fn history_is_linear(ops in prop::collection::vec(op(), 1..40)) {
        let mut ed = Editor::new(EditorConfig::default(), NullSurface);
        let mut model = vec![snap(&ed)];
        let mut cursor = 0usize;

        for op in ops {
            match op {
                Op::Add => {
                    ed.add_square();
                    model.truncate(cursor + 1);
                    model.push(snap(&ed));
                    cursor += 1;
                }
                Op::Undo => {
                    let moved = ed.undo().unwrap();
                    prop_assert_eq!(moved, cursor > 0);
                    cursor = cursor.saturating_sub(1);
                }
                Op::Redo => {
                    let moved = ed.redo().unwrap();
                    prop_assert_eq!(moved, cursor + 1 < model.len());
                    if moved {
                        cursor += 1;
                    }
                }
            }
            prop_assert_eq!(ed.history().cursor(), cursor);
            prop_assert_eq!(ed.history().len(), model.len());
            prop_assert_eq!(ed.can_undo(), cursor > 0);
            prop_assert_eq!(ed.can_redo(), cursor + 1 < model.len());
            prop_assert_eq!(&snap(&ed), &model[cursor]);
        }
    }
}
