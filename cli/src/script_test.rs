use std::io::Cursor;

use marquee::{GridLayout, SelectionSet};

use super::*;

fn grid_engine() -> SelectionEngine<GridLayout> {
    SelectionEngine::new(GridLayout::default())
}

fn run(script: &str) -> SelectionEngine<GridLayout> {
    let mut engine = grid_engine();
    for event in read_script(Cursor::new(script)).expect("script parses") {
        event.apply(&mut engine);
    }
    engine
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_down_defaults_to_primary_button() {
    let event = parse_line(r#"{"event":"down","pointer":1,"x":10,"y":20}"#).expect("parse");
    assert_eq!(event, Some(ScriptEvent::Down { pointer: 1, x: 10.0, y: 20.0, button: Button::Primary }));
}

#[test]
fn parse_move_reads_optional_modifiers() {
    let event = parse_line(r#"{"event":"move","pointer":2,"x":1.5,"y":2,"shift":true}"#).expect("parse");
    assert_eq!(
        event,
        Some(ScriptEvent::Move { pointer: 2, x: 1.5, y: 2.0, shift: true, ctrl: false, alt: false, meta: false })
    );
}

#[test]
fn parse_lost_capture_and_key() {
    assert_eq!(
        parse_line(r#"{"event":"lost_capture","pointer":4}"#).expect("parse"),
        Some(ScriptEvent::LostCapture { pointer: 4 })
    );
    assert_eq!(
        parse_line(r#"{"event":"key","key":"Escape"}"#).expect("parse"),
        Some(ScriptEvent::Key { key: "Escape".to_owned() })
    );
}

#[test]
fn blank_and_comment_lines_are_skipped() {
    assert_eq!(parse_line("   ").expect("parse"), None);
    assert_eq!(parse_line("# drag across row one").expect("parse"), None);
}

#[test]
fn unknown_event_is_an_error() {
    assert!(parse_line(r#"{"event":"wheel","pointer":1}"#).is_err());
}

#[test]
fn read_script_reports_failing_line() {
    let script = "{\"event\":\"down\",\"pointer\":1,\"x\":0,\"y\":0}\n\n{\"event\":\"up\"}\n";
    match read_script(Cursor::new(script)) {
        Err(CliError::Script { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected script error, got {other:?}"),
    }
}

// =============================================================
// Replay against the default grid
// =============================================================

#[test]
fn replay_commits_first_two_cells() {
    let engine = run(concat!(
        "{\"event\":\"down\",\"pointer\":1,\"x\":130,\"y\":130}\n",
        "{\"event\":\"move\",\"pointer\":1,\"x\":190,\"y\":140}\n",
        "{\"event\":\"up\",\"pointer\":1}\n",
    ));
    assert_eq!(engine.committed(), &[0, 1].into_iter().collect::<SelectionSet>());
}

#[test]
fn replay_shift_drag_accretes() {
    let engine = run(concat!(
        "{\"event\":\"down\",\"pointer\":1,\"x\":130,\"y\":130}\n",
        "{\"event\":\"move\",\"pointer\":1,\"x\":135,\"y\":135}\n",
        "{\"event\":\"up\",\"pointer\":1}\n",
        "{\"event\":\"down\",\"pointer\":1,\"x\":190,\"y\":130}\n",
        "{\"event\":\"move\",\"pointer\":1,\"x\":195,\"y\":135,\"shift\":true}\n",
        "{\"event\":\"up\",\"pointer\":1}\n",
    ));
    assert_eq!(engine.committed(), &[0, 1].into_iter().collect::<SelectionSet>());
}

#[test]
fn replay_escape_keeps_prior_selection() {
    let engine = run(concat!(
        "{\"event\":\"down\",\"pointer\":1,\"x\":130,\"y\":130}\n",
        "{\"event\":\"move\",\"pointer\":1,\"x\":135,\"y\":135}\n",
        "{\"event\":\"up\",\"pointer\":1}\n",
        "{\"event\":\"down\",\"pointer\":1,\"x\":190,\"y\":130}\n",
        "{\"event\":\"move\",\"pointer\":1,\"x\":195,\"y\":135}\n",
        "{\"event\":\"key\",\"key\":\"Escape\"}\n",
    ));
    assert!(!engine.is_dragging());
    assert_eq!(engine.committed(), &[0].into_iter().collect::<SelectionSet>());
}
