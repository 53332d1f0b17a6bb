//! Replay scripts.
//!
//! One JSON object per line, tagged by `event`. Blank lines and lines
//! starting with `#` are skipped so scripts can carry notes.
//!
//! ```text
//! {"event":"down","pointer":1,"x":130,"y":130}
//! {"event":"move","pointer":1,"x":260,"y":190,"shift":true}
//! {"event":"up","pointer":1}
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::io::BufRead;

use marquee::{Action, Button, ElementRegistry, Key, Modifiers, Point, PointerId, SelectionEngine};
use serde::Deserialize;

use crate::CliError;

/// A single recorded host event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down {
        pointer: PointerId,
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
    },
    Move {
        pointer: PointerId,
        x: f64,
        y: f64,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        meta: bool,
    },
    Up {
        pointer: PointerId,
    },
    Cancel {
        pointer: PointerId,
    },
    LostCapture {
        pointer: PointerId,
    },
    Key {
        key: String,
    },
}

impl ScriptEvent {
    /// Feed this event to `engine` and return what it asked the host to do.
    pub fn apply<R: ElementRegistry>(&self, engine: &mut SelectionEngine<R>) -> Vec<Action> {
        match self {
            Self::Down { pointer, x, y, button } => engine.on_pointer_down(*pointer, Point::new(*x, *y), *button),
            Self::Move { pointer, x, y, shift, ctrl, alt, meta } => {
                let modifiers = Modifiers { shift: *shift, ctrl: *ctrl, alt: *alt, meta: *meta };
                engine.on_pointer_move(*pointer, Point::new(*x, *y), modifiers)
            }
            Self::Up { pointer } => engine.on_pointer_up(*pointer),
            Self::Cancel { pointer } => engine.on_pointer_cancel(*pointer),
            Self::LostCapture { pointer } => engine.on_lost_capture(*pointer),
            Self::Key { key } => engine.on_key_down(&Key::new(key.as_str())),
        }
    }
}

/// Parse one script line. `Ok(None)` for blanks and `#` comments.
pub fn parse_line(line: &str) -> Result<Option<ScriptEvent>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Read a whole script, reporting the 1-based line of the first bad event.
pub fn read_script<B: BufRead>(reader: B) -> Result<Vec<ScriptEvent>, CliError> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(source) => return Err(CliError::Script { line: index + 1, source }),
        }
    }
    Ok(events)
}
