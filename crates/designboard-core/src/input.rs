//! Input events fed to the editor, from a GUI toolkit, a test harness or a
//! replay log.

use crate::element::ElementKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }
}

/// Pointer event in canvas coordinates. Only the primary button is reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => *position,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Delete,
    Backspace,
    Enter,
    Escape,
    /// Any other key, by name. Ignored by the editor.
    Other(String),
}

impl Key {
    /// Map a DOM-style key name to a key.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Delete" | "Del" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Enter" | "Return" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }

    /// Unit direction for arrow keys.
    pub fn arrow_direction(&self) -> Option<(f64, f64)> {
        match self {
            Key::ArrowUp => Some((0.0, -1.0)),
            Key::ArrowDown => Some((0.0, 1.0)),
            Key::ArrowLeft => Some((-1.0, 0.0)),
            Key::ArrowRight => Some((1.0, 0.0)),
            _ => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Key::Delete | Key::Backspace)
    }
}

/// One entry of an input log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
    },
    PointerUp {
        position: Point,
    },
    DoubleClick {
        position: Point,
    },
    Key {
        key: String,
    },
    /// Replace the buffer of the active text edit.
    TextInput {
        text: String,
    },
    SelectTool {
        tool: ElementKind,
    },
    /// Answer the most recent image request with a data URL.
    ImageData {
        data_url: String,
    },
}

impl InputEvent {
    /// The pointer event carried by this entry, if any.
    pub fn as_pointer(&self) -> Option<PointerEvent> {
        match self {
            InputEvent::PointerDown { position, modifiers } => Some(PointerEvent::Down {
                position: *position,
                modifiers: *modifiers,
            }),
            InputEvent::PointerMove { position } => Some(PointerEvent::Move {
                position: *position,
            }),
            InputEvent::PointerUp { position } => Some(PointerEvent::Up {
                position: *position,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("Backspace"), Key::Backspace);
        assert_eq!(Key::from_name("q"), Key::Other("q".to_string()));
        assert!(Key::from_name("Delete").is_delete());
        assert_eq!(Key::ArrowUp.arrow_direction(), Some((0.0, -1.0)));
        assert_eq!(Key::Enter.arrow_direction(), None);
    }

    #[test]
    fn test_parse_log_entries() {
        let json = r#"[
            {"event": "select_tool", "tool": "circle"},
            {"event": "pointer_down", "position": {"x": 10.0, "y": 20.0}, "modifiers": {"shift": true}},
            {"event": "pointer_move", "position": {"x": 15.0, "y": 20.0}},
            {"event": "pointer_up", "position": {"x": 15.0, "y": 20.0}},
            {"event": "key", "key": "Delete"}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], InputEvent::SelectTool { tool: ElementKind::Circle });
        match events[1].as_pointer() {
            Some(PointerEvent::Down { position, modifiers }) => {
                assert!((position.x - 10.0).abs() < f64::EPSILON);
                assert!(modifiers.shift);
                assert!(!modifiers.ctrl);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(events[4].as_pointer().is_none());
    }

    #[test]
    fn test_modifiers_default_when_absent() {
        let event: InputEvent =
            serde_json::from_str(r#"{"event": "pointer_down", "position": {"x": 1.0, "y": 2.0}}"#).unwrap();
        assert_eq!(
            event,
            InputEvent::PointerDown {
                position: Point::new(1.0, 2.0),
                modifiers: Modifiers::NONE,
            }
        );
    }
}
