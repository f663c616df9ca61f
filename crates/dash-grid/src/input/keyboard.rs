//! Keyboard alternate input path

use serde::Deserialize;

/// Keys the grid reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Delete,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Delete" | "Del" => Key::Delete,
            _ => Key::Other,
        }
    }

    /// Unit step for arrow keys
    fn step(self) -> Option<(i32, i32)> {
        match self {
            Key::ArrowUp => Some((0, -1)),
            Key::ArrowDown => Some((0, 1)),
            Key::ArrowLeft => Some((-1, 0)),
            Key::ArrowRight => Some((1, 0)),
            Key::Delete | Key::Other => None,
        }
    }
}

/// A key press with modifier state
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyInput {
    pub key: String,
    pub shift_key: bool,
    pub ctrl_key: bool,
    pub meta_key: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    /// What this press asks the focused widget to do
    pub fn action(&self) -> Option<KeyAction> {
        let key = Key::from_name(&self.key);
        if key == Key::Delete {
            return self.shift_key.then_some(KeyAction::Remove);
        }
        let (dx, dy) = key.step()?;
        if self.ctrl_key || self.meta_key {
            Some(KeyAction::Resize { dw: dx, dh: dy })
        } else {
            Some(KeyAction::Move { dx, dy })
        }
    }
}

/// Keyboard command for the focused widget
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Move { dx: i32, dy: i32 },
    Resize { dw: i32, dh: i32 },
    Remove,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_move() {
        assert_eq!(KeyInput::new("ArrowLeft").action(), Some(KeyAction::Move { dx: -1, dy: 0 }));
        assert_eq!(KeyInput::new("ArrowDown").shift().action(), Some(KeyAction::Move { dx: 0, dy: 1 }));
    }

    #[test]
    fn test_modifier_arrows_resize() {
        assert_eq!(KeyInput::new("ArrowRight").ctrl().action(), Some(KeyAction::Resize { dw: 1, dh: 0 }));
        assert_eq!(KeyInput::new("ArrowUp").meta().action(), Some(KeyAction::Resize { dw: 0, dh: -1 }));
    }

    #[test]
    fn test_delete_needs_shift() {
        assert_eq!(KeyInput::new("Delete").action(), None);
        assert_eq!(KeyInput::new("Delete").shift().action(), Some(KeyAction::Remove));
        assert_eq!(KeyInput::new("a").action(), None);
    }

    #[test]
    fn test_deserialize_dom_shape() {
        let input: KeyInput = serde_json::from_str(r#"{"key":"ArrowUp","ctrlKey":true}"#).unwrap();
        assert_eq!(input, KeyInput::new("ArrowUp").ctrl());
    }
}
