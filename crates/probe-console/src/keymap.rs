//! Key handling for the suggestion panel.
//!
//! Keys arrive as DOM-style names (`Enter`, `ArrowDown`, ...). Terminal
//! front-ends tend to send lowercase short names, so both are accepted.

/// Panel action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Select the highlighted candidate, or flash when there is none.
    Confirm,
    CursorUp,
    CursorDown,
    /// Close the panel, or abort a pending selection.
    Dismiss,
}

/// Look up the action for a key name.
pub fn action_from_key(key: &str) -> Option<KeyAction> {
    match key {
        "Enter" | "enter" | "Return" | "return" => Some(KeyAction::Confirm),
        "ArrowUp" | "Up" | "up" => Some(KeyAction::CursorUp),
        "ArrowDown" | "Down" | "down" => Some(KeyAction::CursorDown),
        "Escape" | "Esc" | "escape" | "esc" => Some(KeyAction::Dismiss),
        _ => None,
    }
}

/// Get all recognised key names.
pub fn available_keys() -> &'static [&'static str] {
    &["Enter", "ArrowUp", "ArrowDown", "Escape"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_key() {
        assert_eq!(action_from_key("Enter"), Some(KeyAction::Confirm));
        assert_eq!(action_from_key("down"), Some(KeyAction::CursorDown));
        assert_eq!(action_from_key("Esc"), Some(KeyAction::Dismiss));
        assert_eq!(action_from_key("Tab"), None);
    }

    #[test]
    fn test_available_keys_resolve() {
        for key in available_keys() {
            assert!(action_from_key(key).is_some(), "{key} has no action");
        }
    }
}
