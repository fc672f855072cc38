use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

/// Factory bindings, applied when no config overrides them.
const DEFAULT_BINDINGS: [(KeyAction, &str); 3] = [
    (KeyAction::TogglePlayback, "Space"),
    (KeyAction::ResetAnimation, "KeyR"),
    (KeyAction::ToggleAutoRotate, "KeyA"),
];

/// Keyboard shortcut configuration.
///
/// Serialized as a `[keybindings.bindings]` table mapping each action to a
/// winit key-code string, e.g. `TogglePlayback = "Space"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingOptions {
    /// Action to key-code table.
    pub bindings: HashMap<KeyAction, String>,
    /// Inverse table for event-time lookup. Derived, never serialized.
    #[serde(skip)]
    key_to_action: HashMap<String, KeyAction>,
}

/// The inverse table is derived from `bindings`, so equality ignores it.
/// A freshly deserialized value (empty cache) still equals its source.
impl PartialEq for KeybindingOptions {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl Eq for KeybindingOptions {}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let mut opts = Self {
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(action, key)| (*action, (*key).to_owned()))
                .collect(),
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl KeybindingOptions {
    /// Recompute the inverse table. Must run after `bindings` changes,
    /// including after deserialization, where serde skips the cache.
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action = self
            .bindings
            .iter()
            .map(|(action, key)| (key.clone(), *action))
            .collect();
    }

    /// Resolve a key-code string to its bound action, if any.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }
}
