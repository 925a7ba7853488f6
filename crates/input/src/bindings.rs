use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action::Command;

/// Key code to command map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    keys: BTreeMap<u32, Command>,
}

impl KeyBindings {
    pub const RIGHT_ARROW: u32 = 39;
    pub const KEY_P: u32 = 80;
    pub const KEY_R: u32 = 82;
    pub const KEY_S: u32 = 83;

    /// No key does anything.
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Bind `code` to `command`, replacing any previous binding for that code.
    pub fn bind(&mut self, code: u32, command: Command) -> Option<Command> {
        self.keys.insert(code, command)
    }

    pub fn unbind(&mut self, code: u32) -> Option<Command> {
        self.keys.remove(&code)
    }

    pub fn resolve(&self, code: u32) -> Option<Command> {
        self.keys.get(&code).copied()
    }

    /// Codes bound to `command`, ascending.
    pub fn codes_for(&self, command: Command) -> Vec<u32> {
        self.keys
            .iter()
            .filter(|&(_, c)| *c == command)
            .map(|(&code, _)| code)
            .collect()
    }
}

impl Default for KeyBindings {
    /// Right arrow steps, `P` pauses, `R` resets, `S` toggles stats.
    fn default() -> Self {
        let mut keys = Self::empty();
        keys.bind(Self::RIGHT_ARROW, Command::StepForward);
        keys.bind(Self::KEY_P, Command::TogglePause);
        keys.bind(Self::KEY_R, Command::ResetSystem);
        keys.bind(Self::KEY_S, Command::ToggleStats);
        keys
    }
}
