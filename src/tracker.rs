use crate::event::KeyCode;
use crate::keycode::{numeral_code, KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTSHIFT};
use crate::store::{same_set, MacroStore};

/// Keys tracked at the same time. Further presses are dropped.
pub const MAX_HELD_KEYS: usize = 3;

/// Classification of the currently held keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combination {
    NoneHeld,
    ArmCombo,
    SlotTrigger(usize),
    Other,
}

/// The reserved keys: the arm combo, and the two modifiers that prefix the
/// identifier of every live-recorded slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerKeys {
    pub arm: [KeyCode; 3],
    pub slot_modifiers: [KeyCode; 2],
}

impl Default for TriggerKeys {
    fn default() -> Self {
        Self {
            arm: [KEY_LEFTCTRL, KEY_LEFTALT, KEY_LEFTSHIFT],
            slot_modifiers: [KEY_LEFTCTRL, KEY_LEFTSHIFT],
        }
    }
}

impl TriggerKeys {
    /// Identifier assigned to a slot at the end of a live recording.
    pub fn identifier_for(&self, slot: usize) -> [KeyCode; 3] {
        [self.slot_modifiers[0], self.slot_modifiers[1], numeral_code(slot)]
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyPressTracker {
    held: Vec<KeyCode>,
}

impl KeyPressTracker {
    pub fn new() -> Self {
        Self {
            held: Vec::with_capacity(MAX_HELD_KEYS),
        }
    }

    /// Updates the held set. Returns `false` when a press was dropped because
    /// [`MAX_HELD_KEYS`] keys are already held.
    pub fn observe(&mut self, code: KeyCode, pressed: bool) -> bool {
        if pressed {
            if self.held.contains(&code) {
                return true;
            }
            if self.held.len() >= MAX_HELD_KEYS {
                return false;
            }
            self.held.push(code);
        } else if let Some(pos) = self.held.iter().position(|&held| held == code) {
            self.held.remove(pos);
        }
        true
    }

    pub fn held(&self) -> &[KeyCode] {
        &self.held
    }

    pub fn classify(&self, triggers: &TriggerKeys, store: &MacroStore) -> Combination {
        if self.held.is_empty() {
            return Combination::NoneHeld;
        }
        // The arm combo shadows any slot carrying the same keys.
        if same_set(&self.held, &triggers.arm) {
            return Combination::ArmCombo;
        }
        match store.find_trigger(&self.held) {
            Some(index) => Combination::SlotTrigger(index),
            None => Combination::Other,
        }
    }

    pub fn reset(&mut self) {
        self.held.clear();
    }
}
