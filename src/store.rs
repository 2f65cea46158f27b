use std::fmt;

use crate::event::{Event, KeyCode};
use crate::keycode::key_name;

/// Number of macro slots. Bounded by the ten number-row keys used in identifiers.
pub const SLOT_COUNT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroSlot {
    /// Combination that triggers playback. `[0, 0, 0]` while unassigned.
    pub identifier: [KeyCode; 3],
    /// Recorded transitions in chronological order.
    pub events: Vec<Event>,
}

impl MacroSlot {
    pub fn is_assigned(&self) -> bool {
        self.identifier.iter().any(|&code| code != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True when `held` contains exactly the identifier keys, in any order.
    pub fn matches(&self, held: &[KeyCode]) -> bool {
        self.is_assigned() && same_set(held, &self.identifier)
    }
}

/// `ControlLeft+ShiftLeft+Num1 : KeyA↓ KeyA↑`
impl fmt::Display for MacroSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identifier: Vec<String> = self.identifier.iter().map(|&code| key_name(code)).collect();
        write!(f, "{} :", identifier.join("+"))?;
        for event in &self.events {
            let arrow = if event.pressed { '↓' } else { '↑' };
            write!(f, " {}{}", key_name(event.code), arrow)?;
        }
        Ok(())
    }
}

/// Compares two key lists as sets of exactly three codes.
pub fn same_set(held: &[KeyCode], expected: &[KeyCode; 3]) -> bool {
    held.len() == expected.len()
        && held.iter().all(|code| expected.contains(code))
        && expected.iter().all(|code| held.contains(code))
}

/// Fixed table of slots plus the round-robin cursor used by live recording.
#[derive(Debug, Clone, Default)]
pub struct MacroStore {
    slots: [MacroSlot; SLOT_COUNT],
    cursor: usize,
}

impl MacroStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[MacroSlot; SLOT_COUNT] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&MacroSlot> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut MacroSlot> {
        self.slots.get_mut(index)
    }

    /// Slot the next recording session writes into.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor % SLOT_COUNT;
    }

    pub fn advance_cursor(&mut self) {
        self.cursor = (self.cursor + 1) % SLOT_COUNT;
    }

    pub fn current_mut(&mut self) -> &mut MacroSlot {
        &mut self.slots[self.cursor]
    }

    /// First slot, in ascending order, whose identifier equals the held set.
    pub fn find_trigger(&self, held: &[KeyCode]) -> Option<usize> {
        self.slots.iter().position(|slot| slot.matches(held))
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = MacroSlot::default();
        }
    }

    pub fn recorded_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_empty()).count()
    }
}
