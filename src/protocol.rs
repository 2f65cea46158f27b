//! Text listing of all slots.
//!
//! One line per recorded slot: `"<id0> <id1> <id2> : <code> <code> ... \n"`.
//! Only codes are written; on import the press/release polarity of each
//! occurrence is rebuilt by toggling, so a code seen an odd number of times
//! in a line ends up with an unmatched press.

use crate::event::{Event, KeyCode};
use crate::store::{MacroStore, SLOT_COUNT};

/// Codes tracked as "down" while rebuilding the polarity of one line.
const ACTIVE_CAPACITY: usize = 10;

pub fn encode(store: &MacroStore) -> String {
    let mut out = String::new();
    for slot in store.slots().iter().filter(|slot| !slot.is_empty()) {
        let [a, b, c] = slot.identifier;
        out.push_str(&format!("{} {} {} : ", a, b, c));
        for event in &slot.events {
            out.push_str(&event.code.to_string());
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Identifier(usize),
    Events,
}

struct LineParser {
    field: Field,
    active: Vec<KeyCode>,
    touched: bool,
}

impl LineParser {
    fn new() -> Self {
        Self {
            field: Field::Identifier(0),
            active: Vec::with_capacity(ACTIVE_CAPACITY),
            touched: false,
        }
    }

    fn value(&mut self, store: &mut MacroStore, index: usize, value: KeyCode) {
        let Some(slot) = store.slot_mut(index) else {
            return;
        };
        self.touched = true;
        match self.field {
            Field::Identifier(pos) if pos < 3 => {
                slot.identifier[pos] = value;
                self.field = Field::Identifier(pos + 1);
            }
            Field::Identifier(_) => {}
            Field::Events => {
                let pressed = match self.active.iter().position(|&code| code == value) {
                    Some(pos) => {
                        self.active.remove(pos);
                        false
                    }
                    None => {
                        if self.active.len() < ACTIVE_CAPACITY {
                            self.active.push(value);
                        }
                        true
                    }
                };
                slot.events.push(Event { code: value, pressed });
            }
        }
    }
}

/// Replaces every slot with the contents of `input`.
///
/// The grammar is permissive: any byte other than a digit, `:` or `\n` is a
/// separator, and the value `0` is skipped. Blank lines do not consume a slot
/// and lines past the tenth are ignored.
pub fn decode(store: &mut MacroStore, input: &[u8]) {
    store.clear();

    let mut index = 0;
    let mut line = LineParser::new();
    let mut number: Option<KeyCode> = None;

    for &byte in input.iter().chain(std::iter::once(&b'\n')) {
        if byte.is_ascii_digit() {
            let digit = KeyCode::from(byte - b'0');
            number = Some(number.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            continue;
        }

        if let Some(value) = number.take() {
            if value != 0 {
                line.value(store, index, value);
            }
        }

        match byte {
            b':' => {
                line.field = Field::Events;
                line.touched = true;
            }
            b'\n' if line.touched => {
                index += 1;
                line = LineParser::new();
            }
            _ => {}
        }

        if index >= SLOT_COUNT {
            break;
        }
    }

    let recorded = store.recorded_count();
    store.set_cursor(recorded);
    log::debug!("Decoded {} recorded slots", recorded);
}
