use crate::keycode::{code_from_key, key_from_code};
use rdev::EventType;
use serde::{Deserialize, Serialize};

/// Linux input event code of a key (`KEY_A = 30`, ...). `0` is never a valid key.
pub type KeyCode = u32;

/// One observed or recorded key transition.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub code: KeyCode,
    pub pressed: bool,
}

impl Event {
    pub const fn press(code: KeyCode) -> Self {
        Self { code, pressed: true }
    }

    pub const fn release(code: KeyCode) -> Self {
        Self { code, pressed: false }
    }

    /// Keyboard transitions only. Mouse events and keys without a code are dropped.
    pub fn from_rdev(event_type: &EventType) -> Option<Self> {
        match *event_type {
            EventType::KeyPress(key) => code_from_key(key).map(Self::press),
            EventType::KeyRelease(key) => code_from_key(key).map(Self::release),
            _ => None,
        }
    }

    pub fn to_rdev(&self) -> Option<EventType> {
        let key = key_from_code(self.code)?;
        Some(if self.pressed {
            EventType::KeyPress(key)
        } else {
            EventType::KeyRelease(key)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdev::{Button, Key};

    #[test]
    fn test_keyboard_events_convert() {
        assert_eq!(
            Event::from_rdev(&EventType::KeyPress(Key::KeyA)),
            Some(Event::press(30))
        );
        assert_eq!(
            Event::from_rdev(&EventType::KeyRelease(Key::ControlLeft)),
            Some(Event::release(29))
        );
    }

    #[test]
    fn test_non_keyboard_events_are_filtered() {
        assert_eq!(Event::from_rdev(&EventType::ButtonPress(Button::Left)), None);
        assert_eq!(Event::from_rdev(&EventType::MouseMove { x: 1.0, y: 2.0 }), None);
        assert_eq!(Event::from_rdev(&EventType::KeyPress(Key::Unknown(999))), None);
    }

    #[test]
    fn test_to_rdev_keeps_polarity() {
        assert_eq!(Event::release(2).to_rdev(), Some(EventType::KeyRelease(Key::Num1)));
        assert_eq!(Event::press(0).to_rdev(), None);
    }
}
