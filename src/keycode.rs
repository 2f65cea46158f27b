//! Mapping between `rdev` keys and Linux input event codes.
//!
//! The text listing and the trigger combinations are expressed in Linux
//! codes (`/usr/include/linux/input-event-codes.h`), so every key that can be
//! recorded or replayed needs an entry here.

use crate::event::KeyCode;
use rdev::Key;

pub const KEY_LEFTCTRL: KeyCode = 29;
pub const KEY_LEFTSHIFT: KeyCode = 42;
pub const KEY_LEFTALT: KeyCode = 56;
pub const KEY_1: KeyCode = 2;
pub const KEY_0: KeyCode = 11;

const KEY_TABLE: &[(Key, KeyCode)] = &[
    (Key::Escape, 1),
    (Key::Num1, 2),
    (Key::Num2, 3),
    (Key::Num3, 4),
    (Key::Num4, 5),
    (Key::Num5, 6),
    (Key::Num6, 7),
    (Key::Num7, 8),
    (Key::Num8, 9),
    (Key::Num9, 10),
    (Key::Num0, 11),
    (Key::Minus, 12),
    (Key::Equal, 13),
    (Key::Backspace, 14),
    (Key::Tab, 15),
    (Key::KeyQ, 16),
    (Key::KeyW, 17),
    (Key::KeyE, 18),
    (Key::KeyR, 19),
    (Key::KeyT, 20),
    (Key::KeyY, 21),
    (Key::KeyU, 22),
    (Key::KeyI, 23),
    (Key::KeyO, 24),
    (Key::KeyP, 25),
    (Key::LeftBracket, 26),
    (Key::RightBracket, 27),
    (Key::Return, 28),
    (Key::ControlLeft, 29),
    (Key::KeyA, 30),
    (Key::KeyS, 31),
    (Key::KeyD, 32),
    (Key::KeyF, 33),
    (Key::KeyG, 34),
    (Key::KeyH, 35),
    (Key::KeyJ, 36),
    (Key::KeyK, 37),
    (Key::KeyL, 38),
    (Key::SemiColon, 39),
    (Key::Quote, 40),
    (Key::BackQuote, 41),
    (Key::ShiftLeft, 42),
    (Key::BackSlash, 43),
    (Key::KeyZ, 44),
    (Key::KeyX, 45),
    (Key::KeyC, 46),
    (Key::KeyV, 47),
    (Key::KeyB, 48),
    (Key::KeyN, 49),
    (Key::KeyM, 50),
    (Key::Comma, 51),
    (Key::Dot, 52),
    (Key::Slash, 53),
    (Key::ShiftRight, 54),
    (Key::KpMultiply, 55),
    (Key::Alt, 56),
    (Key::Space, 57),
    (Key::CapsLock, 58),
    (Key::F1, 59),
    (Key::F2, 60),
    (Key::F3, 61),
    (Key::F4, 62),
    (Key::F5, 63),
    (Key::F6, 64),
    (Key::F7, 65),
    (Key::F8, 66),
    (Key::F9, 67),
    (Key::F10, 68),
    (Key::NumLock, 69),
    (Key::ScrollLock, 70),
    (Key::Kp7, 71),
    (Key::Kp8, 72),
    (Key::Kp9, 73),
    (Key::KpMinus, 74),
    (Key::Kp4, 75),
    (Key::Kp5, 76),
    (Key::Kp6, 77),
    (Key::KpPlus, 78),
    (Key::Kp1, 79),
    (Key::Kp2, 80),
    (Key::Kp3, 81),
    (Key::Kp0, 82),
    (Key::KpDelete, 83),
    (Key::IntlBackslash, 86),
    (Key::F11, 87),
    (Key::F12, 88),
    (Key::KpReturn, 96),
    (Key::ControlRight, 97),
    (Key::KpDivide, 98),
    (Key::PrintScreen, 99),
    (Key::AltGr, 100),
    (Key::Home, 102),
    (Key::UpArrow, 103),
    (Key::PageUp, 104),
    (Key::LeftArrow, 105),
    (Key::RightArrow, 106),
    (Key::End, 107),
    (Key::DownArrow, 108),
    (Key::PageDown, 109),
    (Key::Insert, 110),
    (Key::Delete, 111),
    (Key::Pause, 119),
    (Key::MetaLeft, 125),
    (Key::MetaRight, 126),
    (Key::Function, 464),
];

pub fn code_from_key(key: Key) -> Option<KeyCode> {
    KEY_TABLE
        .iter()
        .find(|(k, _)| *k == key)
        .map(|&(_, code)| code)
}

pub fn key_from_code(code: KeyCode) -> Option<Key> {
    KEY_TABLE
        .iter()
        .find(|(_, c)| *c == code)
        .map(|&(key, _)| key)
}

/// Code of the number-row key for `digit` (0..=9). Slot `n` is identified by `KEY_n`.
pub fn numeral_code(digit: usize) -> KeyCode {
    match digit % 10 {
        0 => KEY_0,
        n => KEY_1 + n as KeyCode - 1,
    }
}

/// Human readable name, falling back to the raw code.
pub fn key_name(code: KeyCode) -> String {
    match key_from_code(code) {
        Some(key) => format!("{:?}", key),
        None => format!("Code({})", code),
    }
}
