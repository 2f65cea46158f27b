//! Keyboard macro recorder and player.
//!
//! Hold the arm combo (left Ctrl + left Alt + left Shift by default) and let
//! go to start recording into the next slot; press the arm combo again to
//! stop. The slot is then bound to Ctrl + Shift + its number key, and
//! pressing and releasing that combination replays it.

pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod keycode;
pub mod machine;
pub mod play;
pub mod protocol;
pub mod record;
pub mod store;
pub mod tracker;

pub use channel::{MacroChannel, MAX_LISTING_SIZE};
pub use engine::{Engine, Playback, SharedEngine};
pub use error::ChannelError;
pub use event::{Event, KeyCode};
pub use machine::{MachineState, RecordingStateMachine};
pub use play::{EchoFilter, Output, Player};
pub use store::{MacroSlot, MacroStore, SLOT_COUNT};
pub use tracker::{Combination, KeyPressTracker, TriggerKeys};
