use crate::engine::{lock, Playback, SharedEngine};
use crate::event::{Event, KeyCode};
use crate::play::EchoFilter;
use anyhow::Result;
use rdev::listen;
use std::collections::HashSet;
use std::sync::mpsc::Sender;

/// Turns raw hook events into engine input.
///
/// Drops non-keyboard events, playback echoes, and auto-repeat presses of a
/// key that is already down.
pub struct InputFilter {
    echoes: EchoFilter,
    down: HashSet<KeyCode>,
}

impl InputFilter {
    pub fn new(echoes: EchoFilter) -> Self {
        Self {
            echoes,
            down: HashSet::new(),
        }
    }

    pub fn accept(&mut self, event_type: &rdev::EventType) -> Option<Event> {
        let event = Event::from_rdev(event_type)?;
        if self.echoes.take(&event) {
            return None;
        }
        if event.pressed {
            if !self.down.insert(event.code) {
                return None;
            }
        } else {
            self.down.remove(&event.code);
        }
        Some(event)
    }
}

/// Feeds the global keyboard hook into `engine`, handing playback requests to `player`.
///
/// Blocks for the lifetime of the hook.
pub fn listen_loop(engine: SharedEngine, player: Sender<Playback>, echoes: EchoFilter) -> Result<()> {
    let mut filter = InputFilter::new(echoes);
    listen(move |event| {
        let Some(event) = filter.accept(&event.event_type) else {
            return;
        };
        log::debug!("Key : {} Status : {}", event.code, event.pressed);

        // Release the lock before the playback is queued.
        let playback = lock(&engine).handle(event);
        if let Some(playback) = playback {
            if let Err(e) = player.send(playback) {
                log::error!("Playback worker is gone: {}", e);
            }
        }
    })
    .map_err(|e| anyhow::anyhow!("Listen error: {:?}", e))
}
