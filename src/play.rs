use crate::engine::{lock_or_recover, Playback};
use crate::event::Event;
use anyhow::{anyhow, Result};
use rdev::simulate;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Where replayed events go.
pub trait Output {
    fn emit(&mut self, event: Event) -> Result<()>;
    /// Called each time the press/release balance returns to zero.
    fn flush(&mut self) -> Result<()>;
}

/// Events injected by playback that the listener will see again.
///
/// The player registers each event before injecting it; the listener drops
/// the first matching event it observes instead of handing it to the engine.
#[derive(Debug, Clone, Default)]
pub struct EchoFilter {
    expected: Arc<Mutex<VecDeque<Event>>>,
}

impl EchoFilter {
    /// Oldest echoes are forgotten past this many outstanding events.
    const CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&self, event: Event) {
        let mut expected = lock_or_recover(&self.expected);
        if expected.len() >= Self::CAPACITY {
            expected.pop_front();
        }
        expected.push_back(event);
    }

    /// Returns true and forgets the echo when `event` was injected by playback.
    pub fn take(&self, event: &Event) -> bool {
        let mut expected = lock_or_recover(&self.expected);
        match expected.iter().position(|e| e == event) {
            Some(pos) => {
                expected.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Replays events through an [`Output`], flushing each completed chord.
pub struct Player<O: Output> {
    output: O,
    settle_delay: Duration,
}

impl<O: Output> Player<O> {
    pub fn new(output: O, settle_delay: Duration) -> Self {
        Self {
            output,
            settle_delay,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn play(&mut self, playback: &Playback) {
        // Let the trigger keys settle before injecting anything.
        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }

        let mut balance: i64 = 0;
        for event in &playback.events {
            log::debug!("Playing Key : {} Status : {}", event.code, event.pressed);
            if let Err(e) = self.output.emit(*event) {
                log::error!("We could not send {:?}: {:?}", event, e);
            }
            balance += if event.pressed { 1 } else { -1 };
            if balance == 0 {
                if let Err(e) = self.output.flush() {
                    log::error!("Failed to flush playback of slot {}: {:?}", playback.slot, e);
                }
            }
        }

        if balance != 0 {
            log::warn!(
                "Slot {} ended with unbalanced keys (balance {})",
                playback.slot,
                balance
            );
        }
        log::info!("Playback of slot {} complete.", playback.slot);
    }
}

/// Injects events into the OS with `rdev::simulate`.
pub struct RdevOutput {
    echoes: EchoFilter,
    flush_delay: Duration,
}

impl RdevOutput {
    pub fn new(echoes: EchoFilter, flush_delay: Duration) -> Self {
        Self {
            echoes,
            flush_delay,
        }
    }
}

impl Output for RdevOutput {
    fn emit(&mut self, event: Event) -> Result<()> {
        let event_type = event
            .to_rdev()
            .ok_or_else(|| anyhow!("no key for code {}", event.code))?;
        self.echoes.expect(event);
        simulate(&event_type).map_err(|e| {
            // Nothing will come back for an event that was never injected.
            self.echoes.take(&event);
            anyhow!("simulate {:?}: {:?}", event_type, e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        // The OS needs a moment to register a chord before the next one.
        thread::sleep(self.flush_delay);
        Ok(())
    }
}

/// Starts the worker that plays requests one after another.
pub fn spawn_player<O>(output: O, settle_delay: Duration) -> (Sender<Playback>, JoinHandle<()>)
where
    O: Output + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Playback>();
    let handle = thread::spawn(move || {
        let mut player = Player::new(output, settle_delay);
        for playback in rx {
            player.play(&playback);
        }
        log::debug!("Playback worker stopped");
    });
    (tx, handle)
}
