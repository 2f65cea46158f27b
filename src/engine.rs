use std::sync::{Arc, Mutex, MutexGuard};

use crate::event::Event;
use crate::machine::{MachineState, RecordingStateMachine};
use crate::protocol;
use crate::store::MacroStore;
use crate::tracker::{KeyPressTracker, TriggerKeys};

pub type SharedEngine = Arc<Mutex<Engine>>;

/// A copy of a slot's events, taken so emission can run without the engine lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    pub slot: usize,
    pub events: Vec<Event>,
}

/// Tracker, store and state machine behind a single lock.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    tracker: KeyPressTracker,
    store: MacroStore,
    machine: RecordingStateMachine,
}

impl Engine {
    pub fn new(triggers: TriggerKeys) -> Self {
        Self {
            tracker: KeyPressTracker::new(),
            store: MacroStore::new(),
            machine: RecordingStateMachine::new(triggers),
        }
    }

    pub fn shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    pub fn store(&self) -> &MacroStore {
        &self.store
    }

    pub fn state(&self) -> MachineState {
        self.machine.state()
    }

    /// Dispatches one raw key transition.
    pub fn handle(&mut self, event: Event) -> Option<Playback> {
        if !self.tracker.observe(event.code, event.pressed) {
            log::debug!("Too many keys held, dropping press of {}", event.code);
        }
        let combo = self.tracker.classify(self.machine.triggers(), &self.store);
        let slot = self.machine.step(&mut self.store, combo, event)?;
        log::info!("Running macro in slot {}", slot);
        self.playback(slot)
    }

    pub fn playback(&self, slot: usize) -> Option<Playback> {
        let events = self.store.slot(slot)?.events.clone();
        Some(Playback { slot, events })
    }

    /// Replaces every slot with a parsed listing.
    pub fn import(&mut self, listing: &[u8]) {
        protocol::decode(&mut self.store, listing);
        log::info!(
            "Imported {} macros, next recording goes to slot {}",
            self.store.recorded_count(),
            self.store.cursor()
        );
    }

    pub fn export(&self) -> String {
        protocol::encode(&self.store)
    }
}

/// Locks `mutex`, recovering the guard if a previous holder panicked.
pub fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Locks the engine. Every engine step leaves the store consistent, so a
/// panic elsewhere does not invalidate it.
pub fn lock(engine: &SharedEngine) -> MutexGuard<'_, Engine> {
    lock_or_recover(engine)
}
