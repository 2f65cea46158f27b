use crate::event::Event;
use crate::store::MacroStore;
use crate::tracker::{Combination, TriggerKeys};

/// Keystrokes of the stop gesture captured before the arm combo completes.
const STOP_GESTURE_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineState {
    #[default]
    Idle,
    /// Arm combo seen while idle; recording starts once every key is released.
    Armed,
    Recording,
}

/// Drives arming, recording and playback triggering from classified combinations.
#[derive(Debug, Clone, Default)]
pub struct RecordingStateMachine {
    triggers: TriggerKeys,
    state: MachineState,
    /// Slot whose identifier was held most recently. Fires once all keys are up.
    last_triggered: Option<usize>,
}

impl RecordingStateMachine {
    pub fn new(triggers: TriggerKeys) -> Self {
        Self {
            triggers,
            state: MachineState::Idle,
            last_triggered: None,
        }
    }

    pub fn triggers(&self) -> &TriggerKeys {
        &self.triggers
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == MachineState::Recording
    }

    pub fn last_triggered(&self) -> Option<usize> {
        self.last_triggered
    }

    /// Advances the machine by one event. Returns the slot to play, if any.
    pub fn step(&mut self, store: &mut MacroStore, combo: Combination, event: Event) -> Option<usize> {
        if combo == Combination::ArmCombo {
            if self.state == MachineState::Recording {
                self.finish_recording(store);
                return None;
            }
            self.state = MachineState::Armed;
        } else if self.state == MachineState::Armed && combo == Combination::NoneHeld {
            self.start_recording(store);
            return None;
        }

        if self.state == MachineState::Recording {
            store.current_mut().events.push(event);
        }

        if let Combination::SlotTrigger(index) = combo {
            log::debug!("Slot {} combination held", index);
            self.last_triggered = Some(index);
        }

        if combo == Combination::NoneHeld {
            return self.last_triggered.take();
        }
        None
    }

    fn start_recording(&mut self, store: &mut MacroStore) {
        self.state = MachineState::Recording;
        let slot = store.cursor();
        store.current_mut().events.clear();
        log::info!("Started recording into slot {}", slot);
    }

    fn finish_recording(&mut self, store: &mut MacroStore) {
        self.state = MachineState::Idle;
        let slot = store.cursor();
        let identifier = self.triggers.identifier_for(slot);

        let current = store.current_mut();
        let kept = current.events.len().saturating_sub(STOP_GESTURE_LEN);
        current.events.truncate(kept);
        current.identifier = identifier;
        for event in &current.events {
            log::debug!("Key : {} Status : {}", event.code, event.pressed);
        }
        log::info!(
            "Stopped recording slot {} ({} events), identifier {:?}",
            slot,
            kept,
            identifier
        );
        store.advance_cursor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_then_release_starts_recording() {
        let mut store = MacroStore::new();
        store.current_mut().events.push(Event::press(30));
        let mut machine = RecordingStateMachine::default();

        machine.step(&mut store, Combination::ArmCombo, Event::press(56));
        assert_eq!(machine.state(), MachineState::Armed);
        machine.step(&mut store, Combination::Other, Event::release(56));
        assert_eq!(machine.state(), MachineState::Armed);
        machine.step(&mut store, Combination::NoneHeld, Event::release(29));
        assert_eq!(machine.state(), MachineState::Recording);
        assert!(store.current_mut().events.is_empty());
    }

    #[test]
    fn test_nothing_recorded_while_idle() {
        let mut store = MacroStore::new();
        let mut machine = RecordingStateMachine::default();
        machine.step(&mut store, Combination::Other, Event::press(30));
        machine.step(&mut store, Combination::NoneHeld, Event::release(30));
        assert_eq!(store.recorded_count(), 0);
    }

    #[test]
    fn test_trigger_is_sticky_until_release() {
        let mut store = MacroStore::new();
        let mut machine = RecordingStateMachine::default();
        assert_eq!(machine.step(&mut store, Combination::SlotTrigger(2), Event::press(4)), None);
        assert_eq!(machine.step(&mut store, Combination::Other, Event::release(4)), None);
        assert_eq!(machine.last_triggered(), Some(2));
        assert_eq!(machine.step(&mut store, Combination::NoneHeld, Event::release(29)), Some(2));
        assert_eq!(machine.last_triggered(), None);
    }

    #[test]
    fn test_later_trigger_overwrites_earlier() {
        let mut store = MacroStore::new();
        let mut machine = RecordingStateMachine::default();
        machine.step(&mut store, Combination::SlotTrigger(1), Event::press(3));
        machine.step(&mut store, Combination::SlotTrigger(5), Event::press(7));
        assert_eq!(machine.step(&mut store, Combination::NoneHeld, Event::release(7)), Some(5));
    }

    #[test]
    fn test_stop_trims_gesture_and_assigns_identifier() {
        let mut store = MacroStore::new();
        let mut machine = RecordingStateMachine::default();
        machine.step(&mut store, Combination::ArmCombo, Event::press(42));
        machine.step(&mut store, Combination::NoneHeld, Event::release(42));

        machine.step(&mut store, Combination::Other, Event::press(30));
        machine.step(&mut store, Combination::NoneHeld, Event::release(30));
        machine.step(&mut store, Combination::Other, Event::press(29));
        machine.step(&mut store, Combination::Other, Event::press(42));
        machine.step(&mut store, Combination::ArmCombo, Event::press(56));

        assert_eq!(machine.state(), MachineState::Idle);
        let slot = store.slot(0).cloned().unwrap_or_default();
        assert_eq!(slot.events, vec![Event::press(30), Event::release(30)]);
        assert_eq!(slot.identifier, [29, 42, 11]);
        assert_eq!(store.cursor(), 1);
    }
}
