use anyhow::Result;
use keymac_lib::keycode::{numeral_code, KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTSHIFT};
use keymac_lib::{Engine, Event, KeyCode, MachineState, MacroChannel, Output, Player, Playback};
use std::io::Read;
use std::time::Duration;

const KEY_A: KeyCode = 30;
const KEY_B: KeyCode = 48;

#[derive(Default)]
struct Recorded {
    emitted: Vec<Event>,
    flushes: usize,
}

impl Output for Recorded {
    fn emit(&mut self, event: Event) -> Result<()> {
        self.emitted.push(event);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

fn tap(engine: &mut Engine, code: KeyCode) {
    engine.handle(Event::press(code));
    engine.handle(Event::release(code));
}

/// Arm combo down then up, starting a recording.
fn start_recording(engine: &mut Engine) {
    for code in [KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_LEFTALT] {
        engine.handle(Event::press(code));
    }
    for code in [KEY_LEFTALT, KEY_LEFTSHIFT, KEY_LEFTCTRL] {
        engine.handle(Event::release(code));
    }
}

/// Arm combo again to stop, then let go of it.
fn stop_recording(engine: &mut Engine) {
    for code in [KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_LEFTALT] {
        engine.handle(Event::press(code));
    }
    for code in [KEY_LEFTALT, KEY_LEFTSHIFT, KEY_LEFTCTRL] {
        engine.handle(Event::release(code));
    }
}

/// Presses and releases the identifier of `slot`, returning the playback it fires.
fn trigger(engine: &mut Engine, slot: usize) -> Option<Playback> {
    let keys = [KEY_LEFTCTRL, KEY_LEFTSHIFT, numeral_code(slot)];
    for code in keys {
        assert_eq!(engine.handle(Event::press(code)), None);
    }
    let mut fired = None;
    for code in keys.iter().rev() {
        fired = engine.handle(Event::release(*code)).or(fired);
    }
    fired
}

#[test]
fn test_record_then_replay() {
    let mut engine = Engine::default();
    start_recording(&mut engine);
    assert_eq!(engine.state(), MachineState::Recording);

    engine.handle(Event::press(KEY_LEFTSHIFT));
    tap(&mut engine, KEY_A);
    engine.handle(Event::release(KEY_LEFTSHIFT));
    tap(&mut engine, KEY_B);
    stop_recording(&mut engine);
    assert_eq!(engine.state(), MachineState::Idle);

    let slot = engine.store().slot(0).cloned().unwrap_or_default();
    assert_eq!(slot.identifier, [KEY_LEFTCTRL, KEY_LEFTSHIFT, numeral_code(0)]);
    assert_eq!(
        slot.events,
        vec![
            Event::press(KEY_LEFTSHIFT),
            Event::press(KEY_A),
            Event::release(KEY_A),
            Event::release(KEY_LEFTSHIFT),
            Event::press(KEY_B),
            Event::release(KEY_B),
        ]
    );

    let playback = trigger(&mut engine, 0).expect("slot 0 should fire");
    let mut player = Player::new(Recorded::default(), Duration::ZERO);
    player.play(&playback);
    assert_eq!(player.output().emitted, slot.events);
    assert_eq!(player.output().flushes, 2);
}

#[test]
fn test_slots_are_allocated_round_robin() {
    let mut engine = Engine::default();
    let mut used = Vec::new();
    for n in 0..11 {
        used.push(engine.store().cursor());
        start_recording(&mut engine);
        tap(&mut engine, KEY_A + n as KeyCode);
        stop_recording(&mut engine);
    }
    assert_eq!(used, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);

    // Slot 0 was overwritten by the eleventh session.
    let slot = engine.store().slot(0).cloned().unwrap_or_default();
    assert_eq!(slot.events, vec![Event::press(KEY_A + 10), Event::release(KEY_A + 10)]);
}

#[test]
fn test_no_playback_while_other_keys_remain_held() {
    let mut engine = Engine::default();
    engine.import(b"29 42 11 : 30 30\n");

    engine.handle(Event::press(KEY_LEFTCTRL));
    engine.handle(Event::press(KEY_LEFTSHIFT));
    engine.handle(Event::press(numeral_code(0)));
    engine.handle(Event::release(numeral_code(0)));
    engine.handle(Event::release(KEY_LEFTSHIFT));
    assert_eq!(engine.handle(Event::press(KEY_B)), None);
    assert_eq!(engine.handle(Event::release(KEY_B)), None);
    assert!(engine.handle(Event::release(KEY_LEFTCTRL)).is_some());
}

#[test]
fn test_listing_survives_export_and_import() {
    let mut engine = Engine::default();
    start_recording(&mut engine);
    engine.handle(Event::press(KEY_A));
    engine.handle(Event::press(KEY_B));
    engine.handle(Event::release(KEY_B));
    engine.handle(Event::release(KEY_A));
    stop_recording(&mut engine);

    let original = engine.store().slots().clone();
    let mut exporter = MacroChannel::new(engine.shared());
    let mut listing = Vec::new();
    exporter.read_to_end(&mut listing).unwrap();
    assert_eq!(listing, b"29 42 11 : 30 48 48 30 \n");

    let restored = Engine::default().shared();
    let importer = MacroChannel::new(restored.clone());
    assert_eq!(importer.write(&listing).unwrap(), listing.len());

    let restored = keymac_lib::engine::lock(&restored);
    assert_eq!(restored.store().slots(), &original);
    assert_eq!(restored.store().cursor(), 1);

    let playback = restored.playback(0).unwrap();
    let mut player = Player::new(Recorded::default(), Duration::ZERO);
    player.play(&playback);
    assert_eq!(player.output().flushes, 1);
}
