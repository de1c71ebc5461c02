//! Input layer health check

use crate::health::check::{CheckResult, SystemCheck};
use crate::input::{
    Button, Buttons, GamepadSnapshot, InputManager, Key, KeyboardSnapshot, MouseSnapshot,
    PlayerIndex, ScriptedGamepads, ScriptedProvider,
};

type Scenario = fn() -> Result<(), String>;

/// Drives a scripted input manager through the reference edge scenarios
pub struct InputCheck {
    scenarios: Vec<(&'static str, Scenario)>,
}

impl InputCheck {
    pub fn new() -> Self {
        Self {
            scenarios: vec![
                ("key press then release", key_press_release as Scenario),
                ("two-key chord", key_chord as Scenario),
                ("pad any-press / any-release", pad_any_edges as Scenario),
                ("pad hot-plug", pad_just_connected as Scenario),
                ("mouse scroll delta", mouse_scroll as Scenario),
            ],
        }
    }
}

impl Default for InputCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for InputCheck {
    fn name(&self) -> &'static str {
        "Input"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Replays scripted device input and verifies edge queries")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let mut failures = 0;

        for (name, scenario) in &self.scenarios {
            match scenario() {
                Ok(()) => details.push(format!("  ✓ {name}")),
                Err(reason) => {
                    details.push(format!("  ✗ {name}: {reason}"));
                    failures += 1;
                }
            }
        }

        let result = if failures == 0 {
            CheckResult::pass(format!("{} scenarios passed", self.scenarios.len()))
        } else {
            CheckResult::fail(format!("{failures} of {} scenarios failed", self.scenarios.len()))
        };
        result.with_detail_lines(&details)
    }
}

fn tick(manager: &mut InputManager) -> Result<(), String> {
    manager.update().map_err(|e| e.to_string())
}

fn key_press_release() -> Result<(), String> {
    let mut input = InputManager::new().with_keyboard(ScriptedProvider::new([
        KeyboardSnapshot::with_keys([Key::A]),
        KeyboardSnapshot::default(),
    ]));

    tick(&mut input)?;
    check(1, "pressed(A)", input.keyboard().pressed(Key::A), true)?;
    tick(&mut input)?;
    check(2, "released(A)", input.keyboard().released(Key::A), true)?;
    check(2, "pressed(A)", input.keyboard().pressed(Key::A), false)
}

fn key_chord() -> Result<(), String> {
    let mut input = InputManager::new().with_keyboard(ScriptedProvider::new([
        KeyboardSnapshot::with_keys([Key::A, Key::B]),
        KeyboardSnapshot::with_keys([Key::A]),
    ]));
    let chord = [Key::A, Key::B];

    tick(&mut input)?;
    check(1, "all_pressed(A, B)", input.keyboard().all_pressed(&chord), true)?;
    check(1, "all_released(A, B)", input.keyboard().all_released(&chord), false)?;
    tick(&mut input)?;
    check(2, "all_pressed(A, B)", input.keyboard().all_pressed(&chord), false)?;
    check(2, "all_released(A, B)", input.keyboard().all_released(&chord), false)
}

fn pad_any_edges() -> Result<(), String> {
    let held = |buttons| GamepadSnapshot::connected().with_buttons(buttons);
    let mut input = InputManager::new().with_gamepads(ScriptedGamepads::new().with_slot(
        PlayerIndex::One,
        [held(Buttons::A), held(Buttons::A | Buttons::B), held(Buttons::A)],
    ));
    let pair = [Button::A, Button::B];

    let expected = [(true, false), (true, false), (false, true)];
    for (n, (pressed, released)) in expected.into_iter().enumerate() {
        tick(&mut input)?;
        let pad = input.pad(PlayerIndex::One);
        check(n + 1, "any_pressed(A, B)", pad.any_pressed(&pair), pressed)?;
        check(n + 1, "any_released(A, B)", pad.any_released(&pair), released)?;
    }
    Ok(())
}

fn pad_just_connected() -> Result<(), String> {
    let mut input = InputManager::new().with_gamepads(ScriptedGamepads::new().with_slot(
        PlayerIndex::One,
        [
            GamepadSnapshot::disconnected(),
            GamepadSnapshot::connected(),
            GamepadSnapshot::connected(),
        ],
    ));

    for (n, expected) in [false, true, false].into_iter().enumerate() {
        tick(&mut input)?;
        check(n + 1, "just_connected", input.pad(PlayerIndex::One).just_connected(), expected)?;
    }
    Ok(())
}

fn mouse_scroll() -> Result<(), String> {
    let mut input = InputManager::new().with_mouse(ScriptedProvider::new(
        [0, 120, 90].map(|s| MouseSnapshot::default().with_scroll(s)),
    ));

    for (n, expected) in [0, 120, -30].into_iter().enumerate() {
        tick(&mut input)?;
        check(n + 1, "scroll_delta", input.mouse().scroll_delta(), expected)?;
    }
    Ok(())
}

/// Fails the scenario with the tick number when an expectation does not hold
fn check<T: PartialEq + std::fmt::Debug>(
    at: usize,
    what: &str,
    actual: T,
    expected: T,
) -> Result<(), String> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("tick {at}: {what} was {actual:?}, expected {expected:?}"))
    }
}
