//! Aggregator owning one wrapper per device

use enum_map::EnumMap;
use tracing::{debug, trace};

use super::device::{Device, DeviceKind, Provider, advance_from};
use super::gamepad::{GamepadProvider, GamepadState, PlayerIndex};
use super::keyboard::{KeyboardSnapshot, KeyboardState};
use super::mouse::{MouseSnapshot, MouseState};
use super::touch::{TouchProvider, TouchState};
use crate::error::InputError;

/// Keyboard, mouse, four gamepad slots and the touch panel, advanced together
///
/// Call [`update`](Self::update) exactly once per frame, before reading any
/// queries for that frame.
pub struct InputManager {
    keyboard: Device<KeyboardSnapshot>,
    mouse: Device<MouseSnapshot>,
    gamepad_provider: Option<Box<dyn GamepadProvider>>,
    pads: EnumMap<PlayerIndex, GamepadState>,
    touch: TouchState,
    tick: u64,
}

impl InputManager {
    /// Creates a manager with no providers; every device stays idle
    pub fn new() -> Self {
        Self {
            keyboard: Device::new(DeviceKind::Keyboard, None),
            mouse: Device::new(DeviceKind::Mouse, None),
            gamepad_provider: None,
            pads: EnumMap::default(),
            touch: TouchState::default(),
            tick: 0,
        }
    }

    /// Builder method to attach a keyboard provider
    pub fn with_keyboard(mut self, provider: impl Provider<KeyboardSnapshot> + 'static) -> Self {
        self.keyboard = Device::new(DeviceKind::Keyboard, Some(Box::new(provider)));
        self
    }

    /// Builder method to attach a mouse provider
    pub fn with_mouse(mut self, provider: impl Provider<MouseSnapshot> + 'static) -> Self {
        self.mouse = Device::new(DeviceKind::Mouse, Some(Box::new(provider)));
        self
    }

    /// Builder method to attach a provider serving all four gamepad slots
    pub fn with_gamepads(mut self, provider: impl GamepadProvider + 'static) -> Self {
        self.gamepad_provider = Some(Box::new(provider));
        self
    }

    /// Builder method to attach a touch panel provider
    pub fn with_touch(mut self, provider: impl TouchProvider + 'static) -> Self {
        self.touch = TouchState::new(Some(Box::new(provider)));
        self
    }

    /// Logs which devices have a provider attached
    pub fn log_devices(&self) {
        debug!(
            keyboard = self.keyboard.has_provider(),
            mouse = self.mouse.has_provider(),
            gamepads = self.gamepad_provider.is_some(),
            touch = self.touch.has_provider(),
            "Input manager ready"
        );
    }

    /// Advances every device by one tick
    ///
    /// Order is keyboard, mouse, gamepad slots One to Four, touch. The first
    /// provider failure stops the tick and is returned; devices after it keep
    /// their previous state.
    pub fn update(&mut self) -> Result<(), InputError> {
        self.keyboard.update()?;
        self.mouse.update()?;
        self.update_pads()?;
        self.touch.update()?;

        self.tick += 1;
        trace!(tick = self.tick, "Input tick");
        Ok(())
    }

    fn update_pads(&mut self) -> Result<(), InputError> {
        let Some(provider) = self.gamepad_provider.as_mut() else {
            return Ok(());
        };

        for slot in PlayerIndex::all() {
            let pad = &mut self.pads[slot];
            advance_from(DeviceKind::Gamepad(slot), pad, || provider.poll(slot))?;

            if pad.just_connected() {
                debug!(slot = ?slot, "Gamepad connected");
            } else if pad.just_disconnected() {
                debug!(slot = ?slot, "Gamepad disconnected");
            }
        }
        Ok(())
    }

    pub fn keyboard(&self) -> &KeyboardState {
        self.keyboard.state()
    }

    pub fn mouse(&self) -> &MouseState {
        self.mouse.state()
    }

    pub fn pad(&self, slot: PlayerIndex) -> &GamepadState {
        &self.pads[slot]
    }

    /// Gamepad slot by numeric index (0..4)
    pub fn pad_at(&self, index: usize) -> Result<&GamepadState, InputError> {
        Ok(self.pad(PlayerIndex::try_from(index)?))
    }

    /// All slots in index order
    pub fn pads(&self) -> impl Iterator<Item = (PlayerIndex, &GamepadState)> {
        self.pads.iter()
    }

    pub fn touch(&self) -> &TouchState {
        &self.touch
    }

    /// Mutable touch access for the capability setters and the gesture queue
    pub fn touch_mut(&mut self) -> &mut TouchState {
        &mut self.touch
    }

    /// Number of completed updates
    pub fn tick_count(&self) -> u64 {
        self.tick
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ProviderError;
    use crate::input::{
        Button, GamepadSnapshot, Key, MouseButton, ScriptedGamepads, ScriptedProvider,
        ScriptedTouch, TouchPhase, TouchPoint, TouchSnapshot,
    };

    /// Records the order in which devices are polled
    #[derive(Clone, Default)]
    struct PollLog(Rc<RefCell<Vec<String>>>);

    impl PollLog {
        fn push(&self, entry: impl Into<String>) {
            self.0.borrow_mut().push(entry.into());
        }
    }

    struct LoggedKeyboard(PollLog);

    impl Provider<KeyboardSnapshot> for LoggedKeyboard {
        fn poll(&mut self) -> Result<KeyboardSnapshot, ProviderError> {
            self.0.push("keyboard");
            Ok(KeyboardSnapshot::default())
        }
    }

    struct LoggedMouse(PollLog);

    impl Provider<MouseSnapshot> for LoggedMouse {
        fn poll(&mut self) -> Result<MouseSnapshot, ProviderError> {
            self.0.push("mouse");
            Ok(MouseSnapshot::default())
        }
    }

    struct LoggedPads(PollLog);

    impl GamepadProvider for LoggedPads {
        fn poll(&mut self, slot: PlayerIndex) -> Result<GamepadSnapshot, ProviderError> {
            self.0.push(format!("pad {}", slot.index()));
            Ok(GamepadSnapshot::default())
        }
    }

    struct BrokenPads;

    impl GamepadProvider for BrokenPads {
        fn poll(&mut self, slot: PlayerIndex) -> Result<GamepadSnapshot, ProviderError> {
            if slot == PlayerIndex::Three {
                Err("slot three unplugged mid-read".into())
            } else {
                Ok(GamepadSnapshot::connected())
            }
        }
    }

    #[test]
    fn test_update_order() {
        let log = PollLog::default();
        let mut manager = InputManager::new()
            .with_mouse(LoggedMouse(log.clone()))
            .with_gamepads(LoggedPads(log.clone()))
            .with_keyboard(LoggedKeyboard(log.clone()));

        manager.update().unwrap();
        assert_eq!(
            *log.0.borrow(),
            ["keyboard", "mouse", "pad 0", "pad 1", "pad 2", "pad 3"]
        );
        assert_eq!(manager.tick_count(), 1);
    }

    #[test]
    fn test_without_providers_everything_is_idle() {
        let mut manager = InputManager::default();
        manager.update().unwrap();
        manager.update().unwrap();

        assert!(manager.keyboard().up(Key::Space));
        assert!(!manager.mouse().down(MouseButton::Left));
        assert_eq!(manager.mouse().scroll_delta(), 0);
        assert!(manager.pads().all(|(_, pad)| !pad.connected()));
        assert!(manager.touch().points().is_empty());
        assert_eq!(manager.tick_count(), 2);
    }

    #[test]
    fn test_devices_advance_together() {
        let mut manager = InputManager::new()
            .with_keyboard(ScriptedProvider::new([
                KeyboardSnapshot::with_keys([Key::W]),
                KeyboardSnapshot::default(),
            ]))
            .with_mouse(ScriptedProvider::new([
                MouseSnapshot::at(5, 5).with_buttons([MouseButton::Right]),
                MouseSnapshot::at(8, 1),
            ]))
            .with_gamepads(ScriptedGamepads::new().with_slot(
                PlayerIndex::Two,
                [
                    GamepadSnapshot::connected(),
                    GamepadSnapshot::connected().with_buttons(Button::Start.flag()),
                ],
            ))
            .with_touch(ScriptedTouch::new([TouchSnapshot::new([TouchPoint::new(
                7,
                glam::Vec2::new(1.0, 2.0),
                TouchPhase::Pressed,
            )])]));

        manager.update().unwrap();
        assert!(manager.keyboard().pressed(Key::W));
        assert!(manager.mouse().pressed(MouseButton::Right));
        assert!(manager.pad(PlayerIndex::Two).just_connected());
        assert!(!manager.pad(PlayerIndex::One).connected());
        assert_eq!(manager.touch().points().len(), 1);

        manager.update().unwrap();
        assert!(manager.keyboard().released(Key::W));
        assert!(manager.mouse().released(MouseButton::Right));
        assert_eq!(manager.mouse().position_delta(), glam::IVec2::new(3, -4));
        assert!(manager.pad_at(1).unwrap().pressed(Button::Start));
        assert_eq!(manager.touch().ended().count(), 1);
    }

    #[test]
    fn test_pad_at_rejects_out_of_range() {
        let manager = InputManager::new();
        assert!(manager.pad_at(3).is_ok());
        let err = manager.pad_at(4).unwrap_err();
        assert!(matches!(err, InputError::InvalidArgument { .. }));
    }

    #[test]
    fn test_provider_failure_stops_tick() {
        let mut manager = InputManager::new()
            .with_gamepads(BrokenPads)
            .with_touch(ScriptedTouch::new([TouchSnapshot::new([TouchPoint::new(
                1,
                glam::Vec2::ZERO,
                TouchPhase::Pressed,
            )])]));

        let err = manager.update().unwrap_err();
        assert!(matches!(
            err,
            InputError::Provider {
                device: DeviceKind::Gamepad(PlayerIndex::Three),
                ..
            }
        ));
        assert!(manager.pad(PlayerIndex::Two).connected());
        assert!(!manager.pad(PlayerIndex::Three).connected());
        assert!(manager.touch().points().is_empty());
        assert_eq!(manager.tick_count(), 0);
    }
}
