//! Gamepad snapshot, slots and queries

use std::collections::VecDeque;
use std::ops::Sub;
use std::str::FromStr;

use bitflags::bitflags;
use enum_map::{Enum, EnumMap};
use glam::Vec2;

use super::buffer::{Controls, StateBuffer};
use crate::error::{InputError, ProviderError};

/// Number of controller slots tracked by the input manager
pub const MAX_GAMEPADS: usize = 4;

/// Controller slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Enum)]
pub enum PlayerIndex {
    One,
    Two,
    Three,
    Four,
}

impl PlayerIndex {
    /// Iterates over the slots in index order
    pub fn all() -> impl Iterator<Item = PlayerIndex> {
        (0..MAX_GAMEPADS).map(PlayerIndex::from_usize)
    }

    pub fn index(self) -> usize {
        self.into_usize()
    }
}

impl TryFrom<usize> for PlayerIndex {
    type Error = InputError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        if index < MAX_GAMEPADS {
            Ok(PlayerIndex::from_usize(index))
        } else {
            Err(InputError::invalid("gamepad slot", index.to_string()))
        }
    }
}

bitflags! {
    /// Set of gamepad buttons held in one snapshot
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u32 {
        const DPAD_UP = 1 << 0;
        const DPAD_DOWN = 1 << 1;
        const DPAD_LEFT = 1 << 2;
        const DPAD_RIGHT = 1 << 3;
        const START = 1 << 4;
        const BACK = 1 << 5;
        const LEFT_STICK = 1 << 6;
        const RIGHT_STICK = 1 << 7;
        const LEFT_SHOULDER = 1 << 8;
        const RIGHT_SHOULDER = 1 << 9;
        const BIG_BUTTON = 1 << 11;
        const A = 1 << 12;
        const B = 1 << 13;
        const X = 1 << 14;
        const Y = 1 << 15;
        const LEFT_TRIGGER = 1 << 23;
        const RIGHT_TRIGGER = 1 << 22;

        const DPAD = Self::DPAD_UP.bits()
            | Self::DPAD_DOWN.bits()
            | Self::DPAD_LEFT.bits()
            | Self::DPAD_RIGHT.bits();
    }
}

/// A single gamepad button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Start,
    Back,
    BigButton,
    LeftShoulder,
    RightShoulder,
    LeftStick,
    RightStick,
    LeftTrigger,
    RightTrigger,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl Button {
    /// The bit this button occupies in [`Buttons`]
    pub fn flag(self) -> Buttons {
        match self {
            Self::A => Buttons::A,
            Self::B => Buttons::B,
            Self::X => Buttons::X,
            Self::Y => Buttons::Y,
            Self::Start => Buttons::START,
            Self::Back => Buttons::BACK,
            Self::BigButton => Buttons::BIG_BUTTON,
            Self::LeftShoulder => Buttons::LEFT_SHOULDER,
            Self::RightShoulder => Buttons::RIGHT_SHOULDER,
            Self::LeftStick => Buttons::LEFT_STICK,
            Self::RightStick => Buttons::RIGHT_STICK,
            Self::LeftTrigger => Buttons::LEFT_TRIGGER,
            Self::RightTrigger => Buttons::RIGHT_TRIGGER,
            Self::DPadUp => Buttons::DPAD_UP,
            Self::DPadDown => Buttons::DPAD_DOWN,
            Self::DPadLeft => Buttons::DPAD_LEFT,
            Self::DPadRight => Buttons::DPAD_RIGHT,
        }
    }
}

impl FromStr for Button {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        (0..Button::LENGTH)
            .map(Button::from_usize)
            .find(|button| format!("{button:?}").eq_ignore_ascii_case(s))
            .ok_or_else(|| InputError::invalid("gamepad button", s))
    }
}

/// Direction on the digital pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum DPadDirection {
    Up,
    Down,
    Left,
    Right,
}

impl DPadDirection {
    fn flag(self) -> Buttons {
        match self {
            Self::Up => Buttons::DPAD_UP,
            Self::Down => Buttons::DPAD_DOWN,
            Self::Left => Buttons::DPAD_LEFT,
            Self::Right => Buttons::DPAD_RIGHT,
        }
    }
}

impl FromStr for DPadDirection {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        (0..DPadDirection::LENGTH)
            .map(DPadDirection::from_usize)
            .find(|dir| format!("{dir:?}").eq_ignore_ascii_case(s))
            .ok_or_else(|| InputError::invalid("d-pad direction", s))
    }
}

/// Four-way digital pad state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DPad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DPad {
    pub fn is_down(&self, direction: DPadDirection) -> bool {
        match direction {
            DPadDirection::Up => self.up,
            DPadDirection::Down => self.down,
            DPadDirection::Left => self.left,
            DPadDirection::Right => self.right,
        }
    }
}

/// Both analog sticks, each component in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThumbSticks {
    pub left: Vec2,
    pub right: Vec2,
}

impl ThumbSticks {
    /// Creates stick values, clamping each component to [-1, 1]
    pub fn new(left: Vec2, right: Vec2) -> Self {
        Self {
            left: left.clamp(Vec2::NEG_ONE, Vec2::ONE),
            right: right.clamp(Vec2::NEG_ONE, Vec2::ONE),
        }
    }
}

impl Sub for ThumbSticks {
    type Output = ThumbSticks;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            left: self.left - rhs.left,
            right: self.right - rhs.right,
        }
    }
}

/// Both analog triggers, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Triggers {
    pub left: f32,
    pub right: f32,
}

impl Triggers {
    /// Creates trigger values, clamping each to [0, 1]
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left: left.clamp(0.0, 1.0),
            right: right.clamp(0.0, 1.0),
        }
    }
}

impl Sub for Triggers {
    type Output = Triggers;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            left: self.left - rhs.left,
            right: self.right - rhs.right,
        }
    }
}

/// Gamepad state at one instant
///
/// The d-pad is kept in sync with the `DPAD_*` bits of the button set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadSnapshot {
    connected: bool,
    buttons: Buttons,
    sticks: ThumbSticks,
    triggers: Triggers,
    packet_number: u32,
}

impl GamepadSnapshot {
    /// A connected pad at rest
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    /// A pad that is not plugged in (same as the default snapshot)
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Builder method to set the held buttons (d-pad bits included)
    pub fn with_buttons(mut self, buttons: Buttons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Builder method to set the d-pad, replacing the `DPAD_*` bits
    pub fn with_dpad(mut self, dpad: DPad) -> Self {
        let mut bits = Buttons::empty();
        for (direction, held) in [
            (DPadDirection::Up, dpad.up),
            (DPadDirection::Down, dpad.down),
            (DPadDirection::Left, dpad.left),
            (DPadDirection::Right, dpad.right),
        ] {
            bits.set(direction.flag(), held);
        }
        self.buttons.remove(Buttons::DPAD);
        self.buttons.insert(bits);
        self
    }

    pub fn with_sticks(mut self, left: Vec2, right: Vec2) -> Self {
        self.sticks = ThumbSticks::new(left, right);
        self
    }

    pub fn with_triggers(mut self, left: f32, right: f32) -> Self {
        self.triggers = Triggers::new(left, right);
        self
    }

    pub fn with_packet_number(mut self, packet_number: u32) -> Self {
        self.packet_number = packet_number;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    pub fn is_button_down(&self, button: Button) -> bool {
        self.buttons.contains(button.flag())
    }

    pub fn dpad(&self) -> DPad {
        DPad {
            up: self.buttons.contains(Buttons::DPAD_UP),
            down: self.buttons.contains(Buttons::DPAD_DOWN),
            left: self.buttons.contains(Buttons::DPAD_LEFT),
            right: self.buttons.contains(Buttons::DPAD_RIGHT),
        }
    }

    pub fn sticks(&self) -> ThumbSticks {
        self.sticks
    }

    pub fn triggers(&self) -> Triggers {
        self.triggers
    }

    /// Counter bumped by the driver whenever the pad reports new data
    pub fn packet_number(&self) -> u32 {
        self.packet_number
    }
}

impl Controls<Button> for GamepadSnapshot {
    fn is_active(&self, control: Button) -> bool {
        self.is_button_down(control)
    }
}

impl Controls<DPadDirection> for GamepadSnapshot {
    fn is_active(&self, control: DPadDirection) -> bool {
        self.dpad().is_down(control)
    }
}

/// Source of gamepad snapshots, one poll per slot per tick
pub trait GamepadProvider {
    fn poll(&mut self, slot: PlayerIndex) -> Result<GamepadSnapshot, ProviderError>;
}

/// Gamepad provider that replays a fixed sequence per slot
///
/// Slots with an exhausted (or empty) script report a disconnected pad.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGamepads {
    scripts: EnumMap<PlayerIndex, VecDeque<GamepadSnapshot>>,
}

impl ScriptedGamepads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to script one slot
    pub fn with_slot(
        mut self,
        slot: PlayerIndex,
        script: impl IntoIterator<Item = GamepadSnapshot>,
    ) -> Self {
        self.scripts[slot].extend(script);
        self
    }
}

impl GamepadProvider for ScriptedGamepads {
    fn poll(&mut self, slot: PlayerIndex) -> Result<GamepadSnapshot, ProviderError> {
        Ok(self.scripts[slot].pop_front().unwrap_or_default())
    }
}

/// Double-buffered gamepad slot
pub type GamepadState = StateBuffer<GamepadSnapshot>;

impl StateBuffer<GamepadSnapshot> {
    pub fn connected(&self) -> bool {
        self.current().is_connected()
    }

    pub fn was_connected(&self) -> bool {
        self.previous().is_connected()
    }

    /// Connected now, disconnected on the previous tick
    pub fn just_connected(&self) -> bool {
        let (now, before) = self.pair(|s| s.is_connected());
        now && !before
    }

    /// Disconnected now, connected on the previous tick
    pub fn just_disconnected(&self) -> bool {
        let (now, before) = self.pair(|s| s.is_connected());
        !now && before
    }

    pub fn buttons(&self) -> Buttons {
        self.current().buttons()
    }

    pub fn was_buttons(&self) -> Buttons {
        self.previous().buttons()
    }

    pub fn dpad(&self) -> DPad {
        self.current().dpad()
    }

    pub fn was_dpad(&self) -> DPad {
        self.previous().dpad()
    }

    pub fn sticks(&self) -> ThumbSticks {
        self.current().sticks()
    }

    pub fn was_sticks(&self) -> ThumbSticks {
        self.previous().sticks()
    }

    /// Stick movement since the previous tick, per stick and per axis
    pub fn sticks_delta(&self) -> ThumbSticks {
        let (now, before) = self.pair(|s| s.sticks());
        now - before
    }

    pub fn left_stick(&self) -> Vec2 {
        self.sticks().left
    }

    pub fn right_stick(&self) -> Vec2 {
        self.sticks().right
    }

    pub fn left_stick_delta(&self) -> Vec2 {
        self.sticks_delta().left
    }

    pub fn right_stick_delta(&self) -> Vec2 {
        self.sticks_delta().right
    }

    pub fn triggers(&self) -> Triggers {
        self.current().triggers()
    }

    pub fn was_triggers(&self) -> Triggers {
        self.previous().triggers()
    }

    /// Trigger travel since the previous tick
    pub fn triggers_delta(&self) -> Triggers {
        let (now, before) = self.pair(|s| s.triggers());
        now - before
    }

    pub fn packet_number(&self) -> u32 {
        self.current().packet_number()
    }

    pub fn was_packet_number(&self) -> u32 {
        self.previous().packet_number()
    }
}
