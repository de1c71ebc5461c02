//! Keyboard snapshot and queries

use std::str::FromStr;

use enum_map::{Enum, EnumMap};

use super::buffer::{Controls, StateBuffer};
use crate::error::InputError;

/// Keyboard key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Enum)]
pub enum Key {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Number row
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    D8,
    D9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Arrows
    Left,
    Right,
    Up,
    Down,

    // Editing and navigation
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    PrintScreen,
    Pause,

    // Modifiers
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    LeftSuper,
    RightSuper,

    // Locks
    CapsLock,
    NumLock,
    ScrollLock,

    // Numpad
    NumPad0,
    NumPad1,
    NumPad2,
    NumPad3,
    NumPad4,
    NumPad5,
    NumPad6,
    NumPad7,
    NumPad8,
    NumPad9,
    Add,
    Subtract,
    Multiply,
    Divide,
    Decimal,
    NumPadEnter,

    // Punctuation
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    Backquote,
}

impl Key {
    /// Iterates over every key in declaration order
    pub fn all() -> impl Iterator<Item = Key> {
        (0..Key::LENGTH).map(Key::from_usize)
    }
}

impl FromStr for Key {
    type Err = InputError;

    /// Parses a key by its variant name, ignoring ASCII case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::all()
            .find(|key| format!("{key:?}").eq_ignore_ascii_case(s))
            .ok_or_else(|| InputError::invalid("key", s))
    }
}

/// Convert from winit physical key code
impl TryFrom<winit::keyboard::KeyCode> for Key {
    type Error = InputError;

    fn try_from(key: winit::keyboard::KeyCode) -> Result<Self, Self::Error> {
        use winit::keyboard::KeyCode as WK;
        let key = match key {
            WK::KeyA => Self::A,
            WK::KeyB => Self::B,
            WK::KeyC => Self::C,
            WK::KeyD => Self::D,
            WK::KeyE => Self::E,
            WK::KeyF => Self::F,
            WK::KeyG => Self::G,
            WK::KeyH => Self::H,
            WK::KeyI => Self::I,
            WK::KeyJ => Self::J,
            WK::KeyK => Self::K,
            WK::KeyL => Self::L,
            WK::KeyM => Self::M,
            WK::KeyN => Self::N,
            WK::KeyO => Self::O,
            WK::KeyP => Self::P,
            WK::KeyQ => Self::Q,
            WK::KeyR => Self::R,
            WK::KeyS => Self::S,
            WK::KeyT => Self::T,
            WK::KeyU => Self::U,
            WK::KeyV => Self::V,
            WK::KeyW => Self::W,
            WK::KeyX => Self::X,
            WK::KeyY => Self::Y,
            WK::KeyZ => Self::Z,

            WK::Digit0 => Self::D0,
            WK::Digit1 => Self::D1,
            WK::Digit2 => Self::D2,
            WK::Digit3 => Self::D3,
            WK::Digit4 => Self::D4,
            WK::Digit5 => Self::D5,
            WK::Digit6 => Self::D6,
            WK::Digit7 => Self::D7,
            WK::Digit8 => Self::D8,
            WK::Digit9 => Self::D9,

            WK::F1 => Self::F1,
            WK::F2 => Self::F2,
            WK::F3 => Self::F3,
            WK::F4 => Self::F4,
            WK::F5 => Self::F5,
            WK::F6 => Self::F6,
            WK::F7 => Self::F7,
            WK::F8 => Self::F8,
            WK::F9 => Self::F9,
            WK::F10 => Self::F10,
            WK::F11 => Self::F11,
            WK::F12 => Self::F12,

            WK::ArrowLeft => Self::Left,
            WK::ArrowRight => Self::Right,
            WK::ArrowUp => Self::Up,
            WK::ArrowDown => Self::Down,

            WK::Space => Self::Space,
            WK::Enter => Self::Enter,
            WK::Escape => Self::Escape,
            WK::Backspace => Self::Backspace,
            WK::Tab => Self::Tab,
            WK::Insert => Self::Insert,
            WK::Delete => Self::Delete,
            WK::Home => Self::Home,
            WK::End => Self::End,
            WK::PageUp => Self::PageUp,
            WK::PageDown => Self::PageDown,
            WK::PrintScreen => Self::PrintScreen,
            WK::Pause => Self::Pause,

            WK::ShiftLeft => Self::LeftShift,
            WK::ShiftRight => Self::RightShift,
            WK::ControlLeft => Self::LeftControl,
            WK::ControlRight => Self::RightControl,
            WK::AltLeft => Self::LeftAlt,
            WK::AltRight => Self::RightAlt,
            WK::SuperLeft => Self::LeftSuper,
            WK::SuperRight => Self::RightSuper,

            WK::CapsLock => Self::CapsLock,
            WK::NumLock => Self::NumLock,
            WK::ScrollLock => Self::ScrollLock,

            WK::Numpad0 => Self::NumPad0,
            WK::Numpad1 => Self::NumPad1,
            WK::Numpad2 => Self::NumPad2,
            WK::Numpad3 => Self::NumPad3,
            WK::Numpad4 => Self::NumPad4,
            WK::Numpad5 => Self::NumPad5,
            WK::Numpad6 => Self::NumPad6,
            WK::Numpad7 => Self::NumPad7,
            WK::Numpad8 => Self::NumPad8,
            WK::Numpad9 => Self::NumPad9,
            WK::NumpadAdd => Self::Add,
            WK::NumpadSubtract => Self::Subtract,
            WK::NumpadMultiply => Self::Multiply,
            WK::NumpadDivide => Self::Divide,
            WK::NumpadDecimal => Self::Decimal,
            WK::NumpadEnter => Self::NumPadEnter,

            WK::Minus => Self::Minus,
            WK::Equal => Self::Equal,
            WK::BracketLeft => Self::BracketLeft,
            WK::BracketRight => Self::BracketRight,
            WK::Backslash => Self::Backslash,
            WK::Semicolon => Self::Semicolon,
            WK::Quote => Self::Quote,
            WK::Comma => Self::Comma,
            WK::Period => Self::Period,
            WK::Slash => Self::Slash,
            WK::Backquote => Self::Backquote,

            other => return Err(InputError::invalid("key", format!("{other:?}"))),
        };
        Ok(key)
    }
}

/// Modifier keys that come in a left/right pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Shift,
    Control,
    Alt,
    /// Windows / Command / Meta key
    Super,
}

impl Modifier {
    /// The left and right keys for this modifier
    pub fn keys(self) -> [Key; 2] {
        match self {
            Self::Shift => [Key::LeftShift, Key::RightShift],
            Self::Control => [Key::LeftControl, Key::RightControl],
            Self::Alt => [Key::LeftAlt, Key::RightAlt],
            Self::Super => [Key::LeftSuper, Key::RightSuper],
        }
    }
}

/// Keyboard modifiers held in one snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Lock keys whose on/off state is reported separately from the key itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    CapsLock,
    NumLock,
}

/// Keyboard state at one instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyboardSnapshot {
    keys: EnumMap<Key, bool>,
    caps_lock: bool,
    num_lock: bool,
}

impl KeyboardSnapshot {
    /// Snapshot with the given keys held and both locks off
    pub fn with_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        let mut snapshot = Self::default();
        for key in keys {
            snapshot.keys[key] = true;
        }
        snapshot
    }

    /// Builder method to set the caps lock state
    pub fn with_caps_lock(mut self, on: bool) -> Self {
        self.caps_lock = on;
        self
    }

    /// Builder method to set the num lock state
    pub fn with_num_lock(mut self, on: bool) -> Self {
        self.num_lock = on;
        self
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys[key]
    }

    pub fn toggle(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::CapsLock => self.caps_lock,
            Toggle::NumLock => self.num_lock,
        }
    }

    /// Keys held in this snapshot, in declaration order
    pub fn pressed_keys(&self) -> Vec<Key> {
        self.keys
            .iter()
            .filter_map(|(key, &down)| down.then_some(key))
            .collect()
    }

    /// Summary of the modifier pairs (either side counts)
    pub fn modifiers(&self) -> Modifiers {
        let held = |m: Modifier| m.keys().iter().any(|&k| self.keys[k]);
        Modifiers {
            shift: held(Modifier::Shift),
            ctrl: held(Modifier::Control),
            alt: held(Modifier::Alt),
            meta: held(Modifier::Super),
        }
    }

    pub(crate) fn set_key(&mut self, key: Key, down: bool) {
        self.keys[key] = down;
    }

    pub(crate) fn set_toggle(&mut self, toggle: Toggle, on: bool) {
        match toggle {
            Toggle::CapsLock => self.caps_lock = on,
            Toggle::NumLock => self.num_lock = on,
        }
    }
}

impl Controls<Key> for KeyboardSnapshot {
    fn is_active(&self, control: Key) -> bool {
        self.keys[control]
    }
}

/// Double-buffered keyboard
pub type KeyboardState = StateBuffer<KeyboardSnapshot>;

impl StateBuffer<KeyboardSnapshot> {
    /// Either side of the modifier is held now
    pub fn modifier_down(&self, modifier: Modifier) -> bool {
        self.any_down(&modifier.keys())
    }

    /// Neither side of the modifier is held now
    pub fn modifier_up(&self, modifier: Modifier) -> bool {
        self.all_up(&modifier.keys())
    }

    /// One side of the modifier went down this tick
    pub fn modifier_pressed(&self, modifier: Modifier) -> bool {
        self.any_pressed(&modifier.keys())
    }

    /// Both sides of the modifier went up during this same tick
    ///
    /// Note the asymmetry with [`modifier_pressed`](Self::modifier_pressed):
    /// letting go of one side while the other was already up does not count.
    pub fn modifier_released(&self, modifier: Modifier) -> bool {
        self.all_released(&modifier.keys())
    }

    pub fn was_modifier_down(&self, modifier: Modifier) -> bool {
        self.was_any_down(&modifier.keys())
    }

    pub fn was_modifier_up(&self, modifier: Modifier) -> bool {
        self.was_all_up(&modifier.keys())
    }

    pub fn shift_pressed(&self) -> bool {
        self.modifier_pressed(Modifier::Shift)
    }

    pub fn ctrl_pressed(&self) -> bool {
        self.modifier_pressed(Modifier::Control)
    }

    pub fn alt_pressed(&self) -> bool {
        self.modifier_pressed(Modifier::Alt)
    }

    pub fn meta_pressed(&self) -> bool {
        self.modifier_pressed(Modifier::Super)
    }

    pub fn shift_released(&self) -> bool {
        self.modifier_released(Modifier::Shift)
    }

    pub fn ctrl_released(&self) -> bool {
        self.modifier_released(Modifier::Control)
    }

    pub fn alt_released(&self) -> bool {
        self.modifier_released(Modifier::Alt)
    }

    pub fn meta_released(&self) -> bool {
        self.modifier_released(Modifier::Super)
    }

    /// Modifiers held now
    pub fn modifiers(&self) -> Modifiers {
        self.current().modifiers()
    }

    /// Modifiers held on the previous tick
    pub fn was_modifiers(&self) -> Modifiers {
        self.previous().modifiers()
    }

    /// Toggle is on now
    pub fn toggle_on(&self, toggle: Toggle) -> bool {
        self.current().toggle(toggle)
    }

    /// Toggle is off now
    pub fn toggle_off(&self, toggle: Toggle) -> bool {
        !self.current().toggle(toggle)
    }

    /// Toggle switched on this tick
    pub fn toggle_enter(&self, toggle: Toggle) -> bool {
        let (now, before) = self.pair(|s| s.toggle(toggle));
        now && !before
    }

    /// Toggle switched off this tick
    pub fn toggle_exit(&self, toggle: Toggle) -> bool {
        let (now, before) = self.pair(|s| s.toggle(toggle));
        !now && before
    }

    pub fn was_toggle_on(&self, toggle: Toggle) -> bool {
        self.previous().toggle(toggle)
    }

    pub fn was_toggle_off(&self, toggle: Toggle) -> bool {
        !self.previous().toggle(toggle)
    }

    pub fn caps_lock_enter(&self) -> bool {
        self.toggle_enter(Toggle::CapsLock)
    }

    pub fn caps_lock_exit(&self) -> bool {
        self.toggle_exit(Toggle::CapsLock)
    }

    pub fn num_lock_enter(&self) -> bool {
        self.toggle_enter(Toggle::NumLock)
    }

    pub fn num_lock_exit(&self) -> bool {
        self.toggle_exit(Toggle::NumLock)
    }

    /// Keys held now
    pub fn pressed_keys(&self) -> Vec<Key> {
        self.current().pressed_keys()
    }

    /// Keys held on the previous tick
    pub fn was_pressed_keys(&self) -> Vec<Key> {
        self.previous().pressed_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard(script: impl IntoIterator<Item = KeyboardSnapshot>) -> KeyboardState {
        let mut state = KeyboardState::new();
        for snapshot in script {
            state.advance(snapshot);
        }
        state
    }

    fn keys<const N: usize>(keys: [Key; N]) -> KeyboardSnapshot {
        KeyboardSnapshot::with_keys(keys)
    }

    #[test]
    fn test_press_then_release() {
        let mut state = keyboard([keys([Key::A])]);
        assert!(state.pressed(Key::A));
        assert!(state.down(Key::A));

        state.advance(KeyboardSnapshot::default());
        assert!(state.released(Key::A));
        assert!(!state.pressed(Key::A));
        assert!(state.up(Key::A));
    }

    #[test]
    fn test_press_resets_while_key_held() {
        let state = keyboard([keys([Key::A]), keys([Key::A])]);
        assert!(!state.pressed(Key::A));
        assert!(state.down(Key::A));
        assert!(state.was_down(Key::A));
    }

    #[test]
    fn test_shift_pressed_by_either_side() {
        let mut state = keyboard([keys([Key::LeftShift])]);
        assert!(state.shift_pressed());
        assert!(state.modifier_down(Modifier::Shift));

        state.advance(keys([Key::RightShift]));
        assert!(state.shift_pressed());

        state.advance(keys([Key::LeftShift, Key::RightShift]));
        assert!(state.shift_pressed());

        state.advance(KeyboardSnapshot::default());
        assert!(!state.shift_pressed());
        assert!(state.shift_released());
        assert!(state.modifier_up(Modifier::Shift));
    }

    #[test]
    fn test_modifier_release_needs_both_sides() {
        // Right side lets go while left was never held: not a shift release
        let state = keyboard([keys([Key::RightShift]), KeyboardSnapshot::default()]);
        assert!(!state.shift_released());
        assert!(state.released(Key::RightShift));

        let state = keyboard([
            keys([Key::LeftControl, Key::RightControl]),
            KeyboardSnapshot::default(),
        ]);
        assert!(state.ctrl_released());
    }

    #[test]
    fn test_alt_and_meta() {
        let state = keyboard([keys([Key::LeftAlt, Key::RightSuper])]);
        assert!(state.alt_pressed());
        assert!(state.meta_pressed());
        assert!(!state.ctrl_pressed());
        assert!(state.was_modifier_up(Modifier::Alt));
        assert!(!state.was_modifier_down(Modifier::Super));
        assert_eq!(
            state.modifiers(),
            Modifiers {
                shift: false,
                ctrl: false,
                alt: true,
                meta: true,
            }
        );
        assert_eq!(state.was_modifiers(), Modifiers::default());
    }

    #[test]
    fn test_caps_lock_transitions() {
        let on = KeyboardSnapshot::default().with_caps_lock(true);
        let mut state = keyboard([on.clone()]);
        assert!(state.caps_lock_enter());
        assert!(state.toggle_on(Toggle::CapsLock));

        state.advance(on);
        assert!(!state.caps_lock_enter());
        assert!(state.toggle_on(Toggle::CapsLock));
        assert!(state.was_toggle_on(Toggle::CapsLock));

        state.advance(KeyboardSnapshot::default());
        assert!(!state.caps_lock_enter());
        assert!(state.caps_lock_exit());
        assert!(state.toggle_off(Toggle::CapsLock));
    }

    #[test]
    fn test_num_lock_transitions() {
        let on = KeyboardSnapshot::default().with_num_lock(true);
        let mut state = keyboard([on.clone(), on]);
        assert!(!state.num_lock_enter());
        assert!(state.toggle_on(Toggle::NumLock));
        assert!(!state.toggle_on(Toggle::CapsLock));

        state.advance(KeyboardSnapshot::default());
        assert!(state.num_lock_exit());
        assert!(state.toggle_off(Toggle::NumLock));
        assert!(!state.was_toggle_off(Toggle::NumLock));
    }

    #[test]
    fn test_pressed_keys_listing() {
        let state = keyboard([keys([Key::Z, Key::A]), keys([Key::Space])]);
        assert_eq!(state.pressed_keys(), vec![Key::Space]);
        assert_eq!(state.was_pressed_keys(), vec![Key::A, Key::Z]);
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!("a".parse::<Key>().unwrap(), Key::A);
        assert_eq!("LeftShift".parse::<Key>().unwrap(), Key::LeftShift);
        assert_eq!("numpad7".parse::<Key>().unwrap(), Key::NumPad7);

        let err = "Hyper".parse::<Key>().unwrap_err();
        assert!(matches!(err, InputError::InvalidArgument { kind: "key", .. }));
    }

    #[test]
    fn test_key_from_winit() {
        use winit::keyboard::KeyCode as WK;
        assert_eq!(Key::try_from(WK::KeyQ).unwrap(), Key::Q);
        assert_eq!(Key::try_from(WK::ShiftRight).unwrap(), Key::RightShift);
        assert_eq!(Key::try_from(WK::NumpadEnter).unwrap(), Key::NumPadEnter);
        assert!(Key::try_from(WK::LaunchMail).is_err());
    }

    #[test]
    fn test_all_keys_are_distinct() {
        let all: Vec<Key> = Key::all().collect();
        assert_eq!(all.len(), Key::LENGTH);
        assert_eq!(all.first(), Some(&Key::A));
        assert_eq!(all.last(), Some(&Key::Backquote));
    }
}
