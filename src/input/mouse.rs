//! Mouse snapshot and queries

use std::str::FromStr;

use enum_map::{Enum, EnumMap};
use glam::IVec2;

use super::buffer::{Controls, StateBuffer};
use crate::error::InputError;

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// First side button (usually "back")
    X1,
    /// Second side button (usually "forward")
    X2,
}

impl FromStr for MouseButton {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        (0..MouseButton::LENGTH)
            .map(MouseButton::from_usize)
            .find(|button| format!("{button:?}").eq_ignore_ascii_case(s))
            .ok_or_else(|| InputError::invalid("mouse button", s))
    }
}

/// Convert from winit mouse button
impl TryFrom<winit::event::MouseButton> for MouseButton {
    type Error = InputError;

    fn try_from(button: winit::event::MouseButton) -> Result<Self, Self::Error> {
        use winit::event::MouseButton as WB;
        match button {
            WB::Left => Ok(Self::Left),
            WB::Right => Ok(Self::Right),
            WB::Middle => Ok(Self::Middle),
            WB::Back => Ok(Self::X1),
            WB::Forward => Ok(Self::X2),
            WB::Other(code) => Err(InputError::invalid("mouse button", code.to_string())),
        }
    }
}

/// Mouse state at one instant
///
/// Scroll values are cumulative since the provider started, so the per-tick
/// wheel movement is the difference between two snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseSnapshot {
    buttons: EnumMap<MouseButton, bool>,
    /// Cursor position in window pixels
    pub position: IVec2,
    /// Cumulative vertical wheel value
    pub scroll: i32,
    /// Cumulative horizontal wheel value
    pub horizontal_scroll: i32,
}

impl MouseSnapshot {
    /// Snapshot at `position` with nothing held and the wheel at zero
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            position: IVec2::new(x, y),
            ..Self::default()
        }
    }

    /// Builder method to hold the given buttons
    pub fn with_buttons(mut self, buttons: impl IntoIterator<Item = MouseButton>) -> Self {
        for button in buttons {
            self.buttons[button] = true;
        }
        self
    }

    /// Builder method to set the cumulative wheel value
    pub fn with_scroll(mut self, scroll: i32) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_horizontal_scroll(mut self, scroll: i32) -> Self {
        self.horizontal_scroll = scroll;
        self
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons[button]
    }

    pub(crate) fn set_button(&mut self, button: MouseButton, down: bool) {
        self.buttons[button] = down;
    }
}

impl Controls<MouseButton> for MouseSnapshot {
    fn is_active(&self, control: MouseButton) -> bool {
        self.buttons[control]
    }
}

/// Double-buffered mouse
pub type MouseState = StateBuffer<MouseSnapshot>;

impl StateBuffer<MouseSnapshot> {
    pub fn position(&self) -> IVec2 {
        self.current().position
    }

    pub fn x(&self) -> i32 {
        self.current().position.x
    }

    pub fn y(&self) -> i32 {
        self.current().position.y
    }

    /// Cursor movement since the previous tick
    pub fn position_delta(&self) -> IVec2 {
        let (now, before) = self.pair(|s| s.position);
        now - before
    }

    pub fn x_delta(&self) -> i32 {
        self.position_delta().x
    }

    pub fn y_delta(&self) -> i32 {
        self.position_delta().y
    }

    pub fn scroll(&self) -> i32 {
        self.current().scroll
    }

    /// Wheel movement since the previous tick
    pub fn scroll_delta(&self) -> i32 {
        let (now, before) = self.pair(|s| s.scroll);
        now - before
    }

    pub fn horizontal_scroll(&self) -> i32 {
        self.current().horizontal_scroll
    }

    pub fn horizontal_scroll_delta(&self) -> i32 {
        let (now, before) = self.pair(|s| s.horizontal_scroll);
        now - before
    }

    pub fn was_position(&self) -> IVec2 {
        self.previous().position
    }

    pub fn was_scroll(&self) -> i32 {
        self.previous().scroll
    }

    pub fn was_horizontal_scroll(&self) -> i32 {
        self.previous().horizontal_scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(script: impl IntoIterator<Item = MouseSnapshot>) -> MouseState {
        let mut state = MouseState::new();
        for snapshot in script {
            state.advance(snapshot);
        }
        state
    }

    #[test]
    fn test_button_edges() {
        let held = MouseSnapshot::default().with_buttons([MouseButton::Left]);
        let mut state = mouse([held]);
        assert!(state.pressed(MouseButton::Left));
        assert!(state.down(MouseButton::Left));
        assert!(state.up(MouseButton::Right));

        state.advance(MouseSnapshot::default());
        assert!(state.released(MouseButton::Left));
        assert!(state.was_down(MouseButton::Left));
    }

    #[test]
    fn test_all_five_buttons_are_tracked() {
        let all = [
            MouseButton::Left,
            MouseButton::Right,
            MouseButton::Middle,
            MouseButton::X1,
            MouseButton::X2,
        ];
        let state = mouse([MouseSnapshot::default().with_buttons(all)]);
        assert!(state.all_pressed(&all));
        assert!(state.was_all_up(&all));
    }

    #[test]
    fn test_scroll_delta() {
        let mut state = mouse([MouseSnapshot::default()]);
        assert_eq!(state.scroll_delta(), 0);

        state.advance(MouseSnapshot::default().with_scroll(120));
        assert_eq!(state.scroll_delta(), 120);
        assert_eq!(state.scroll(), 120);

        state.advance(MouseSnapshot::default().with_scroll(90));
        assert_eq!(state.scroll_delta(), -30);
        assert_eq!(state.was_scroll(), 120);
    }

    #[test]
    fn test_horizontal_scroll_delta() {
        let state = mouse([
            MouseSnapshot::default().with_horizontal_scroll(-40),
            MouseSnapshot::default().with_horizontal_scroll(20),
        ]);
        assert_eq!(state.horizontal_scroll(), 20);
        assert_eq!(state.horizontal_scroll_delta(), 60);
        assert_eq!(state.was_horizontal_scroll(), -40);
    }

    #[test]
    fn test_position_delta_is_current_minus_previous() {
        let state = mouse([MouseSnapshot::at(10, 20), MouseSnapshot::at(15, 5)]);
        assert_eq!(state.position(), IVec2::new(15, 5));
        assert_eq!(state.was_position(), IVec2::new(10, 20));
        assert_eq!(state.position_delta(), IVec2::new(5, -15));
        assert_eq!(state.x_delta(), 5);
        assert_eq!(state.y_delta(), -15);
        assert_eq!((state.x(), state.y()), (15, 5));
    }

    #[test]
    fn test_deltas_sum_to_total_movement() {
        let path = [(0, 0), (3, 4), (-2, 9), (7, 7)];
        let mut state = MouseState::new();
        let mut total = IVec2::ZERO;
        for (x, y) in path {
            state.advance(MouseSnapshot::at(x, y));
            total += state.position_delta();
        }
        assert_eq!(total, IVec2::new(7, 7));
    }

    #[test]
    fn test_button_from_str_and_winit() {
        assert_eq!("x2".parse::<MouseButton>().unwrap(), MouseButton::X2);
        assert!("wheel".parse::<MouseButton>().is_err());

        assert_eq!(
            MouseButton::try_from(winit::event::MouseButton::Back).unwrap(),
            MouseButton::X1
        );
        assert!(MouseButton::try_from(winit::event::MouseButton::Other(9)).is_err());
    }
}
