//! Input state layer
//!
//! Tracks keyboard, mouse, four gamepads and a touch panel as per-tick
//! snapshots and answers edge queries by diffing the current snapshot against
//! the previous one.
//!
//! # Architecture
//!
//! ```text
//! Platform (winit) → InputCollector ─┐
//!                                    ├→ Provider::poll → StateBuffer<S>
//! Scripted providers (tests) ────────┘        (current, previous)
//!                                                   ↓
//!                                             InputManager
//!                                      (one update per tick, fixed order)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let shared = SharedCollector::default();
//! let mut input = InputManager::new()
//!     .with_keyboard(shared.clone())
//!     .with_mouse(shared.clone())
//!     .with_touch(shared.clone());
//!
//! // In window_event()
//! shared.handle_window_event(&event);
//!
//! // Once per frame
//! input.update()?;
//! if input.keyboard().pressed(Key::Space) {
//!     // jump
//! }
//! ```

mod buffer;
mod collector;
mod device;
mod gamepad;
mod keyboard;
mod manager;
mod mouse;
mod touch;

// Re-export public API
pub use buffer::{Controls, StateBuffer};
pub use collector::{DEFAULT_SCROLL_UNITS_PER_LINE, InputCollector, MOUSE_TOUCH_ID, SharedCollector};
pub use device::{Device, DeviceKind, Provider, ScriptedProvider};
pub use gamepad::{
    Button, Buttons, DPad, DPadDirection, GamepadProvider, GamepadSnapshot, GamepadState,
    MAX_GAMEPADS, PlayerIndex, ScriptedGamepads, ThumbSticks, Triggers,
};
pub use keyboard::{Key, KeyboardSnapshot, KeyboardState, Modifier, Modifiers, Toggle};
pub use manager::InputManager;
pub use mouse::{MouseButton, MouseSnapshot, MouseState};
pub use touch::{
    DisplayOrientation, GestureSample, GestureType, ScriptedTouch, TouchPanelCapabilities,
    TouchPhase, TouchPoint, TouchProvider, TouchSnapshot, TouchState,
};
