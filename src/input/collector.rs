//! Live device snapshots built from winit window events

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Instant;

use glam::{IVec2, Vec2};
use tracing::trace;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

use super::device::Provider;
use super::keyboard::{Key, KeyboardSnapshot, Toggle};
use super::mouse::{MouseButton, MouseSnapshot};
use super::touch::{
    DisplayOrientation, GestureSample, GestureType, TouchPanelCapabilities, TouchPhase,
    TouchPoint, TouchProvider, TouchSnapshot,
};
use crate::error::ProviderError;

/// Touch id used for the point emulated from the left mouse button
pub const MOUSE_TOUCH_ID: u64 = u64::MAX;

/// Scroll units reported per wheel notch unless configured otherwise
pub const DEFAULT_SCROLL_UNITS_PER_LINE: f32 = 120.0;

/// Maximum travel, in pixels, for a touch to still count as a tap
const TAP_SLOP: f32 = 10.0;

/// Accumulates winit events into keyboard, mouse and touch snapshots
///
/// The collector holds the live state between polls. Each poll hands out a
/// copy, so the device wrappers see exactly one snapshot per tick no matter how
/// many events arrived in between.
pub struct InputCollector {
    keyboard: KeyboardSnapshot,
    mouse: MouseSnapshot,
    /// Fractional wheel position; the snapshot carries the rounded value
    scroll: Vec2,
    scroll_units_per_line: f32,
    touches: Vec<TouchPoint>,
    /// Releases of points that were never polled while pressed
    deferred_releases: Vec<TouchPoint>,
    touch_starts: HashMap<u64, Vec2>,
    gestures: VecDeque<GestureSample>,
    enabled_gestures: GestureType,
    mouse_gestures: bool,
    mouse_touch_point: bool,
    display_size: (u32, u32),
    max_touches_seen: u32,
    has_pressure: bool,
    epoch: Instant,
}

impl InputCollector {
    /// Creates a new input collector
    pub fn new() -> Self {
        Self {
            keyboard: KeyboardSnapshot::default(),
            mouse: MouseSnapshot::default(),
            scroll: Vec2::ZERO,
            scroll_units_per_line: DEFAULT_SCROLL_UNITS_PER_LINE,
            touches: Vec::new(),
            deferred_releases: Vec::new(),
            touch_starts: HashMap::new(),
            gestures: VecDeque::new(),
            enabled_gestures: GestureType::empty(),
            mouse_gestures: false,
            mouse_touch_point: false,
            display_size: (0, 0),
            max_touches_seen: 0,
            has_pressure: false,
            epoch: Instant::now(),
        }
    }

    /// Builder method to set how many scroll units one wheel line is worth
    pub fn with_scroll_units_per_line(mut self, units: f32) -> Self {
        self.scroll_units_per_line = units;
        self
    }

    /// Handle a winit window event
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => match Key::try_from(code) {
                    Ok(key) => self.key_input(key, event.state, event.repeat),
                    Err(_) => trace!(code = ?code, "Ignoring unmapped key"),
                },
                PhysicalKey::Unidentified(native) => {
                    trace!(native = ?native, "Ignoring unidentified key");
                }
            },

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseInput { state, button, .. } => match MouseButton::try_from(*button) {
                Ok(button) => self.mouse_input(button, *state),
                Err(_) => trace!(button = ?button, "Ignoring unmapped mouse button"),
            },

            WindowEvent::MouseWheel { delta, .. } => self.scroll(*delta),

            WindowEvent::Touch(touch) => {
                let force = touch.force.map(|f| f.normalized() as f32);
                self.touch(
                    touch.id,
                    Vec2::new(touch.location.x as f32, touch.location.y as f32),
                    touch.phase,
                    force,
                );
            }

            WindowEvent::Resized(size) => self.resized(size.width, size.height),

            WindowEvent::Focused(false) => self.focus_lost(),

            _ => {}
        }
    }

    /// Records a key transition; lock keys flip their toggle on press
    pub fn key_input(&mut self, key: Key, state: ElementState, repeat: bool) {
        let pressed = state.is_pressed();
        if pressed && !repeat {
            let toggle = match key {
                Key::CapsLock => Some(Toggle::CapsLock),
                Key::NumLock => Some(Toggle::NumLock),
                _ => None,
            };
            if let Some(toggle) = toggle {
                let on = self.keyboard.toggle(toggle);
                self.keyboard.set_toggle(toggle, !on);
            }
        }
        self.keyboard.set_key(key, pressed);
    }

    /// Records the cursor position in window pixels
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        self.mouse.position = IVec2::new(x.round() as i32, y.round() as i32);

        if self.mouse_touch_point && self.mouse.is_button_down(MouseButton::Left) {
            let position = self.mouse.position.as_vec2();
            self.touch_update(MOUSE_TOUCH_ID, position, TouchPhase::Moved, None);
        }
    }

    pub fn mouse_input(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state.is_pressed();
        self.mouse.set_button(button, pressed);

        if self.mouse_touch_point && button == MouseButton::Left {
            let phase = if pressed {
                TouchPhase::Pressed
            } else {
                TouchPhase::Released
            };
            let position = self.mouse.position.as_vec2();
            self.touch_update(MOUSE_TOUCH_ID, position, phase, None);
        }
    }

    /// Adds a wheel movement to the cumulative scroll values
    ///
    /// Line deltas are scaled by the configured units per line, pixel deltas
    /// are taken as-is.
    pub fn scroll(&mut self, delta: MouseScrollDelta) {
        let step = match delta {
            MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y) * self.scroll_units_per_line,
            MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x as f32, pos.y as f32),
        };
        self.scroll += step;
        self.mouse.scroll = self.scroll.y.round() as i32;
        self.mouse.horizontal_scroll = self.scroll.x.round() as i32;
    }

    /// Records a touch event from the platform
    pub fn touch(
        &mut self,
        id: u64,
        position: Vec2,
        phase: winit::event::TouchPhase,
        force: Option<f32>,
    ) {
        use winit::event::TouchPhase as WP;
        let phase = match phase {
            WP::Started => TouchPhase::Pressed,
            WP::Moved => TouchPhase::Moved,
            WP::Ended | WP::Cancelled => TouchPhase::Released,
        };
        self.touch_update(id, position, phase, force);
    }

    fn touch_update(&mut self, id: u64, position: Vec2, phase: TouchPhase, force: Option<f32>) {
        if force.is_some() {
            self.has_pressure = true;
        }
        let mut point = TouchPoint::new(id, position, phase);
        if let Some(force) = force {
            point = point.with_pressure(force);
        }

        match self.touches.iter_mut().find(|p| p.id == id) {
            // A point that starts this tick keeps reporting Pressed until polled
            Some(existing) if existing.phase == TouchPhase::Pressed => {
                existing.position = position;
                existing.pressure = point.pressure;
                if phase == TouchPhase::Released {
                    self.deferred_releases.push(point);
                }
            }
            Some(existing) => *existing = point,
            None => self.touches.push(point),
        }

        match phase {
            TouchPhase::Pressed => {
                self.touch_starts.insert(id, position);
            }
            TouchPhase::Released => {
                let gestures_allowed = id != MOUSE_TOUCH_ID || self.mouse_gestures;
                if let Some(start) = self.touch_starts.remove(&id)
                    && gestures_allowed
                {
                    self.recognize_tap(start, position);
                }
            }
            _ => {}
        }

        let active = self.touches.iter().filter(|p| p.is_active()).count() as u32;
        self.max_touches_seen = self.max_touches_seen.max(active);
    }

    fn recognize_tap(&mut self, start: Vec2, end: Vec2) {
        if self.enabled_gestures.contains(GestureType::TAP) && start.distance(end) <= TAP_SLOP {
            self.gestures.push_back(GestureSample {
                gesture: GestureType::TAP,
                timestamp: self.epoch.elapsed(),
                position: end,
                ..GestureSample::default()
            });
        }
    }

    pub fn resized(&mut self, width: u32, height: u32) {
        self.display_size = (width, height);
    }

    /// Releases every held key and button; lock toggles are kept
    pub fn focus_lost(&mut self) {
        for key in Key::all() {
            self.keyboard.set_key(key, false);
        }
        for button in [
            MouseButton::Left,
            MouseButton::Right,
            MouseButton::Middle,
            MouseButton::X1,
            MouseButton::X2,
        ] {
            self.mouse.set_button(button, false);
        }
        trace!("Focus lost, released held keys and buttons");
    }

    pub fn keyboard(&self) -> &KeyboardSnapshot {
        &self.keyboard
    }

    pub fn mouse(&self) -> &MouseSnapshot {
        &self.mouse
    }

    /// Hands out the touch points for this tick and ages them
    ///
    /// Released points are dropped afterwards and fresh points move on to
    /// `Moved`, so each phase is reported by exactly one poll. A point that
    /// was pressed and released between two polls reports `Pressed` now and
    /// `Released` on the next poll.
    pub fn take_touches(&mut self) -> TouchSnapshot {
        let snapshot = TouchSnapshot::new(self.touches.iter().copied());
        self.touches.retain(|p| p.phase != TouchPhase::Released);
        for point in &mut self.touches {
            if point.phase == TouchPhase::Pressed {
                point.phase = TouchPhase::Moved;
            }
        }
        for release in self.deferred_releases.drain(..) {
            match self.touches.iter_mut().find(|p| p.id == release.id) {
                Some(existing) => *existing = release,
                None => self.touches.push(release),
            }
        }
        snapshot
    }

    pub fn set_enabled_gestures(&mut self, gestures: GestureType) {
        self.enabled_gestures = gestures;
    }

    pub fn set_mouse_gestures_enabled(&mut self, enabled: bool) {
        self.mouse_gestures = enabled;
    }

    pub fn set_mouse_touch_point_enabled(&mut self, enabled: bool) {
        self.mouse_touch_point = enabled;
    }

    pub fn read_gesture(&mut self) -> Option<GestureSample> {
        self.gestures.pop_front()
    }

    fn display_orientation(&self) -> DisplayOrientation {
        match self.display_size {
            (0, _) | (_, 0) => DisplayOrientation::Unknown,
            (w, h) if w >= h => DisplayOrientation::LandscapeLeft,
            _ => DisplayOrientation::Portrait,
        }
    }

    fn capabilities(&self) -> TouchPanelCapabilities {
        TouchPanelCapabilities {
            is_connected: self.max_touches_seen > 0,
            maximum_touch_count: self.max_touches_seen,
            has_pressure: self.has_pressure,
        }
    }
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Collector shared between the event loop and the input manager
///
/// The event loop feeds events through [`borrow_mut`](Self::borrow_mut); the
/// clones handed to the manager act as keyboard, mouse and touch providers.
#[derive(Clone, Default)]
pub struct SharedCollector(Rc<RefCell<InputCollector>>);

impl SharedCollector {
    pub fn new(collector: InputCollector) -> Self {
        Self(Rc::new(RefCell::new(collector)))
    }

    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, InputCollector> {
        self.0.borrow_mut()
    }

    /// Feeds one winit event into the collector
    pub fn handle_window_event(&self, event: &WindowEvent) {
        self.0.borrow_mut().handle_window_event(event);
    }

    fn with<T>(&self, f: impl FnOnce(&mut InputCollector) -> T) -> Result<T, ProviderError> {
        let mut collector = self
            .0
            .try_borrow_mut()
            .map_err(|_| "input collector is already borrowed")?;
        Ok(f(&mut *collector))
    }

    fn read<T: Default>(&self, f: impl FnOnce(&InputCollector) -> T) -> T {
        self.0.try_borrow().map(|c| f(&*c)).unwrap_or_default()
    }
}

impl Provider<KeyboardSnapshot> for SharedCollector {
    fn poll(&mut self) -> Result<KeyboardSnapshot, ProviderError> {
        self.with(|c| c.keyboard.clone())
    }
}

impl Provider<MouseSnapshot> for SharedCollector {
    fn poll(&mut self) -> Result<MouseSnapshot, ProviderError> {
        self.with(|c| c.mouse.clone())
    }
}

impl Provider<TouchSnapshot> for SharedCollector {
    fn poll(&mut self) -> Result<TouchSnapshot, ProviderError> {
        self.with(InputCollector::take_touches)
    }
}

impl TouchProvider for SharedCollector {
    fn display_width(&self) -> u32 {
        self.read(|c| c.display_size.0)
    }

    fn display_height(&self) -> u32 {
        self.read(|c| c.display_size.1)
    }

    fn display_orientation(&self) -> DisplayOrientation {
        self.read(InputCollector::display_orientation)
    }

    fn is_gesture_available(&self) -> bool {
        self.read(|c| !c.gestures.is_empty())
    }

    fn enabled_gestures(&self) -> GestureType {
        self.read(|c| c.enabled_gestures)
    }

    fn set_enabled_gestures(&mut self, gestures: GestureType) -> Result<(), ProviderError> {
        self.with(|c| c.set_enabled_gestures(gestures))
    }

    fn mouse_gestures_enabled(&self) -> bool {
        self.read(|c| c.mouse_gestures)
    }

    fn set_mouse_gestures_enabled(&mut self, enabled: bool) -> Result<(), ProviderError> {
        self.with(|c| c.set_mouse_gestures_enabled(enabled))
    }

    fn mouse_touch_point_enabled(&self) -> bool {
        self.read(|c| c.mouse_touch_point)
    }

    fn set_mouse_touch_point_enabled(&mut self, enabled: bool) -> Result<(), ProviderError> {
        self.with(|c| c.set_mouse_touch_point_enabled(enabled))
    }

    fn capabilities(&self) -> TouchPanelCapabilities {
        self.read(InputCollector::capabilities)
    }

    fn read_gesture(&mut self) -> Option<GestureSample> {
        self.with(InputCollector::read_gesture).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;
    use winit::event::TouchPhase as WinitPhase;

    use super::*;
    use crate::error::InputError;
    use crate::input::{DeviceKind, InputManager};

    #[test]
    fn test_key_input_sets_and_clears_keys() {
        let mut collector = InputCollector::new();
        collector.key_input(Key::A, ElementState::Pressed, false);
        assert!(collector.keyboard().is_key_down(Key::A));

        collector.key_input(Key::A, ElementState::Released, false);
        assert!(!collector.keyboard().is_key_down(Key::A));
    }

    #[test]
    fn test_enter_keys_are_tracked_apart() {
        let mut collector = InputCollector::new();
        collector.key_input(Key::Enter, ElementState::Pressed, false);
        collector.key_input(Key::NumPadEnter, ElementState::Pressed, false);
        collector.key_input(Key::Enter, ElementState::Released, false);
        assert!(!collector.keyboard().is_key_down(Key::Enter));
        assert!(collector.keyboard().is_key_down(Key::NumPadEnter));
    }

    #[test]
    fn test_lock_keys_toggle_on_press_only() {
        let mut collector = InputCollector::new();
        collector.key_input(Key::CapsLock, ElementState::Pressed, false);
        collector.key_input(Key::CapsLock, ElementState::Pressed, true);
        collector.key_input(Key::CapsLock, ElementState::Released, false);
        assert!(collector.keyboard().toggle(Toggle::CapsLock));

        collector.key_input(Key::CapsLock, ElementState::Pressed, false);
        assert!(!collector.keyboard().toggle(Toggle::CapsLock));
        assert!(!collector.keyboard().toggle(Toggle::NumLock));
    }

    #[test]
    fn test_scroll_is_cumulative() {
        let mut collector = InputCollector::new();
        collector.scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        assert_eq!(collector.mouse().scroll, 120);

        collector.scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(15.0, -30.0)));
        assert_eq!(collector.mouse().scroll, 90);
        assert_eq!(collector.mouse().horizontal_scroll, 15);

        let mut collector = InputCollector::new().with_scroll_units_per_line(40.0);
        collector.scroll(MouseScrollDelta::LineDelta(-1.0, 2.0));
        assert_eq!(collector.mouse().scroll, 80);
        assert_eq!(collector.mouse().horizontal_scroll, -40);
    }

    #[test]
    fn test_focus_lost_releases_everything() {
        let mut collector = InputCollector::new();
        collector.key_input(Key::CapsLock, ElementState::Pressed, false);
        collector.key_input(Key::LeftShift, ElementState::Pressed, false);
        collector.mouse_input(MouseButton::Middle, ElementState::Pressed);

        collector.focus_lost();
        assert!(collector.keyboard().pressed_keys().is_empty());
        assert!(!collector.mouse().is_button_down(MouseButton::Middle));
        assert!(collector.keyboard().toggle(Toggle::CapsLock));
    }

    #[test]
    fn test_touch_phases_are_reported_once() {
        let mut collector = InputCollector::new();
        collector.touch(3, Vec2::new(1.0, 1.0), WinitPhase::Started, Some(0.5));
        collector.touch(3, Vec2::new(2.0, 1.0), WinitPhase::Moved, Some(0.5));

        let first = collector.take_touches();
        let point = first.find(3).unwrap();
        assert_eq!(point.phase, TouchPhase::Pressed);
        assert_eq!(point.position, Vec2::new(2.0, 1.0));

        let second = collector.take_touches();
        assert_eq!(second.find(3).unwrap().phase, TouchPhase::Moved);

        collector.touch(3, Vec2::new(2.0, 1.0), WinitPhase::Ended, None);
        assert_eq!(collector.take_touches().find(3).unwrap().phase, TouchPhase::Released);
        assert!(collector.take_touches().is_empty());
        assert!(collector.capabilities().has_pressure);
        assert_eq!(collector.capabilities().maximum_touch_count, 1);
    }

    #[test]
    fn test_mouse_touch_point_and_tap() {
        let mut collector = InputCollector::new();
        collector.set_mouse_touch_point_enabled(true);
        collector.set_mouse_gestures_enabled(true);
        collector.set_enabled_gestures(GestureType::TAP);

        collector.cursor_moved(40.0, 50.0);
        collector.mouse_input(MouseButton::Left, ElementState::Pressed);
        collector.cursor_moved(43.0, 52.0);
        let touches = collector.take_touches();
        assert_eq!(touches.find(MOUSE_TOUCH_ID).unwrap().position, Vec2::new(43.0, 52.0));

        collector.mouse_input(MouseButton::Left, ElementState::Released);
        let sample = collector.read_gesture().unwrap();
        assert_eq!(sample.gesture, GestureType::TAP);
        assert!(collector.read_gesture().is_none());
    }

    #[test]
    fn test_shared_collector_feeds_manager() {
        let shared = SharedCollector::default();
        let mut manager = InputManager::new()
            .with_keyboard(shared.clone())
            .with_mouse(shared.clone())
            .with_touch(shared.clone());

        shared.borrow_mut().key_input(Key::Space, ElementState::Pressed, false);
        shared.borrow_mut().scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        manager.update().unwrap();
        assert!(manager.keyboard().pressed(Key::Space));
        assert_eq!(manager.mouse().scroll_delta(), 120);

        manager.update().unwrap();
        assert!(manager.keyboard().down(Key::Space));
        assert!(!manager.keyboard().pressed(Key::Space));
        assert_eq!(manager.mouse().scroll_delta(), 0);

        manager.touch_mut().set_emulate_with_mouse(true).unwrap();
        assert!(shared.borrow_mut().mouse_touch_point);
    }

    #[test]
    fn test_touch_pressed_and_released_between_polls() {
        let shared = SharedCollector::default();
        let mut manager = InputManager::new().with_touch(shared.clone());

        shared.borrow_mut().touch(5, Vec2::new(8.0, 8.0), WinitPhase::Started, None);
        shared.borrow_mut().touch(5, Vec2::new(9.0, 8.0), WinitPhase::Ended, None);

        manager.update().unwrap();
        let started: Vec<u64> = manager.touch().started().map(|p| p.id).collect();
        assert_eq!(started, [5]);
        assert_eq!(manager.touch().ended().count(), 0);

        manager.update().unwrap();
        let ended: Vec<u64> = manager.touch().ended().map(|p| p.id).collect();
        assert_eq!(ended, [5]);
        assert_eq!(manager.touch().points().find(5).unwrap().position, Vec2::new(9.0, 8.0));

        manager.update().unwrap();
        assert!(manager.touch().points().is_empty());
    }

    #[test]
    fn test_mouse_tap_needs_mouse_gestures() {
        let mut collector = InputCollector::new();
        collector.set_mouse_touch_point_enabled(true);
        collector.set_enabled_gestures(GestureType::TAP);

        collector.mouse_input(MouseButton::Left, ElementState::Pressed);
        collector.mouse_input(MouseButton::Left, ElementState::Released);
        assert!(collector.read_gesture().is_none());

        collector.touch(2, Vec2::ZERO, WinitPhase::Started, None);
        collector.touch(2, Vec2::ZERO, WinitPhase::Ended, None);
        assert_eq!(collector.read_gesture().unwrap().gesture, GestureType::TAP);
    }

    #[test]
    fn test_rejected_emulation_keeps_flag_off() {
        let shared = SharedCollector::default();
        let mut manager = InputManager::new().with_touch(shared.clone());

        let held = shared.borrow_mut();
        let err = manager.touch_mut().set_emulate_with_mouse(true).unwrap_err();
        assert!(matches!(err, InputError::Setting { device: DeviceKind::Touch, .. }));
        assert!(!manager.touch().emulate_with_mouse());
        assert!(!held.mouse_touch_point);
        drop(held);

        manager.touch_mut().set_emulate_with_mouse(true).unwrap();
        assert!(manager.touch().emulate_with_mouse());
        assert!(shared.borrow_mut().mouse_touch_point);
    }

    #[test]
    fn test_poll_while_borrowed_is_a_provider_error() {
        let mut shared = SharedCollector::default();
        let guard = shared.clone();
        let _held = guard.borrow_mut();
        let result: Result<KeyboardSnapshot, _> = Provider::poll(&mut shared);
        assert!(result.is_err());
    }
}
