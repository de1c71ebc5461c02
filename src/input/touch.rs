//! Touch panel snapshot, capabilities and gestures

use std::collections::VecDeque;
use std::time::Duration;

use bitflags::bitflags;
use glam::Vec2;
use tracing::debug;

use super::buffer::StateBuffer;
use super::device::{DeviceKind, Provider, advance_from, configure_device};
use crate::error::{InputError, ProviderError};

/// Lifecycle stage of one touch point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TouchPhase {
    #[default]
    Invalid,
    Pressed,
    Moved,
    Released,
}

/// One finger (or emulated pointer) on the panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Vec2,
    /// Normalized pressure, 1.0 when the panel cannot measure it
    pub pressure: f32,
    pub phase: TouchPhase,
}

impl TouchPoint {
    pub fn new(id: u64, position: Vec2, phase: TouchPhase) -> Self {
        Self {
            id,
            position,
            pressure: 1.0,
            phase,
        }
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = pressure;
        self
    }

    /// True while the finger is on the panel
    pub fn is_active(&self) -> bool {
        matches!(self.phase, TouchPhase::Pressed | TouchPhase::Moved)
    }
}

/// Ordered set of touch points reported in one poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchSnapshot {
    points: Vec<TouchPoint>,
}

impl TouchSnapshot {
    pub fn new(points: impl IntoIterator<Item = TouchPoint>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TouchPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn find(&self, id: u64) -> Option<&TouchPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn as_slice(&self) -> &[TouchPoint] {
        &self.points
    }
}

impl<'a> IntoIterator for &'a TouchSnapshot {
    type Item = &'a TouchPoint;
    type IntoIter = std::slice::Iter<'a, TouchPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Physical orientation of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayOrientation {
    #[default]
    Default,
    LandscapeLeft,
    LandscapeRight,
    Portrait,
    PortraitDown,
    Unknown,
}

bitflags! {
    /// Gesture kinds a touch panel can recognize
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GestureType: u32 {
        const TAP = 1 << 0;
        const DRAG_COMPLETE = 1 << 1;
        const FLICK = 1 << 2;
        const FREE_DRAG = 1 << 3;
        const HOLD = 1 << 4;
        const HORIZONTAL_DRAG = 1 << 5;
        const PINCH = 1 << 6;
        const PINCH_COMPLETE = 1 << 7;
        const DOUBLE_TAP = 1 << 8;
        const VERTICAL_DRAG = 1 << 9;
    }
}

impl GestureType {
    /// Gestures a mouse can reasonably produce
    pub const MOUSE_EMULATED: GestureType = GestureType::HOLD
        .union(GestureType::TAP)
        .union(GestureType::DOUBLE_TAP)
        .union(GestureType::DRAG_COMPLETE)
        .union(GestureType::FLICK)
        .union(GestureType::FREE_DRAG)
        .union(GestureType::HORIZONTAL_DRAG)
        .union(GestureType::VERTICAL_DRAG);
}

/// One recognized gesture, read from the panel's gesture queue
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSample {
    pub gesture: GestureType,
    pub timestamp: Duration,
    pub position: Vec2,
    /// Second finger for two-point gestures such as pinch
    pub position2: Vec2,
    pub delta: Vec2,
    pub delta2: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchPanelCapabilities {
    pub is_connected: bool,
    pub maximum_touch_count: u32,
    pub has_pressure: bool,
}

/// Touch point source plus the panel's capability and gesture surface
pub trait TouchProvider: Provider<TouchSnapshot> {
    fn display_width(&self) -> u32;
    fn display_height(&self) -> u32;
    fn display_orientation(&self) -> DisplayOrientation;
    fn is_gesture_available(&self) -> bool;
    fn enabled_gestures(&self) -> GestureType;
    fn set_enabled_gestures(&mut self, gestures: GestureType) -> Result<(), ProviderError>;
    fn mouse_gestures_enabled(&self) -> bool;
    fn set_mouse_gestures_enabled(&mut self, enabled: bool) -> Result<(), ProviderError>;
    fn mouse_touch_point_enabled(&self) -> bool;
    fn set_mouse_touch_point_enabled(&mut self, enabled: bool) -> Result<(), ProviderError>;
    fn capabilities(&self) -> TouchPanelCapabilities;
    /// Pops the oldest pending gesture
    fn read_gesture(&mut self) -> Option<GestureSample>;
}

/// Touch wrapper: the double buffer, the panel passthroughs and the
/// mouse-emulation switch
///
/// Without a provider the passthroughs report a disconnected, zero-sized panel.
#[derive(Default)]
pub struct TouchState {
    state: StateBuffer<TouchSnapshot>,
    provider: Option<Box<dyn TouchProvider>>,
    emulate_with_mouse: bool,
}

impl TouchState {
    pub fn new(provider: Option<Box<dyn TouchProvider>>) -> Self {
        Self {
            state: StateBuffer::new(),
            provider,
            emulate_with_mouse: false,
        }
    }

    /// Polls the provider and rotates the buffer
    pub fn update(&mut self) -> Result<(), InputError> {
        let Some(provider) = self.provider.as_mut() else {
            return Ok(());
        };

        advance_from(DeviceKind::Touch, &mut self.state, || provider.poll())
    }

    pub fn state(&self) -> &StateBuffer<TouchSnapshot> {
        &self.state
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn points(&self) -> &TouchSnapshot {
        self.state.current()
    }

    pub fn was_points(&self) -> &TouchSnapshot {
        self.state.previous()
    }

    /// Ids on the panel now that were not tracked on the previous tick
    pub fn started(&self) -> impl Iterator<Item = &TouchPoint> {
        let previous = self.state.previous();
        self.state
            .current()
            .iter()
            .filter(move |p| {
                p.is_active() && !previous.find(p.id).is_some_and(TouchPoint::is_active)
            })
    }

    /// Points that left the panel since the previous tick
    ///
    /// Covers both an explicit `Released` phase and an id that vanished.
    pub fn ended(&self) -> impl Iterator<Item = &TouchPoint> {
        let current = self.state.current();
        self.state
            .previous()
            .iter()
            .filter(move |p| {
                p.is_active() && !current.find(p.id).is_some_and(TouchPoint::is_active)
            })
    }

    /// Movement of one touch point since the previous tick
    pub fn delta(&self, id: u64) -> Option<Vec2> {
        let now = self.state.current().find(id)?;
        let before = self.state.previous().find(id)?;
        Some(now.position - before.position)
    }

    pub fn emulate_with_mouse(&self) -> bool {
        self.emulate_with_mouse
    }

    /// Switches mouse emulation
    ///
    /// Turning it on enables the mouse-friendly gesture set, mouse gestures
    /// and the mouse touch point on the provider. Turning it off leaves the
    /// provider settings alone. If the provider rejects a setting the flag
    /// keeps its old value.
    pub fn set_emulate_with_mouse(&mut self, enabled: bool) -> Result<(), InputError> {
        if enabled && !self.emulate_with_mouse && self.provider.is_some() {
            self.set_enabled_gestures(GestureType::MOUSE_EMULATED)?;
            self.set_mouse_gestures_enabled(true)?;
            self.set_mouse_touch_point_enabled(true)?;
            debug!(gestures = ?GestureType::MOUSE_EMULATED, "Touch mouse emulation enabled");
        }
        self.emulate_with_mouse = enabled;
        Ok(())
    }

    pub fn display_width(&self) -> u32 {
        self.provider.as_ref().map_or(0, |p| p.display_width())
    }

    pub fn display_height(&self) -> u32 {
        self.provider.as_ref().map_or(0, |p| p.display_height())
    }

    pub fn display_orientation(&self) -> DisplayOrientation {
        self.provider
            .as_ref()
            .map_or_else(DisplayOrientation::default, |p| p.display_orientation())
    }

    pub fn is_gesture_available(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.is_gesture_available())
    }

    pub fn enabled_gestures(&self) -> GestureType {
        self.provider
            .as_ref()
            .map_or_else(GestureType::empty, |p| p.enabled_gestures())
    }

    pub fn set_enabled_gestures(&mut self, gestures: GestureType) -> Result<(), InputError> {
        let Some(provider) = self.provider.as_mut() else {
            return Ok(());
        };
        configure_device(DeviceKind::Touch, "enabled_gestures", || provider.set_enabled_gestures(gestures))
    }

    pub fn mouse_gestures_enabled(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.mouse_gestures_enabled())
    }

    pub fn set_mouse_gestures_enabled(&mut self, enabled: bool) -> Result<(), InputError> {
        let Some(provider) = self.provider.as_mut() else {
            return Ok(());
        };
        configure_device(DeviceKind::Touch, "mouse_gestures_enabled", || provider.set_mouse_gestures_enabled(enabled))
    }

    pub fn mouse_touch_point_enabled(&self) -> bool {
        self.provider
            .as_ref()
            .is_some_and(|p| p.mouse_touch_point_enabled())
    }

    pub fn set_mouse_touch_point_enabled(&mut self, enabled: bool) -> Result<(), InputError> {
        let Some(provider) = self.provider.as_mut() else {
            return Ok(());
        };
        configure_device(DeviceKind::Touch, "mouse_touch_point_enabled", || provider.set_mouse_touch_point_enabled(enabled))
    }

    pub fn capabilities(&self) -> TouchPanelCapabilities {
        self.provider
            .as_ref()
            .map_or_else(TouchPanelCapabilities::default, |p| p.capabilities())
    }

    pub fn read_gesture(&mut self) -> Option<GestureSample> {
        self.provider.as_mut()?.read_gesture()
    }
}

/// Touch provider that replays a fixed sequence of snapshots and gestures
#[derive(Debug, Clone)]
pub struct ScriptedTouch {
    script: VecDeque<TouchSnapshot>,
    gestures: VecDeque<GestureSample>,
    display_size: (u32, u32),
    orientation: DisplayOrientation,
    enabled_gestures: GestureType,
    mouse_gestures: bool,
    mouse_touch_point: bool,
    capabilities: TouchPanelCapabilities,
}

impl Default for ScriptedTouch {
    fn default() -> Self {
        Self::new([])
    }
}

impl ScriptedTouch {
    pub fn new(script: impl IntoIterator<Item = TouchSnapshot>) -> Self {
        Self {
            script: script.into_iter().collect(),
            gestures: VecDeque::new(),
            display_size: (800, 480),
            orientation: DisplayOrientation::Default,
            enabled_gestures: GestureType::empty(),
            mouse_gestures: false,
            mouse_touch_point: false,
            capabilities: TouchPanelCapabilities {
                is_connected: true,
                maximum_touch_count: 4,
                has_pressure: false,
            },
        }
    }

    pub fn with_gestures(mut self, gestures: impl IntoIterator<Item = GestureSample>) -> Self {
        self.gestures.extend(gestures);
        self
    }

    pub fn with_display(mut self, width: u32, height: u32, orientation: DisplayOrientation) -> Self {
        self.display_size = (width, height);
        self.orientation = orientation;
        self
    }

    pub fn with_capabilities(mut self, capabilities: TouchPanelCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

impl Provider<TouchSnapshot> for ScriptedTouch {
    fn poll(&mut self) -> Result<TouchSnapshot, ProviderError> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

impl TouchProvider for ScriptedTouch {
    fn display_width(&self) -> u32 {
        self.display_size.0
    }

    fn display_height(&self) -> u32 {
        self.display_size.1
    }

    fn display_orientation(&self) -> DisplayOrientation {
        self.orientation
    }

    fn is_gesture_available(&self) -> bool {
        !self.gestures.is_empty()
    }

    fn enabled_gestures(&self) -> GestureType {
        self.enabled_gestures
    }

    fn set_enabled_gestures(&mut self, gestures: GestureType) -> Result<(), ProviderError> {
        self.enabled_gestures = gestures;
        Ok(())
    }

    fn mouse_gestures_enabled(&self) -> bool {
        self.mouse_gestures
    }

    fn set_mouse_gestures_enabled(&mut self, enabled: bool) -> Result<(), ProviderError> {
        self.mouse_gestures = enabled;
        Ok(())
    }

    fn mouse_touch_point_enabled(&self) -> bool {
        self.mouse_touch_point
    }

    fn set_mouse_touch_point_enabled(&mut self, enabled: bool) -> Result<(), ProviderError> {
        self.mouse_touch_point = enabled;
        Ok(())
    }

    fn capabilities(&self) -> TouchPanelCapabilities {
        self.capabilities
    }

    fn read_gesture(&mut self) -> Option<GestureSample> {
        self.gestures.pop_front()
    }
}
