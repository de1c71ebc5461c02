//! Provider contract and the generic device wrapper

use std::collections::VecDeque;
use std::fmt;

use tracing::warn;

use super::buffer::StateBuffer;
use super::gamepad::PlayerIndex;
use crate::error::{InputError, ProviderError};

/// Which device a wrapper or error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Gamepad(PlayerIndex),
    Touch,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyboard => f.write_str("keyboard"),
            Self::Mouse => f.write_str("mouse"),
            Self::Gamepad(slot) => write!(f, "gamepad {slot:?}"),
            Self::Touch => f.write_str("touch"),
        }
    }
}

/// Source of fresh snapshots for one device
///
/// Production code backs this with the platform (see
/// [`InputCollector`](super::InputCollector)); tests use [`ScriptedProvider`].
pub trait Provider<S> {
    /// Returns the device state right now
    fn poll(&mut self) -> Result<S, ProviderError>;
}

/// A device wrapper: the double buffer plus an optional provider
///
/// Without a provider the wrapper never changes and keeps reporting the idle
/// snapshot.
pub struct Device<S> {
    kind: DeviceKind,
    state: StateBuffer<S>,
    provider: Option<Box<dyn Provider<S>>>,
}

impl<S: Default> Device<S> {
    pub fn new(kind: DeviceKind, provider: Option<Box<dyn Provider<S>>>) -> Self {
        Self {
            kind,
            state: StateBuffer::new(),
            provider,
        }
    }

    /// Polls the provider and rotates the buffer
    ///
    /// A failed poll leaves both snapshots untouched.
    pub fn update(&mut self) -> Result<(), InputError> {
        let Some(provider) = self.provider.as_mut() else {
            return Ok(());
        };

        advance_from(self.kind, &mut self.state, || provider.poll())
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn state(&self) -> &StateBuffer<S> {
        &self.state
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }
}

/// Polls once and rotates `state`, tagging a failure with the device
///
/// Every wrapper advances through here. A failed poll leaves `state` untouched.
pub(crate) fn advance_from<S>(
    kind: DeviceKind,
    state: &mut StateBuffer<S>,
    poll: impl FnOnce() -> Result<S, ProviderError>,
) -> Result<(), InputError> {
    let next = poll().map_err(|source| {
        warn!(device = %kind, error = %source, "Provider poll failed");
        InputError::Provider {
            device: kind,
            source,
        }
    })?;
    state.advance(next);
    Ok(())
}

/// Applies one provider setting, tagging a failure with the device
pub(crate) fn configure_device(
    kind: DeviceKind,
    setting: &'static str,
    apply: impl FnOnce() -> Result<(), ProviderError>,
) -> Result<(), InputError> {
    apply().map_err(|source| {
        warn!(device = %kind, setting, error = %source, "Provider setting failed");
        InputError::Setting {
            device: kind,
            setting,
            source,
        }
    })
}

/// Provider that replays a fixed sequence of snapshots
///
/// Once the script runs out it keeps returning the default snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider<S> {
    script: VecDeque<S>,
}

impl<S> ScriptedProvider<S> {
    pub fn new(script: impl IntoIterator<Item = S>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Appends a snapshot to the end of the script
    pub fn push(&mut self, snapshot: S) {
        self.script.push_back(snapshot);
    }

    /// Number of snapshots not yet polled
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl<S: Default> Provider<S> for ScriptedProvider<S> {
    fn poll(&mut self) -> Result<S, ProviderError> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}
