//! Error types for the input layer

use thiserror::Error;

use crate::input::DeviceKind;

/// Error returned by a provider when it cannot produce a snapshot
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the input layer
#[derive(Debug, Error)]
pub enum InputError {
    /// An unknown control, button, direction or slot identifier
    #[error("invalid {kind}: {value:?}")]
    InvalidArgument { kind: &'static str, value: String },

    /// A provider failed to deliver a snapshot for a device
    #[error("{device} provider failed to poll")]
    Provider {
        device: DeviceKind,
        #[source]
        source: ProviderError,
    },

    /// A provider refused a capability setting
    #[error("{device} provider rejected setting {setting}")]
    Setting {
        device: DeviceKind,
        setting: &'static str,
        #[source]
        source: ProviderError,
    },

    /// Configuration values that load but make no sense
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl InputError {
    pub(crate) fn invalid(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            kind,
            value: value.into(),
        }
    }
}
