//! Input State
//!
//! Per-tick keyboard, mouse, gamepad and touch snapshots with edge queries,
//! fed by winit or by scripted providers.

/// Build-time information (git SHA, branch, timestamp, etc.)
pub mod build_info;

/// Profile-based configuration
pub mod config;

pub mod error;

/// Health checks for startup validation and CI
pub mod health;

/// Device snapshots, double buffers, providers and the input manager
pub mod input;

pub use config::AppConfig;
pub use error::{InputError, ProviderError};
pub use input::InputManager;
