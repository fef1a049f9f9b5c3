//! Tessera Services Layer
//!
//! Host-facing services around the ECS core. Currently engine settings.

pub mod settings;

pub use settings::{Settings, SettingsError};
