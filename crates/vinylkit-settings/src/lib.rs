//! Configuration and settings management for Vinylkit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Connection settings (port, baud rate, streaming pace)
//! - Cutting defaults (feed rate, blade pressure, Z heights, sampling)

pub mod config;
pub mod error;

pub use config::{Config, ConnectionSettings, CuttingSettings};
pub use error::{Result, SettingsError};
