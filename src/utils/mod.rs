//! Configuration utilities

pub mod config;

pub use config::{CompassConfig, ConfigError, ConfigResult, ConfigurationManager, LayoutConfig, TimingConfig};
