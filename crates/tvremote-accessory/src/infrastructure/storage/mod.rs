//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the accessory configuration from a TOML
//! (or JSON) file, by default in the platform-appropriate config directory,
//! and falls back to defaults on first run when no file exists yet.

pub mod config;
