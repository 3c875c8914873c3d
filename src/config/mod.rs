// src/config/mod.rs

//! Configuration loading and validation for syncwatcher.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate paths and patterns, producing `WatchTarget`s (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{config_base_dir, load_and_validate, load_and_validate_with, load_from_path};
pub use model::{ConfigFile, RawConfigFile, RawWatchSetting, WatchTarget};
pub use validate::validate_config;
