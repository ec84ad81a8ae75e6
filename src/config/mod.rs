//! Configuration module for tripsplit
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TripsplitPaths;
pub use settings::Settings;
