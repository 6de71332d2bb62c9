//! # sideconf-config
//!
//! The config store behind a registry: a [`SpecBuilder`] that config objects
//! declare their fields into, typed [`ConfigValue`] handles that read the
//! loaded TOML, and the [`ConfigTracker`] that maps specs to files, loads
//! them and announces (re)loads on a [`sideconf_core::ConfigEventBus`].
//!
//! Supports hot-reload via filesystem watcher.

pub mod builder;
pub mod spec;
pub mod tracker;
pub mod value;

pub use builder::{SpecBuilder, SpecEntry};
pub use spec::ConfigSpec;
pub use tracker::{ConfigRegistrar, ConfigTracker};
pub use value::{ConfigValue, ConfigValueType};
