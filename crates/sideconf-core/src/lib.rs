//! # sideconf-core
//!
//! Shared vocabulary for the sideconf workspace: config roles, the unified
//! error type, load/reload events and the runtime side probe.

pub mod environment;
pub mod error;
pub mod event;
pub mod role;

pub use environment::{PhysicalSide, RuntimeEnvironment};
pub use error::{Result, SideconfError};
pub use event::{ConfigEvent, ConfigEventBus, ConfigEventHandler, ConfigEventSource, ConfigPhase};
pub use role::Role;
