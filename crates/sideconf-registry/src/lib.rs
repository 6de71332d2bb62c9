//! # sideconf-registry
//!
//! Holds one client and one server config object, declares them into specs
//! registered with the host, and writes reloaded values back into the
//! objects when the host announces a (re)load.
//!
//! The client object only exists when the process runs as a client.

pub mod binder;
pub mod callbacks;
pub mod object;
pub mod registry;

pub use binder::ValueBinder;
pub use callbacks::{Callback, CallbackList};
pub use object::ConfigObject;
pub use registry::{ConfigRegistry, Shared};
