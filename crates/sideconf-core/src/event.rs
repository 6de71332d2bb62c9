use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::role::Role;

/// Whether a config store is being populated for the first time or re-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigPhase {
    Loading,
    Reloading,
}

impl ConfigPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Reloading => "Reloading",
        }
    }
}

impl fmt::Display for ConfigPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Notification that the store behind `(mod_id, role)` has been (re)loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEvent {
    pub mod_id: String,
    pub role: Role,
    pub phase: ConfigPhase,
}

impl ConfigEvent {
    pub fn loading(mod_id: impl Into<String>, role: Role) -> Self {
        Self {
            mod_id: mod_id.into(),
            role,
            phase: ConfigPhase::Loading,
        }
    }

    pub fn reloading(mod_id: impl Into<String>, role: Role) -> Self {
        Self {
            mod_id: mod_id.into(),
            role,
            phase: ConfigPhase::Reloading,
        }
    }

    pub fn is_reload(&self) -> bool {
        self.phase == ConfigPhase::Reloading
    }
}

/// A synchronous event handler. An `Err` aborts dispatch of the current event.
pub type ConfigEventHandler = Arc<dyn Fn(&ConfigEvent) -> Result<()> + Send + Sync>;

/// Anything that delivers load/reload notifications to subscribed handlers.
pub trait ConfigEventSource {
    fn on_loading(&self, handler: ConfigEventHandler);
    fn on_reloading(&self, handler: ConfigEventHandler);
}

struct BusInner {
    loading: RwLock<Vec<ConfigEventHandler>>,
    reloading: RwLock<Vec<ConfigEventHandler>>,
    sender: broadcast::Sender<ConfigEvent>,
}

/// Event bus for config load/reload notifications.
///
/// Handlers run synchronously on the posting thread, in subscription order.
/// Once every handler has accepted an event it is also broadcast to passive
/// observers obtained through [`ConfigEventBus::subscribe`].
#[derive(Clone)]
pub struct ConfigEventBus {
    inner: Arc<BusInner>,
}

impl ConfigEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(BusInner {
                loading: RwLock::new(Vec::new()),
                reloading: RwLock::new(Vec::new()),
                sender,
            }),
        }
    }

    /// Deliver `event` to every handler of its phase, stopping at the first error.
    pub fn post(&self, event: ConfigEvent) -> Result<()> {
        // Snapshot so handlers may subscribe further handlers without deadlocking.
        let handlers = self.handlers(event.phase).read().clone();
        for handler in &handlers {
            handler(&event)?;
        }
        // Ignore send errors (no observers).
        let _ = self.inner.sender.send(event);
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConfigEvent> {
        self.inner.sender.subscribe()
    }

    pub fn handler_count(&self, phase: ConfigPhase) -> usize {
        self.handlers(phase).read().len()
    }

    fn handlers(&self, phase: ConfigPhase) -> &RwLock<Vec<ConfigEventHandler>> {
        match phase {
            ConfigPhase::Loading => &self.inner.loading,
            ConfigPhase::Reloading => &self.inner.reloading,
        }
    }
}

impl ConfigEventSource for ConfigEventBus {
    fn on_loading(&self, handler: ConfigEventHandler) {
        self.inner.loading.write().push(handler);
    }

    fn on_reloading(&self, handler: ConfigEventHandler) {
        self.inner.reloading.write().push(handler);
    }
}

impl Default for ConfigEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl fmt::Debug for ConfigEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEventBus")
            .field("loading", &self.handler_count(ConfigPhase::Loading))
            .field("reloading", &self.handler_count(ConfigPhase::Reloading))
            .finish()
    }
}
