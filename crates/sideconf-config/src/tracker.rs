use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use sideconf_core::{ConfigEvent, ConfigEventBus, Result, Role, SideconfError};

use crate::spec::ConfigSpec;

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV_VAR: &str = "SIDECONF_CONFIG_DIR";

/// The host side of registration: takes ownership of a built spec and
/// becomes responsible for populating it.
pub trait ConfigRegistrar {
    /// Register `spec` for `(mod_id, role)`. `file_name` of `None` selects the
    /// role's default name.
    fn register_config(
        &self,
        mod_id: &str,
        role: Role,
        spec: ConfigSpec,
        file_name: Option<&str>,
    ) -> Result<()>;
}

#[derive(Debug)]
struct TrackedConfig {
    mod_id: String,
    role: Role,
    file_name: String,
    spec: ConfigSpec,
}

/// File-backed registrar: one TOML file per registered spec, all in one
/// directory, with load and reload announced on a [`ConfigEventBus`].
///
/// Registration loads the file immediately and posts a `Loading` event, so
/// bound save actions run once before `register_config` returns.
#[derive(Debug)]
pub struct ConfigTracker {
    config_dir: PathBuf,
    events: ConfigEventBus,
    configs: RwLock<Vec<Arc<TrackedConfig>>>,
}

impl ConfigTracker {
    /// Resolve the config directory: explicit path > SIDECONF_CONFIG_DIR env > <config dir>/sideconf
    pub fn resolve_dir(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var(CONFIG_DIR_ENV_VAR) {
            return PathBuf::from(p);
        }
        dirs::config_dir()
            .map(|dir| dir.join("sideconf"))
            .unwrap_or_else(|| PathBuf::from("config"))
    }

    pub fn new(config_dir: impl Into<PathBuf>, events: ConfigEventBus) -> Self {
        Self {
            config_dir: config_dir.into(),
            events,
            configs: RwLock::new(Vec::new()),
        }
    }

    pub fn events(&self) -> &ConfigEventBus {
        &self.events
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// File name the spec for `(mod_id, role)` was registered under.
    pub fn file_name(&self, mod_id: &str, role: Role) -> Option<String> {
        self.find(mod_id, role).map(|c| c.file_name.clone())
    }

    pub fn file_path(&self, mod_id: &str, role: Role) -> Option<PathBuf> {
        self.file_name(mod_id, role)
            .map(|name| self.config_dir.join(name))
    }

    /// Every tracked file, in registration order.
    pub fn tracked_files(&self) -> Vec<PathBuf> {
        self.configs
            .read()
            .iter()
            .map(|c| self.config_dir.join(&c.file_name))
            .collect()
    }

    /// Declared defaults of a registered spec, as a TOML table.
    pub fn default_table(&self, mod_id: &str, role: Role) -> Option<toml::Table> {
        self.find(mod_id, role).map(|c| c.spec.default_table())
    }

    fn find(&self, mod_id: &str, role: Role) -> Option<Arc<TrackedConfig>> {
        self.configs
            .read()
            .iter()
            .find(|c| c.mod_id == mod_id && c.role == role)
            .cloned()
    }

    fn read_into(&self, tracked: &TrackedConfig) -> Result<()> {
        let path = self.config_dir.join(&tracked.file_name);
        if !path.exists() {
            debug!(?path, "config file not found, using defaults");
            tracked.spec.reset();
            return Ok(());
        }
        let raw = std::fs::read_to_string(&path)?;
        tracked.spec.load_str(&raw, &path)
    }

    /// Re-read the file for `(mod_id, role)` and post a `Reloading` event.
    ///
    /// If the file no longer parses, the previously loaded values stay in
    /// place and no event is posted.
    pub fn reload(&self, mod_id: &str, role: Role) -> Result<()> {
        let tracked = self
            .find(mod_id, role)
            .ok_or_else(|| SideconfError::NotRegistered {
                mod_id: mod_id.to_string(),
                role,
            })?;
        self.read_into(&tracked)?;
        info!(mod_id, role = %role, "configuration reloaded");
        self.events.post(ConfigEvent::reloading(mod_id, role))
    }

    /// Reload whichever spec is stored in `file_name`. Returns `false` if the
    /// file is not tracked.
    pub fn reload_file(&self, file_name: &str) -> Result<bool> {
        let tracked = self
            .configs
            .read()
            .iter()
            .find(|c| c.file_name == file_name)
            .cloned();
        match tracked {
            Some(tracked) => {
                self.reload(&tracked.mod_id, tracked.role)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Start a background file watcher that reloads tracked files when they change.
    /// Returns a handle to the watcher (must be kept alive for watching to continue).
    pub fn watch(self: &Arc<Self>) -> Result<RecommendedWatcher> {
        let tracker = Arc::clone(self);

        info!(config_dir = ?self.config_dir, "starting config file watcher");

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<NotifyEvent, notify::Error>| match res {
                Ok(event) => {
                    // Only react to modify/create events
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        return;
                    }
                    for path in &event.paths {
                        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                            continue;
                        };
                        match tracker.reload_file(name) {
                            Ok(true) => debug!(file = name, "config file hot-reloaded"),
                            Ok(false) => {}
                            Err(e) => {
                                warn!(file = name, error = %e, "config file has errors, keeping current config");
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "file watcher error");
                }
            },
        )
        .map_err(|e| SideconfError::Watch(format!("failed to create file watcher: {e}")))?;

        // Watch the directory, not the files (some editors create temp files + rename)
        std::fs::create_dir_all(&self.config_dir)?;
        watcher
            .watch(&self.config_dir, RecursiveMode::NonRecursive)
            .map_err(|e| SideconfError::Watch(format!("failed to watch config directory: {e}")))?;

        Ok(watcher)
    }
}

impl ConfigRegistrar for ConfigTracker {
    fn register_config(
        &self,
        mod_id: &str,
        role: Role,
        spec: ConfigSpec,
        file_name: Option<&str>,
    ) -> Result<()> {
        let file_name = match file_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => role.default_file_name(mod_id),
        };
        let registration_error = |reason: String| SideconfError::Registration {
            mod_id: mod_id.to_string(),
            role,
            reason,
        };
        // The watcher only sees the top level of the config directory.
        if !is_plain_file_name(&file_name) {
            return Err(registration_error(format!(
                "file name {file_name} must not contain a directory"
            )));
        }

        let tracked = {
            let mut configs = self.configs.write();
            if configs.iter().any(|c| c.mod_id == mod_id && c.role == role) {
                return Err(registration_error("already registered".into()));
            }
            if let Some(owner) = configs.iter().find(|c| c.file_name == file_name) {
                return Err(registration_error(format!(
                    "file {file_name} already used by {}/{}",
                    owner.mod_id, owner.role
                )));
            }
            let tracked = Arc::new(TrackedConfig {
                mod_id: mod_id.to_string(),
                role,
                file_name,
                spec,
            });
            configs.push(Arc::clone(&tracked));
            tracked
        };

        info!(mod_id, role = %role, file = %tracked.file_name, "registered config");
        self.read_into(&tracked)?;
        self.events.post(ConfigEvent::loading(mod_id, role))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
