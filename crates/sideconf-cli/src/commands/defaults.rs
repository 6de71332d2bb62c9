use parking_lot::Mutex;
use toml::Table;

use sideconf_config::{ConfigRegistrar, ConfigSpec};
use sideconf_core::{ConfigEventBus, PhysicalSide, Result, Role, SideconfError};

use crate::demo::{DemoClientConfig, DemoRegistry, DemoServerConfig};

/// Registrar that keeps specs in memory and never reads a file.
#[derive(Default)]
struct SpecCollector {
    specs: Mutex<Vec<(Role, ConfigSpec)>>,
}

impl ConfigRegistrar for SpecCollector {
    fn register_config(
        &self,
        _mod_id: &str,
        role: Role,
        spec: ConfigSpec,
        _file_name: Option<&str>,
    ) -> Result<()> {
        self.specs.lock().push((role, spec));
        Ok(())
    }
}

/// Declared defaults of the demo config for `role`, whatever is on disk.
pub(super) fn declared_defaults(mod_id: &str, role: Role) -> Result<Table> {
    // Both objects only exist on a client.
    let registry = DemoRegistry::new(
        &PhysicalSide::Client,
        DemoClientConfig::default,
        DemoServerConfig::default,
    );
    let collector = SpecCollector::default();
    registry.add_configs(mod_id, &ConfigEventBus::default(), &collector)?;

    let specs = collector.specs.lock();
    specs
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, spec)| spec.default_table())
        .ok_or(SideconfError::UnsupportedRole(role))
}

pub(super) fn cmd_defaults(mod_id: &str, role: Role) -> Result<()> {
    let table = declared_defaults(mod_id, role)?;
    println!(
        "{}",
        toml::to_string_pretty(&table).map_err(|e| SideconfError::Other(e.into()))?
    );
    Ok(())
}
