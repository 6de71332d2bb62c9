//! Sample config objects the CLI registers, one per role.

use serde::Serialize;
use tracing::debug;

use sideconf_config::SpecBuilder;
use sideconf_registry::{ConfigObject, ConfigRegistry, ValueBinder};

pub const DEMO_MOD_ID: &str = "demo";

pub type DemoRegistry = ConfigRegistry<DemoClientConfig, DemoServerConfig>;

#[derive(Debug, Clone, Serialize)]
pub struct DemoClientConfig {
    pub hud_scale: f64,
    pub show_tooltips: bool,
    pub theme: String,
    /// Times the file was (re)applied.
    #[serde(skip)]
    pub reloads: u32,
}

impl Default for DemoClientConfig {
    fn default() -> Self {
        Self {
            hud_scale: 1.0,
            show_tooltips: true,
            theme: "dark".into(),
            reloads: 0,
        }
    }
}

impl ConfigObject for DemoClientConfig {
    fn setup_config(&mut self, builder: &mut SpecBuilder, binder: &ValueBinder<'_, Self>) {
        builder.comment("Display settings").push("display");
        let hud_scale = builder.define_in_range("hud_scale", self.hud_scale, 0.5, 4.0);
        let show_tooltips = builder.define("show_tooltips", self.show_tooltips);
        let theme = builder.define("theme", self.theme.clone());
        builder.pop();

        binder.bind(&hud_scale, |cfg, v| cfg.hud_scale = v);
        binder.bind(&show_tooltips, |cfg, v| cfg.show_tooltips = v);
        binder.bind(&theme, |cfg, v| cfg.theme = v);
    }

    fn after_config_reload(&mut self) {
        self.reloads += 1;
        debug!(reloads = self.reloads, "client config refreshed");
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoServerConfig {
    pub max_players: i64,
    pub motd: String,
    pub spawn_protection: i64,
    pub allowed_dimensions: Vec<String>,
}

impl Default for DemoServerConfig {
    fn default() -> Self {
        Self {
            max_players: 20,
            motd: "A sideconf server".into(),
            spawn_protection: 16,
            allowed_dimensions: vec!["overworld".into(), "nether".into()],
        }
    }
}

impl ConfigObject for DemoServerConfig {
    fn setup_config(&mut self, builder: &mut SpecBuilder, binder: &ValueBinder<'_, Self>) {
        builder.comment("Connection limits").push("limits");
        let max_players = builder.define_in_range("max_players", self.max_players, 1, 1000);
        let spawn_protection = builder.define_in_range("spawn_protection", self.spawn_protection, 0, 256);
        builder.pop();

        builder.push("world");
        let motd = builder.define("motd", self.motd.clone());
        let allowed_dimensions = builder.define("allowed_dimensions", self.allowed_dimensions.clone());
        builder.pop();

        binder.bind(&max_players, |cfg, v| cfg.max_players = v);
        binder.bind(&spawn_protection, |cfg, v| cfg.spawn_protection = v);
        binder.bind(&motd, |cfg, v| cfg.motd = v);
        binder.bind(&allowed_dimensions, |cfg, v| cfg.allowed_dimensions = v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sideconf_config::ConfigTracker;
    use sideconf_core::{ConfigEventBus, PhysicalSide, Role};

    #[test]
    fn test_demo_defaults_round_through_registration() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = ConfigTracker::new(dir.path(), ConfigEventBus::default());
        let registry = DemoRegistry::new(
            &PhysicalSide::Client,
            DemoClientConfig::default,
            DemoServerConfig::default,
        );
        registry.add_configs(DEMO_MOD_ID, tracker.events(), &tracker).unwrap();

        let client = registry.client().unwrap().read();
        assert_eq!(client.reloads, 1);
        assert_eq!(client.theme, "dark");

        let defaults = tracker.default_table(DEMO_MOD_ID, Role::Server).unwrap();
        assert_eq!(defaults["limits"]["max_players"].as_integer(), Some(20));
        assert_eq!(defaults["world"]["motd"].as_str(), Some("A sideconf server"));
    }

    #[test]
    fn test_demo_server_reads_nested_sections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("demo-server.toml"),
            "[limits]\nmax_players = 64\n\n[world]\nallowed_dimensions = [\"end\"]\n",
        )
        .unwrap();
        let tracker = ConfigTracker::new(dir.path(), ConfigEventBus::default());
        let registry = DemoRegistry::new(
            &PhysicalSide::DedicatedServer,
            DemoClientConfig::default,
            DemoServerConfig::default,
        );
        registry.add_configs(DEMO_MOD_ID, tracker.events(), &tracker).unwrap();

        let server = registry.server().read();
        assert_eq!(server.max_players, 64);
        assert_eq!(server.spawn_protection, 16);
        assert_eq!(server.allowed_dimensions, vec!["end".to_string()]);
    }
}
