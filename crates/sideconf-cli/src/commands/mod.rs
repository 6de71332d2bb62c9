use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use sideconf_config::ConfigTracker;
use sideconf_core::{ConfigEventBus, PhysicalSide, Result, Role, SideconfError};

use crate::demo::{DEMO_MOD_ID, DemoClientConfig, DemoRegistry, DemoServerConfig};

mod defaults;
mod watch;

/// sideconf: client and server config files that follow their sources
#[derive(Parser)]
#[command(name = "sideconf", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the config files (default: $SIDECONF_CONFIG_DIR, then the user config dir)
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// File name for the client config (default: <mod-id>-client.toml)
    #[arg(long, global = true)]
    client_file: Option<String>,

    /// File name for the server config (default: <mod-id>-server.toml)
    #[arg(long, global = true)]
    server_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the configs and print the values that were applied
    Check {
        #[command(flatten)]
        target: Target,

        /// Output as JSON
        #[arg(long)]
        json_output: bool,
    },
    /// Print the default file contents for a role
    Defaults {
        /// client or server
        #[arg(short, long)]
        role: Role,

        /// Mod id the config is registered under
        #[arg(short, long, default_value = DEMO_MOD_ID)]
        mod_id: String,
    },
    /// Load the configs, then reload them whenever their files change
    Watch {
        #[command(flatten)]
        target: Target,

        /// Output as JSON
        #[arg(long)]
        json_output: bool,
    },
}

#[derive(clap::Args)]
struct Target {
    /// Mod id the configs are registered under
    #[arg(short, long, default_value = DEMO_MOD_ID)]
    mod_id: String,

    /// Runtime side: client or server (default: $SIDECONF_SIDE, then client)
    #[arg(short, long)]
    side: Option<PhysicalSide>,
}

/// Loaded values of both objects, as printed by `check` and `watch`.
#[derive(Serialize)]
struct Snapshot<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    client: Option<&'a DemoClientConfig>,
    server: &'a DemoServerConfig,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Resolve log level: --verbose > --quiet > --log-level > default
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or("info")
        };

        if self.json {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
                )
                .json()
                .with_target(true)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
                )
                .with_target(false)
                .init();
        }

        match &self.command {
            Commands::Check {
                target,
                json_output,
            } => {
                let (_, registry) = self.load(&target.mod_id, target.side)?;
                print_snapshot(&registry, *json_output)
            }
            Commands::Defaults { role, mod_id } => self.cmd_defaults(*role, mod_id),
            Commands::Watch {
                target,
                json_output,
            } => {
                let (tracker, registry) = self.load(&target.mod_id, target.side)?;
                watch::cmd_watch(tracker, registry, *json_output).await
            }
        }
    }

    fn tracker(&self) -> Arc<ConfigTracker> {
        let dir = ConfigTracker::resolve_dir(self.config_dir.as_deref());
        Arc::new(ConfigTracker::new(dir, ConfigEventBus::default()))
    }

    /// Build the demo registry for `side` and register it with a fresh tracker.
    fn load(&self, mod_id: &str, side: Option<PhysicalSide>) -> Result<(Arc<ConfigTracker>, DemoRegistry)> {
        let side = side.unwrap_or_else(PhysicalSide::detect);
        let tracker = self.tracker();

        let mut registry = DemoRegistry::new(&side, DemoClientConfig::default, DemoServerConfig::default);
        if let Some(name) = &self.client_file {
            registry.set_client_file_name(name.as_str());
        }
        if let Some(name) = &self.server_file {
            registry.set_server_file_name(name.as_str());
        }
        registry.add_configs(mod_id, tracker.events(), &*tracker)?;

        for path in tracker.tracked_files() {
            let state = if path.exists() { "found" } else { "missing, defaults used" };
            eprintln!("{}: {state}", path.display());
        }
        Ok((tracker, registry))
    }

    /// Print declared defaults. Files under the config dir are never read.
    fn cmd_defaults(&self, role: Role, mod_id: &str) -> Result<()> {
        defaults::cmd_defaults(mod_id, role)
    }
}

fn print_snapshot(registry: &DemoRegistry, json: bool) -> Result<()> {
    let client = registry.client().map(|c| c.read());
    let server = registry.server().read();
    let snapshot = Snapshot {
        client: client.as_deref(),
        server: &server,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).map_err(|e| SideconfError::Other(e.into()))?
        );
    } else {
        println!(
            "{}",
            toml::to_string_pretty(&snapshot).map_err(|e| SideconfError::Other(e.into()))?
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_with_globals() {
        let cli = Cli::try_parse_from([
            "sideconf",
            "--config-dir",
            "/tmp/conf",
            "check",
            "--side",
            "server",
            "--mod-id",
            "other",
            "--server-file",
            "srv.toml",
        ])
        .unwrap();

        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/conf")));
        assert_eq!(cli.server_file.as_deref(), Some("srv.toml"));
        match cli.command {
            Commands::Check { target, json_output } => {
                assert_eq!(target.mod_id, "other");
                assert_eq!(target.side, Some(PhysicalSide::DedicatedServer));
                assert!(!json_output);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_parse_defaults_role() {
        let cli = Cli::try_parse_from(["sideconf", "defaults", "--role", "client"]).unwrap();
        match cli.command {
            Commands::Defaults { role, mod_id } => {
                assert_eq!(role, Role::Client);
                assert_eq!(mod_id, DEMO_MOD_ID);
            }
            _ => panic!("expected defaults"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["sideconf", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn test_unknown_side_is_rejected() {
        assert!(Cli::try_parse_from(["sideconf", "check", "--side", "proxy"]).is_err());
    }
}
