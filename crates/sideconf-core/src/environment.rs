use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Environment variable consulted by [`PhysicalSide::detect`].
pub const SIDE_ENV_VAR: &str = "SIDECONF_SIDE";

/// Probe for the one runtime capability the registry needs.
pub trait RuntimeEnvironment {
    /// Is this process acting as a client?
    fn is_client(&self) -> bool;
}

/// The physical side this process runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalSide {
    #[default]
    Client,
    DedicatedServer,
}

impl PhysicalSide {
    /// Read the side from `SIDECONF_SIDE`, falling back to `Client`.
    pub fn detect() -> Self {
        match std::env::var(SIDE_ENV_VAR) {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!(value = %raw, error = %e, "unrecognised physical side, assuming client");
                Self::Client
            }),
            Err(_) => Self::Client,
        }
    }
}

impl RuntimeEnvironment for PhysicalSide {
    fn is_client(&self) -> bool {
        matches!(self, Self::Client)
    }
}

impl fmt::Display for PhysicalSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => f.write_str("client"),
            Self::DedicatedServer => f.write_str("dedicated_server"),
        }
    }
}

impl FromStr for PhysicalSide {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "server" | "dedicated_server" | "dedicated-server" => Ok(Self::DedicatedServer),
            other => Err(format!("unknown physical side: {other}")),
        }
    }
}
