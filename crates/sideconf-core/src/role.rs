use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which environment a config file, callback list or event belongs to.
///
/// Only `Client` and `Server` are backed by a registry instance. `Common` is
/// understood by hosts but rejected wherever a registry has to resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Common,
    Server,
}

impl Role {
    /// File-name and log label for this role.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Common => "common",
            Self::Server => "server",
        }
    }

    /// Name used when no explicit file name was configured, e.g. `mymod-client.toml`.
    pub fn default_file_name(self, mod_id: &str) -> String {
        format!("{mod_id}-{}.toml", self.extension())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "common" => Ok(Self::Common),
            "server" => Ok(Self::Server),
            other => Err(format!("unknown config role: {other}")),
        }
    }
}
