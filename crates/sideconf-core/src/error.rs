use std::path::PathBuf;
use thiserror::Error;

use crate::role::Role;

/// Unified error type for the sideconf crates.
#[derive(Error, Debug)]
pub enum SideconfError {
    // ── Registry errors ────────────────────────────────────────
    #[error("{0} config type not supported")]
    UnsupportedRole(Role),

    // ── Host errors ────────────────────────────────────────────
    #[error("config registration failed: {mod_id}/{role}: {reason}")]
    Registration {
        mod_id: String,
        role: Role,
        reason: String,
    },

    #[error("no config registered for {mod_id}/{role}")]
    NotRegistered { mod_id: String, role: Role },

    #[error("file watcher error: {0}")]
    Watch(String),

    // ── Store errors ───────────────────────────────────────────
    #[error("invalid config declaration: {0}")]
    Spec(String),

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SideconfError>;
