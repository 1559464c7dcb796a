//! Passphrase gate guarding every surface.
//!
//! The gate is an explicit session object: `from_env` initializes it,
//! `attempt` authorizes, `revoke` locks again. A successful attempt persists
//! a marker file in the data directory so the grant survives restarts.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable holding the shared passphrase. When unset the gate
/// is disabled and every session starts authorized.
pub(crate) const PASSPHRASE_VAR: &str = "GRANTTUI_PASSPHRASE";

const MARKER_FILE: &str = "session";

pub(crate) struct AccessGate {
    marker_path: PathBuf,
    passphrase: Option<String>,
    authorized: bool,
}

impl AccessGate {
    pub(crate) fn from_env(data_dir: &Path) -> Self {
        let passphrase = std::env::var(PASSPHRASE_VAR).ok().filter(|s| !s.is_empty());
        Self::new(data_dir, passphrase)
    }

    pub(crate) fn new(data_dir: &Path, passphrase: Option<String>) -> Self {
        let marker_path = data_dir.join(MARKER_FILE);
        let authorized = passphrase.is_none() || marker_path.exists();
        Self {
            marker_path,
            passphrase,
            authorized,
        }
    }

    pub(crate) fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Compares the entered passphrase against the configured one and
    /// persists the grant on success. Returns whether access was granted.
    pub(crate) fn attempt(&mut self, input: &str) -> Result<bool> {
        let granted = match &self.passphrase {
            None => true,
            Some(secret) => secret == input,
        };
        if granted {
            std::fs::write(&self.marker_path, "authorized\n").with_context(|| {
                format!("Failed to persist session: {}", self.marker_path.display())
            })?;
            self.authorized = true;
        }
        Ok(granted)
    }

    /// Locks the gate and forgets the persisted grant.
    pub(crate) fn revoke(&mut self) -> Result<()> {
        self.authorized = false;
        if self.marker_path.exists() {
            std::fs::remove_file(&self.marker_path).with_context(|| {
                format!("Failed to clear session: {}", self.marker_path.display())
            })?;
        }
        Ok(())
    }
}
