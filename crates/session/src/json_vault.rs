//! File-backed vault.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::vault::{CredentialVault, StoredCredentials, VaultError};

/// Credentials kept as one JSON document on disk.
///
/// Writes go to a sibling temp file first and are renamed into place, so the
/// record on disk is always either the previous set or the new one, never a
/// torn write.
#[derive(Debug)]
pub struct JsonFileVault {
    path: PathBuf,
}

impl JsonFileVault {
    /// Vault at the platform's default location, e.g.
    /// `~/.local/share/agrotrace/session.json` on Linux.
    pub fn open_default() -> Result<Self, VaultError> {
        let base = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
            .ok_or(VaultError::NoDataDir)?;

        let dir = base.join("agrotrace");
        fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join("session.json"),
        })
    }

    /// Vault at an explicit path. The parent directory must already exist.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl CredentialVault for JsonFileVault {
    fn load(&self) -> Option<StoredCredentials> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "session file unreadable, treating as signed out: {err:?}"
                );
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(credentials) => Some(credentials),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "session file corrupt, treating as signed out: {err:?}"
                );
                None
            }
        }
    }

    fn store(&self, credentials: &StoredCredentials) -> Result<(), VaultError> {
        let json = serde_json::to_vec_pretty(credentials)?;

        let tmp = self.tmp_path();
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), VaultError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
