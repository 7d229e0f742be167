use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

const VAULT_DIR: &str = ".pwvault";
const MASTER_FILE: &str = "master.txt";
const SECURITY_FILE: &str = "security.txt";
const DATABASE_FILE: &str = "passwords.txt";
const EXPORT_FILE: &str = "exported_passwords.txt";
const HISTORY_FILE: &str = "history";
const LOG_FILE: &str = "pwvault.log";

/// Locations of every file the vault reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub dir: PathBuf,
    pub master: PathBuf,
    pub security: PathBuf,
    pub database: PathBuf,
    pub export: PathBuf,
    pub history: PathBuf,
    pub log: PathBuf,
}

impl VaultPaths {
    /// Lays out the vault files under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            master: dir.join(MASTER_FILE),
            security: dir.join(SECURITY_FILE),
            database: dir.join(DATABASE_FILE),
            export: dir.join(EXPORT_FILE),
            history: dir.join(HISTORY_FILE),
            log: dir.join(LOG_FILE),
            dir,
        }
    }

    /// `~/.pwvault`, or `dir` when one is given.
    pub fn resolve(dir: Option<PathBuf>) -> Result<Self> {
        let dir = match dir {
            Some(dir) => dir,
            None => dirs_next::home_dir()
                .map(|home| home.join(VAULT_DIR))
                .ok_or_else(|| anyhow!("Could not determine home directory"))?,
        };
        Ok(Self::in_dir(dir))
    }

    /// Creates the vault directory if it is missing.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&self.dir, std::fs::Permissions::from_mode(0o700))?;
            }
        }
        Ok(())
    }
}
