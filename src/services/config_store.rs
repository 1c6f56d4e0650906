//! Settings persisted as TOML in the user's config directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, Settings};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "GITSHIP_CONFIG";

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$GITSHIP_CONFIG`, else `<config dir>/gitship/config.toml`.
    pub fn locate() -> Result<Self, AppError> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(Self::new(path));
        }
        let dir = dirs::config_dir()
            .ok_or_else(|| AppError::config_error("Could not determine the config directory"))?;
        Ok(Self::new(dir.join("gitship").join("config.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored settings, or defaults when no file exists yet.
    pub fn load(&self) -> Result<Settings, AppError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Settings::parse_toml(&content).map_err(|err| {
            AppError::config_error(format!("Invalid config at {}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<(), AppError> {
        settings.validate()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, settings.to_toml()?)?;
        restrict_permissions(&self.path)?;
        tracing::debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

/// The file may hold API keys, so only the owner can read it.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), AppError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), AppError> {
    Ok(())
}
