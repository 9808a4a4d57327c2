//! Configuration loading and scratch folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// TOML-backed service configuration file
///
/// Loaded from the platform config directory; every field is optional so a
/// partial file overrides only what it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Scratch folder for transient uploads and artifacts
    pub scratch_folder: Option<String>,
    /// Address the HTTP server binds to (e.g. "127.0.0.1:5841")
    pub bind_addr: Option<String>,
}

impl TomlConfig {
    /// Load the TOML config for a service, if one exists
    pub fn load(service_name: &str) -> Result<Option<TomlConfig>> {
        let Some(path) = config_file_path(service_name) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        Ok(Some(config))
    }
}

/// Default configuration file path for a service on this platform
pub fn config_file_path(service_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("verilens").join(format!("{}.toml", service_name)))
}

/// Scratch folder resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_scratch_folder(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_config: Option<&TomlConfig>,
) -> PathBuf {
    if let Some(path) = cli_arg {
        info!("Scratch folder from command line: {}", path);
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(env_var_name) {
        info!("Scratch folder from {}: {}", env_var_name, path);
        return PathBuf::from(path);
    }

    if let Some(path) = toml_config.and_then(|c| c.scratch_folder.as_deref()) {
        info!("Scratch folder from TOML config: {}", path);
        return PathBuf::from(path);
    }

    let default = default_scratch_folder();
    info!("Scratch folder default: {}", default.display());
    default
}

/// OS-dependent default scratch folder
fn default_scratch_folder() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("verilens"))
        .unwrap_or_else(|| std::env::temp_dir().join("verilens"))
}

/// Create the scratch folder if it does not exist
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!("Created scratch folder: {}", path.display());
    } else if !path.is_dir() {
        return Err(Error::Config(format!(
            "Scratch folder path exists but is not a directory: {}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_arg_takes_priority() {
        let toml = TomlConfig {
            scratch_folder: Some("/from/toml".into()),
            bind_addr: None,
        };
        let resolved = resolve_scratch_folder(
            Some("/from/cli"),
            "VERILENS_TEST_UNSET_VAR",
            Some(&toml),
        );
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn toml_used_when_no_cli_or_env() {
        let toml = TomlConfig {
            scratch_folder: Some("/from/toml".into()),
            bind_addr: None,
        };
        let resolved =
            resolve_scratch_folder(None, "VERILENS_TEST_UNSET_VAR", Some(&toml));
        assert_eq!(resolved, PathBuf::from("/from/toml"));
    }

    #[test]
    fn default_when_nothing_configured() {
        let resolved = resolve_scratch_folder(None, "VERILENS_TEST_UNSET_VAR", None);
        assert!(resolved.ends_with("verilens"));
    }
}
