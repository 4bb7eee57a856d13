use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "TEXKIT_CONFIG_DIR";
pub const ENV_CONFIG_FILE: &str = "TEXKIT_CONFIG";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "Texkit";
const APPLICATION: &str = "texkit";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl AppPaths {
    /// Resolves the configuration file: the explicit path wins, then the
    /// `TEXKIT_CONFIG` variable, then `config.toml` in the config directory.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let config_dir = match env_override(ENV_CONFIG_DIR) {
            Some(dir) => dir,
            None => ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
                .ok_or_else(|| anyhow!("failed to determine user directories"))?
                .config_dir()
                .to_path_buf(),
        };

        let config_file = explicit
            .map(Path::to_path_buf)
            .or_else(|| env_override(ENV_CONFIG_FILE))
            .unwrap_or_else(|| config_dir.join(CONFIG_FILE_NAME));

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.as_os_str().is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}
