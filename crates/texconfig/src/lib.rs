use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use gfxmath::{Color, ColorError};
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TexkitConfig {
    pub version: u32,
    #[serde(default)]
    pub upload: UploadSettings,
    /// User color names mapped to a color name or hex code.
    #[serde(default)]
    pub palette: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadSettings {
    #[serde(default)]
    pub prefer_float: bool,
    #[serde(default = "default_flip_vertical")]
    pub flip_vertical: bool,
}

fn default_flip_vertical() -> bool {
    true
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            prefer_float: false,
            flip_vertical: default_flip_vertical(),
        }
    }
}

impl Default for TexkitConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            upload: UploadSettings::default(),
            palette: BTreeMap::new(),
        }
    }
}

impl TexkitConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: TexkitConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            palette = config.palette.len(),
            "loaded texkit configuration"
        );
        Ok(config)
    }

    /// Like [`TexkitConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file; using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }

        for (name, value) in &self.palette {
            validate_palette_name(name)?;
            value.parse::<Color>().map_err(|err| {
                ConfigError::Invalid(format!("palette entry '{name}' is not a color: {err}"))
            })?;
        }

        Ok(())
    }

    /// Resolves a palette name (ignoring ASCII case) or falls back to a
    /// built-in color name or hex code. Palette entries shadow built-ins.
    pub fn resolve_color(&self, input: &str) -> Result<Color, ColorError> {
        let trimmed = input.trim();
        if let Some(value) = self.palette_value(trimmed) {
            tracing::debug!(name = trimmed, value, "resolved palette color");
            return value.parse();
        }
        trimmed.parse()
    }

    /// Every palette entry parsed into a color.
    pub fn palette_colors(&self) -> Result<BTreeMap<String, Color>, ColorError> {
        self.palette
            .iter()
            .map(|(name, value)| Ok((name.clone(), value.parse()?)))
            .collect()
    }

    fn palette_value(&self, name: &str) -> Option<&str> {
        self.palette
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn validate_palette_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "palette names may not be empty".into(),
        ));
    }

    if !name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(ConfigError::Invalid(format!(
            "palette name '{name}' is invalid; use ASCII letters, digits, '-' or '_'"
        )));
    }

    Ok(())
}
