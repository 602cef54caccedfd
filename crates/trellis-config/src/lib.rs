//! Configuration management for Trellis.
//!
//! Parses `trellis.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Programmatic settings can be applied during load via [`Overrides`],
//! taking precedence over file values.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "trellis.toml";

/// Programmatic settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded
/// config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override the maximum partial nesting depth.
    pub max_depth: Option<usize>,
    /// Override the content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override the site base URL.
    pub base_url: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Partial rendering configuration.
    pub render: RenderConfig,
    /// Content discovery configuration (paths are relative strings from
    /// TOML).
    content: ContentConfigRaw,
    /// Site-wide configuration.
    pub site: SiteConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Partial rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum partial nesting depth before a render is aborted.
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { max_depth: 10 }
    }
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Source directory for content files.
    pub source_dir: PathBuf,
}

/// Site-wide configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// Base URL prepended to generated links, when deployed under a
    /// subpath.
    pub base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Trellis Site".to_owned(),
            base_url: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `trellis.toml` in the current directory and parents,
    /// falling back to defaults when nothing is found.
    ///
    /// Overrides are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, the
    /// file cannot be read or parsed, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply programmatic overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(max_depth) = overrides.max_depth {
            self.render.max_depth = max_depth;
        }
        if let Some(source_dir) = &overrides.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(base_url) = &overrides.base_url {
            self.site.base_url = Some(base_url.clone());
        }
    }

    /// Search for the config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create a default config with paths relative to the working
    /// directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create a default config with paths relative to a base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            render: RenderConfig::default(),
            content: ContentConfigRaw::default(),
            site: SiteConfig::default(),
            content_resolved: ContentConfig {
                source_dir: base.join("content"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.max_depth == 0 {
            return Err(ConfigError::Validation(
                "render.max_depth must be greater than 0".to_owned(),
            ));
        }
        if self.site.title.is_empty() {
            return Err(ConfigError::Validation(
                "site.title cannot be empty".to_owned(),
            ));
        }
        if let Some(base_url) = &self.site.base_url
            && !base_url.starts_with('/')
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "site.base_url must be an absolute path or http(s) URL".to_owned(),
            ));
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on the config
    /// directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.content_resolved = ContentConfig {
            source_dir: config_dir.join(self.content.source_dir.as_deref().unwrap_or("content")),
        };
    }
}
