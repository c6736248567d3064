//! Configuration management for navcache.
//!
//! Parses `navcache.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [site]
//! languages = ["en", "nl"]
//! multi_language = true
//!
//! [source]
//! dir = "data"
//!
//! [output]
//! dir = "cache/navigation"
//! ```
//!
//! ## Path Expansion
//!
//! `source.dir` and `output.dir` support `~`, `$VAR`, `${VAR}` and
//! `${VAR:-default}`. Relative paths are resolved against the directory of
//! the config file.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the languages to build.
    pub languages: Option<Vec<String>>,
    /// Override the page source directory.
    pub source_dir: Option<PathBuf>,
    /// Override the artifact output directory.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "navcache.toml";

/// Language built when none is configured.
const DEFAULT_LANGUAGE: &str = "en";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration as parsed from TOML.
    site: SiteConfigRaw,
    /// Source configuration (path is a relative string from TOML).
    source: DirConfigRaw,
    /// Output configuration (path is a relative string from TOML).
    output: DirConfigRaw,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Directory holding `pages.json` and `extras.json` (set after loading).
    #[serde(skip)]
    pub source_dir: PathBuf,
    /// Directory the artifacts are published to (set after loading).
    #[serde(skip)]
    pub output_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    languages: Option<Vec<String>>,
    multi_language: Option<bool>,
}

/// Raw directory section as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DirConfigRaw {
    dir: Option<String>,
}

/// Resolved site configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Languages to build, in configuration order.
    pub languages: Vec<String>,
    /// Prefix every URL with `/{language}`.
    pub multi_language: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            languages: vec![DEFAULT_LANGUAGE.to_owned()],
            multi_language: false,
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`source.dir`").
        field: String,
        /// Error message (e.g., "${`SITE_ROOT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `navcache.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. Overriding the
    /// languages of a loaded config file does not change `multi_language`,
    /// which follows the site. Without a config file, `multi_language` is set
    /// when more than one language is given.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
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

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(languages) = &settings.languages {
            self.site_resolved.languages.clone_from(languages);
            if self.config_path.is_none() {
                self.site_resolved.multi_language = languages.len() > 1;
            }
        }
        if let Some(source_dir) = &settings.source_dir {
            self.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.output_dir.clone_from(output_dir);
        }
    }

    /// Search for config file in current directory and parents.
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            source: DirConfigRaw::default(),
            output: DirConfigRaw::default(),
            site_resolved: SiteConfig::default(),
            source_dir: base.join("data"),
            output_dir: base.join(".navcache").join("navigation"),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically at the end of [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let languages = &self.site_resolved.languages;
        if languages.is_empty() {
            return Err(ConfigError::Validation(
                "site.languages must list at least one language".to_owned(),
            ));
        }

        for (index, language) in languages.iter().enumerate() {
            if language.is_empty() {
                return Err(ConfigError::Validation(
                    "site.languages cannot contain an empty language".to_owned(),
                ));
            }
            if !language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "site.languages: '{language}' may only contain ASCII letters, digits, '-' and '_'"
                )));
            }
            if languages[..index].contains(language) {
                return Err(ConfigError::Validation(format!(
                    "site.languages: '{language}' is listed twice"
                )));
            }
        }

        Ok(())
    }

    /// Expand and resolve raw values relative to the config directory.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let languages = self
            .site
            .languages
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_LANGUAGE.to_owned()]);
        let multi_language = self.site.multi_language.unwrap_or(languages.len() > 1);
        self.site_resolved = SiteConfig {
            languages,
            multi_language,
        };

        self.source_dir = resolve_dir(config_dir, self.source.dir.as_deref(), "data", "source.dir")?;
        self.output_dir = resolve_dir(
            config_dir,
            self.output.dir.as_deref(),
            ".navcache/navigation",
            "output.dir",
        )?;

        Ok(())
    }
}

/// Expand `value` (or `default`) and join it onto `config_dir` when relative.
fn resolve_dir(
    config_dir: &Path,
    value: Option<&str>,
    default: &str,
    field: &str,
) -> Result<PathBuf, ConfigError> {
    let expanded = expand::expand_path(value.unwrap_or(default), field)?;
    Ok(config_dir.join(expanded))
}
