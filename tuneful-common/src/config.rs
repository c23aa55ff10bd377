//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`TUNEFUL_ROOT_FOLDER`)
//! 3. TOML config file (`root_folder`)
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is never fatal: the service starts with built-in
//! defaults and [`ConfigSource::log`] reports it as a warning.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "TUNEFUL_ROOT_FOLDER";

/// SQLite database file name inside the root folder
pub const DATABASE_FILE: &str = "tuneful.db";

/// Default upload directory name inside the root folder
pub const UPLOAD_FOLDER: &str = "uploads";

/// Default cap on upload request bodies
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; command-line arguments and environment
/// variables take precedence over anything set here.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database and (by default) uploaded files
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Bind address for the HTTP server
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Upload directory, relative paths are resolved against the root folder
    #[serde(default)]
    pub upload_folder: Option<PathBuf>,

    /// Externally visible base URL used for absolute links
    /// (e.g. `https://music.example.com`). Derived from the `Host`
    /// header when unset.
    #[serde(default)]
    pub public_url: Option<String>,

    /// Maximum accepted upload request body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            host: None,
            port: None,
            upload_folder: None,
            public_url: None,
            max_upload_bytes: default_max_upload_bytes(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

/// Default TOML config location: `<config_dir>/tuneful/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tuneful").join("config.toml"))
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No file at this path, built-in defaults in use
    Missing(PathBuf),
    /// No explicit path and no OS config directory, built-in defaults in use
    NoConfigDir,
}

impl ConfigSource {
    /// Whether built-in defaults stand in for a config file
    pub fn is_default(&self) -> bool {
        !matches!(self, ConfigSource::File(_))
    }

    /// Report the outcome of [`load_toml_config`]
    ///
    /// Loading happens before the tracing subscriber exists, so callers log
    /// the outcome once it is installed.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Missing(path) => {
                warn!("Config file {} not found, using defaults", path.display())
            }
            ConfigSource::NoConfigDir => {
                warn!("Could not determine config directory, using defaults")
            }
        }
    }
}

/// Load TOML configuration
///
/// Falls back to [`default_config_path`] when no explicit path is given.
/// Missing files yield defaults; unreadable or malformed files are errors.
pub fn load_toml_config(path: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => return Ok((TomlConfig::default(), ConfigSource::NoConfigDir)),
    };

    if !path.exists() {
        return Ok((TomlConfig::default(), ConfigSource::Missing(path)));
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    let config = parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("{} ({})", e, path.display())))?;

    Ok((config, ConfigSource::File(path)))
}

/// Parse TOML configuration text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
}

/// Resolve the root folder following the priority order in the module docs
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    get_default_root_folder()
}

/// Get OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\tuneful
        dirs::data_local_dir()
            .map(|d| d.join("tuneful"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tuneful"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/tuneful
        dirs::data_dir()
            .map(|d| d.join("tuneful"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tuneful"))
    } else {
        // ~/.local/share/tuneful (or /var/lib/tuneful for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("tuneful"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tuneful"))
    }
}

/// Resolved root folder and the paths derived from it
#[derive(Debug, Clone)]
pub struct RootFolder {
    path: PathBuf,
}

impl RootFolder {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the root folder if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.path.exists() {
            std::fs::create_dir_all(&self.path)?;
            info!("Created root folder: {}", self.path.display());
        }
        Ok(())
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.path.join(DATABASE_FILE)
    }

    /// Upload directory, honouring the TOML override
    pub fn upload_path(&self, toml_config: &TomlConfig) -> PathBuf {
        match &toml_config.upload_folder {
            Some(folder) if folder.is_absolute() => folder.clone(),
            Some(folder) => self.path.join(folder),
            None => self.path.join(UPLOAD_FOLDER),
        }
    }
}
