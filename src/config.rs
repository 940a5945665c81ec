//! Configuration loading for Pantry.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`pantry.toml` in cwd)
//! 3. User config (`~/.pantry/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs against the in-memory
//! backend when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PantryError, Result};

/// Main configuration struct for Pantry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Storage backend configuration.
    pub storage: StorageConfig,
    /// HTTP server configuration.
    pub server: ServerConfig,
}

/// Which storage backend holds the list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process-local memory, lost on exit.
    #[default]
    Memory,
    /// A JSON file on disk.
    File,
    /// A remote table service.
    Remote,
}

impl StorageKind {
    /// Parse a backend name. Returns `None` for anything outside the three.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "memory" => Some(Self::Memory),
            "file" => Some(Self::File),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }

    /// The backend's config name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::Remote => "remote",
        }
    }
}

/// What a persistent backend does when a write to its medium fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersistFailurePolicy {
    /// Surface the failure to the caller; the mutation is not committed.
    #[default]
    Propagate,
    /// Log a warning and keep the in-memory mutation (best effort).
    Log,
}

impl PersistFailurePolicy {
    /// Parse a policy name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "propagate" => Some(Self::Propagate),
            "log" => Some(Self::Log),
            _ => None,
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend to run.
    pub backend: StorageKind,
    /// Backing file for the file backend.
    pub file_path: PathBuf,
    /// Write-failure handling for the file and remote backends.
    pub on_persist_failure: PersistFailurePolicy,
    /// Remote table settings for the remote backend.
    pub remote: RemoteConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageKind::Memory,
            file_path: PathBuf::from("groceries.json"),
            on_persist_failure: PersistFailurePolicy::Propagate,
            remote: RemoteConfig::default(),
        }
    }
}

/// Remote table service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the table service.
    pub base_url: String,
    /// Table holding the grocery rows.
    pub table: String,
    /// Rows fetched per scan page.
    pub scan_page_size: u32,
}

/// Minimum valid scan page size (a page of 0 rows would never advance).
pub const MIN_SCAN_PAGE_SIZE: u32 = 1;

impl RemoteConfig {
    /// Check if a scan page size is valid (must be >= 1).
    pub fn is_valid_page_size(value: u32) -> bool {
        value >= MIN_SCAN_PAGE_SIZE
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            table: "groceries".to_string(),
            scan_page_size: 25,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl ServerConfig {
    /// The socket address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`pantry.toml` in cwd)
    /// 3. User config (`~/.pantry/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Ok(project_config) = Self::load_from_file(&cwd.join("pantry.toml")) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.pantry/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = pantry_home()?;
        Self::load_from_file(&home.join("config.toml")).ok()
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| PantryError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| PantryError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // PANTRY_BACKEND
        if let Ok(val) = env::var("PANTRY_BACKEND") {
            match StorageKind::parse(&val) {
                Some(kind) => self.storage.backend = kind,
                None => eprintln!(
                    "Warning: Invalid PANTRY_BACKEND value '{}'. \
                    Valid values: memory, file, remote. Using default '{}'.",
                    val,
                    self.storage.backend.as_str()
                ),
            }
        }

        // PANTRY_FILE_PATH
        if let Ok(val) = env::var("PANTRY_FILE_PATH") {
            if val.is_empty() {
                eprintln!(
                    "Warning: PANTRY_FILE_PATH is empty. Using default '{}'.",
                    self.storage.file_path.display()
                );
            } else {
                self.storage.file_path = PathBuf::from(val);
            }
        }

        // PANTRY_ON_PERSIST_FAILURE
        if let Ok(val) = env::var("PANTRY_ON_PERSIST_FAILURE") {
            match PersistFailurePolicy::parse(&val) {
                Some(policy) => self.storage.on_persist_failure = policy,
                None => eprintln!(
                    "Warning: Invalid PANTRY_ON_PERSIST_FAILURE value '{}'. \
                    Valid values: propagate, log. Using default.",
                    val
                ),
            }
        }

        // PANTRY_REMOTE_URL
        if let Ok(val) = env::var("PANTRY_REMOTE_URL") {
            if val.is_empty() {
                eprintln!(
                    "Warning: PANTRY_REMOTE_URL is empty. Using default '{}'.",
                    self.storage.remote.base_url
                );
            } else {
                self.storage.remote.base_url = val;
            }
        }

        // PANTRY_REMOTE_TABLE
        if let Ok(val) = env::var("PANTRY_REMOTE_TABLE") {
            if !val.is_empty() {
                self.storage.remote.table = val;
            }
        }

        // PANTRY_SCAN_PAGE_SIZE
        if let Ok(val) = env::var("PANTRY_SCAN_PAGE_SIZE") {
            match val.parse::<u32>() {
                Ok(n) => {
                    if RemoteConfig::is_valid_page_size(n) {
                        self.storage.remote.scan_page_size = n;
                    } else {
                        eprintln!(
                            "Warning: Invalid PANTRY_SCAN_PAGE_SIZE value '{}'. \
                            Must be >= {}. Using default '{}'.",
                            n, MIN_SCAN_PAGE_SIZE, self.storage.remote.scan_page_size
                        );
                    }
                }
                Err(_) => eprintln!(
                    "Warning: Invalid PANTRY_SCAN_PAGE_SIZE value '{}'. \
                    Expected a positive integer. Using default '{}'.",
                    val, self.storage.remote.scan_page_size
                ),
            }
        }

        // PANTRY_HOST
        if let Ok(val) = env::var("PANTRY_HOST") {
            if !val.is_empty() {
                self.server.host = val;
            }
        }

        // PANTRY_PORT
        if let Ok(val) = env::var("PANTRY_PORT") {
            match val.parse::<u16>() {
                Ok(n) => self.server.port = n,
                Err(_) => eprintln!(
                    "Warning: Invalid PANTRY_PORT value '{}'. \
                    Expected a port number. Using default '{}'.",
                    val, self.server.port
                ),
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence. All non-default fields from
    /// `other` are applied to `self`, enabling layering of the precedence
    /// chain. A config cannot explicitly set a value back to the default to
    /// override a non-default value from a lower layer.
    fn merge(mut self, other: Config) -> Self {
        let default_storage = StorageConfig::default();
        if other.storage.backend != default_storage.backend {
            self.storage.backend = other.storage.backend;
        }
        if other.storage.file_path != default_storage.file_path {
            self.storage.file_path = other.storage.file_path;
        }
        if other.storage.on_persist_failure != default_storage.on_persist_failure {
            self.storage.on_persist_failure = other.storage.on_persist_failure;
        }

        let default_remote = RemoteConfig::default();
        if other.storage.remote.base_url != default_remote.base_url {
            self.storage.remote.base_url = other.storage.remote.base_url;
        }
        if other.storage.remote.table != default_remote.table {
            self.storage.remote.table = other.storage.remote.table;
        }
        if other.storage.remote.scan_page_size != default_remote.scan_page_size {
            self.storage.remote.scan_page_size = other.storage.remote.scan_page_size;
        }

        let default_server = ServerConfig::default();
        if other.server.host != default_server.host {
            self.server.host = other.server.host;
        }
        if other.server.port != default_server.port {
            self.server.port = other.server.port;
        }

        self
    }
}

/// Get the Pantry home directory.
///
/// Checks the `PANTRY_HOME` environment variable first, then falls back to
/// `~/.pantry`. Invalid values are ignored.
pub fn pantry_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("PANTRY_HOME") {
        if home.is_empty() {
            tracing::warn!("PANTRY_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|home| home.join(".pantry"))
}
