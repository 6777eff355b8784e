use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "campus.toml",
    "config/campus.toml",
    "crates/config/campus.toml",
    "../campus.toml",
    "../config/campus.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub storage: StorageConfig,
}

/// Settings for the HTTP API the client authenticates and lists resources against.
///
/// ```
/// use campus_config::ApiConfig;
///
/// let api = ApiConfig::default();
/// assert_eq!(api.base_url, "http://127.0.0.1:8080/api");
/// assert_eq!(api.request_timeout_seconds, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "ApiConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl ApiConfig {
    const fn default_request_timeout() -> u64 {
        10
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base of the room endpoints; the room id is appended as a path segment.
    pub ws_base_url: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            ws_base_url: "ws://127.0.0.1:8080/api/ws/chat".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://campus.db".to_string(),
            max_connections: 1,
        }
    }
}

/// Load the client configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use campus_config::load;
///
/// std::env::remove_var("CAMPUS_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.api.base_url.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let timeout = i64::try_from(defaults.api.request_timeout_seconds).unwrap_or(i64::MAX);

    let builder = config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url.clone())
        .context("invalid default for api.base_url")?
        .set_default("api.request_timeout_seconds", timeout)
        .context("invalid default for api.request_timeout_seconds")?
        .set_default("chat.ws_base_url", defaults.chat.ws_base_url.clone())
        .context("invalid default for chat.ws_base_url")?
        .set_default("storage.url", defaults.storage.url.clone())
        .context("invalid default for storage.url")?
        .set_default(
            "storage.max_connections",
            i64::from(defaults.storage.max_connections),
        )
        .context("invalid default for storage.max_connections")?;

    let mut builder = builder;
    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("CAMPUS_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via CAMPUS_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(config::Environment::with_prefix("CAMPUS").separator("__"));

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.storage.max_connections == 0 {
        config.storage.max_connections = 1;
    }

    debug!(?config, "loaded client configuration");
    Ok(config)
}
