use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::model::DEFAULT_MAX_CONNECTIONS;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    database_uri: String,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    /// Serve swagger ui at /api/v1/docs
    #[serde(default)]
    docs: bool,
    #[serde(default = "default_uploads_dir")]
    uploads_dir: String,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_uploads_dir() -> String {
    String::from("uploads")
}

impl Config {
    pub fn from_toml(bytes: &[u8]) -> ConfigResult<Self> {
        Ok(toml::from_slice(bytes)?)
    }

    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    Self::from_toml(&bytes)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound(_)) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Unable to load config.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn uploads_dir(&self) -> &str {
        &self.uploads_dir
    }
}
