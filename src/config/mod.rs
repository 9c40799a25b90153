use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

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
    #[serde(default)]
    docs: bool,
    #[serde(default = "default_uploads")]
    uploads: String,
}

fn default_max_connections() -> u32 {
    10
}

fn default_uploads() -> String {
    String::from("uploads")
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    Self::from_slice(&bytes)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        crate::error::log_error(&e);
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let config: Self = toml::from_slice(bytes)?;
        Ok(config)
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

    /// Serve Swagger UI under `/api/v1/docs`.
    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    /// Root directory of uploaded files, relative paths resolve against the cwd.
    #[inline]
    pub fn uploads(&self) -> &str {
        &self.uploads
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn config_test() {
        let config = Config::get_or_init(true).await;
        assert_eq!(config.host().bindto(), "127.0.0.1:5000"); // defaults
    }

    #[test]
    fn optional_keys_have_defaults() {
        let config = Config::from_slice(
            br#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            database_uri = "postgres://localhost/lectern"
            "#,
        )
        .unwrap();

        assert_eq!(config.host().bindto(), "0.0.0.0:8080");
        assert_eq!(config.app().database_uri(), "postgres://localhost/lectern");
        assert_eq!(config.app().max_connections(), 10);
        assert!(!config.app().docs());
        assert_eq!(config.app().uploads(), "uploads");
    }

    #[test]
    fn missing_database_uri_is_an_error() {
        let result = Config::from_slice(b"[host]\nbindto = \"127.0.0.1:1\"\n[app]\n");
        assert!(matches!(result, Err(ConfigError::TomlDeError(_))));
    }
}
