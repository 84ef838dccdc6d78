use config::{Config, ConfigError, Environment, File};
use docstore::info;
use dotenv::dotenv;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Once;

use crate::upload::DEFAULT_MAX_IMAGE_BYTES;

static DOTENV_ONCE: Once = Once::new();

fn ensure_dotenv_loaded() {
    DOTENV_ONCE.call_once(|| {
        match dotenv() {
            Ok(_) => info!("Config loaded including .env file."),
            Err(_) => info!("Config loaded without .env file."),
        }
    });
}

fn default_delete_code() -> String {
    "123".to_string()
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_IMAGE_BYTES
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub http: HttpSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    pub uploads: UploadSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpSettings {
    pub bind_address: SocketAddr,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSettings {
    /// Code an operator types to confirm a delete.
    #[serde(default = "default_delete_code")]
    pub delete_code: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { delete_code: default_delete_code() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadSettings {
    pub dir: String,
    pub public_path: String,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl AppConfig {
    /// Reads `path` (extension optional) and applies `CATALOG__SECTION__KEY` environment overrides.
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        ensure_dotenv_loaded();
        let builder =
            Config::builder()
                .add_source(File::with_name(path).required(true))
                .add_source(Environment::with_prefix("CATALOG").try_parsing(true).separator("__"));
        let config = builder.build()?.try_deserialize::<AppConfig>()?;
        info!("{:#?}", config);
        Ok(config)
    }
}
