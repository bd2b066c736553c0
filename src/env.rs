use std::path::Path;

use rocket::figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://holidays.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors_allow_origin: String,
    pub otlp_endpoint: Option<String>,
    pub profile: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: 5,
            cors_allow_origin: "*".to_string(),
            otlp_endpoint: None,
            profile: "development".to_string(),
        }
    }
}

impl AppConfig {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Env::raw().only(&[
                "database_url",
                "database_max_connections",
                "cors_allow_origin",
                "otlp_endpoint",
            ]))
            .merge(Env::raw().only(&["rocket_profile"]).map(|_| "profile".into()))
    }

    pub fn from_env() -> Result<Self, rocket::figment::Error> {
        Self::figment().extract()
    }
}

/// Outcome of reading one dotenv file. Collected before tracing is up and
/// logged once the subscriber is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    Loaded(String),
    Missing(String),
}

impl EnvFileStatus {
    pub fn log(&self) {
        match self {
            EnvFileStatus::Loaded(path) => info!("Loaded environment from: {}", path),
            EnvFileStatus::Missing(path) => {
                warn!("Environment file {} not found, skipping", path)
            }
        }
    }
}

pub fn load_environment() -> Result<Vec<EnvFileStatus>, Box<dyn std::error::Error>> {
    let is_production =
        dotenvy::var("ROCKET_PROFILE").unwrap_or("development".to_string()) == "production";

    let env_files = if is_production {
        vec!["config/common.env", "config/prod.env", ".secrets.env"]
    } else {
        vec!["config/common.env", "config/dev.env", ".secrets.env"]
    };

    env_files.into_iter().map(load_env_file).collect()
}

pub fn load_env_file(path: &str) -> Result<EnvFileStatus, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        return Ok(EnvFileStatus::Missing(path.to_string()));
    }

    dotenvy::from_filename_override(path)?;
    Ok(EnvFileStatus::Loaded(path.to_string()))
}
