use std::env;
use std::path::PathBuf;

use crate::errors::AppError;

pub const DEFAULT_DATA_FILE: &str = "./data/ems.json";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 102_400;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub bind_addr: String,
    pub max_image_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl AppConfig {
    /// Reads `EMS_DATA_FILE`, `EMS_BIND_ADDR` and `EMS_MAX_IMAGE_BYTES`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("EMS_DATA_FILE").filter(|v| !v.is_empty()) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(addr) = lookup("EMS_BIND_ADDR").filter(|v| !v.is_empty()) {
            config.bind_addr = addr;
        }
        if let Some(raw) = lookup("EMS_MAX_IMAGE_BYTES").filter(|v| !v.is_empty()) {
            config.max_image_bytes = raw.parse().map_err(|_| {
                AppError::ConfigError(format!("EMS_MAX_IMAGE_BYTES must be a byte count, got '{}'", raw))
            })?;
        }

        Ok(config)
    }
}
