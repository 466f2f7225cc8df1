use std::env;
use std::path::PathBuf;

use chrono::Duration;

use crate::error::AppError;

const MAX_ORDER_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub storage_backend: StorageBackend,
    pub event_buffer_size: usize,
    pub order_ttl: Duration,
    pub sweep_interval_secs: u64,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            storage_backend: parse_backend(env::var("STORAGE_BACKEND").ok().as_deref())?,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            order_ttl: parse_order_ttl(parse_or_default("ORDER_TTL_SECS", 1800)?)?,
            sweep_interval_secs: parse_or_default("SWEEP_INTERVAL_SECS", 60)?,
            catalog_path: env::var("CATALOG_PATH").ok().map(PathBuf::from),
        })
    }
}

fn parse_backend(raw: Option<&str>) -> Result<StorageBackend, AppError> {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("file") => Ok(StorageBackend::File),
        Some("memory") => Ok(StorageBackend::Memory),
        Some(other) => Err(AppError::Internal(format!(
            "invalid STORAGE_BACKEND: {other}, expected file/memory"
        ))),
    }
}

fn parse_order_ttl(secs: i64) -> Result<Duration, AppError> {
    if !(1..=MAX_ORDER_TTL_SECS).contains(&secs) {
        return Err(AppError::Internal(format!(
            "invalid ORDER_TTL_SECS: {secs}, expected 1..={MAX_ORDER_TTL_SECS}"
        )));
    }
    Duration::try_seconds(secs)
        .ok_or_else(|| AppError::Internal(format!("invalid ORDER_TTL_SECS: {secs}")))
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
