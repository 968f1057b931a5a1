use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime settings, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub db_path: String,
    pub storage_dir: PathBuf,
    /// Prefix for links handed to clients, e.g. "https://api.rentwave.app".
    pub public_base_url: String,
    /// HMAC key for signed file URLs.
    pub signing_key: String,
    pub signed_url_ttl_secs: i64,
    pub session_ttl_secs: i64,
    pub reset_ttl_secs: i64,
    pub max_upload_bytes: usize,
    /// When unset, mail is logged instead of sent.
    pub brevo_api_key: Option<String>,
    pub sender_email: String,
    pub sender_name: String,
    /// Local hour of day at which the rent reminder sweep runs.
    pub reminder_hour: u32,
    /// Shared secret for POST /api/jobs/*. Job routes are disabled when unset.
    pub job_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let reminder_hour: u32 = try_load("RENTWAVE_REMINDER_HOUR", "9")?;
        if reminder_hour > 23 {
            return Err(ConfigError::Invalid {
                key: "RENTWAVE_REMINDER_HOUR",
                reason: format!("{reminder_hour} is not an hour of the day"),
            });
        }

        let signing_key = match optional("RENTWAVE_SIGNING_KEY") {
            Some(k) => k,
            None => {
                warn!("RENTWAVE_SIGNING_KEY not set, signed URLs use a development key");
                "rentwave-dev-signing-key".to_string()
            }
        };

        Ok(Self {
            bind_addr: try_load("RENTWAVE_BIND", "127.0.0.1:3000")?,
            max_workers: try_load("RENTWAVE_WORKERS", "8")?,
            db_path: try_load("RENTWAVE_DB", "rentwave.sqlite3")?,
            storage_dir: PathBuf::from(try_load::<String>("RENTWAVE_STORAGE_DIR", "storage")?),
            public_base_url: try_load::<String>("RENTWAVE_PUBLIC_URL", "http://127.0.0.1:3000")?
                .trim_end_matches('/')
                .to_string(),
            signing_key,
            signed_url_ttl_secs: try_load("RENTWAVE_SIGNED_URL_TTL", "2592000")?,
            session_ttl_secs: try_load("RENTWAVE_SESSION_TTL", "604800")?,
            reset_ttl_secs: try_load("RENTWAVE_RESET_TTL", "1800")?,
            max_upload_bytes: try_load("RENTWAVE_MAX_UPLOAD", "10485760")?,
            brevo_api_key: optional("BREVO_API_KEY"),
            sender_email: try_load("RENTWAVE_SENDER_EMAIL", "no-reply@rentwave.app")?,
            sender_name: try_load("RENTWAVE_SENDER_NAME", "RentWave")?,
            reminder_hour,
            job_token: optional("RENTWAVE_JOB_TOKEN"),
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = optional(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }
    })
}
