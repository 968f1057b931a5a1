// src/app.rs
use std::sync::Arc;

use crate::auth::reset::{PasswordResetService, ResetConfig};
use crate::config::Config;
use crate::db::Database;
use crate::files::FileStore;
use crate::mailer::Mailer;

/// Shared handles every request and the scheduler work with.
pub struct App {
    pub config: Config,
    pub db: Database,
    pub mailer: Arc<dyn Mailer>,
    pub files: FileStore,
    pub resets: PasswordResetService,
}

impl App {
    pub fn new(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let db = Database::new(config.db_path.clone());
        let files = FileStore::new(
            config.storage_dir.clone(),
            &config.signing_key,
            &config.public_base_url,
            config.signed_url_ttl_secs,
        );
        let resets = PasswordResetService::new(ResetConfig {
            ttl_secs: config.reset_ttl_secs,
            reset_url: format!("{}/reset-password", config.public_base_url),
        });

        Self {
            config,
            db,
            mailer,
            files,
            resets,
        }
    }
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Rent dates are calendar dates in the server's local zone.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
