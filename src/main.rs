use std::sync::Arc;

use astra::Server;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Config;
use crate::db::init_db;
use crate::mailer::{BrevoMailer, LogMailer, Mailer};
use crate::router::route;

mod app;
mod auth;
mod config;
mod db;
mod documents;
mod domain;
mod errors;
mod files;
mod functions;
mod handlers;
mod mailer;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 1. Configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // 2. Mail delivery
    let mailer: Arc<dyn Mailer> = match &config.brevo_api_key {
        Some(key) => match BrevoMailer::new(
            key.clone(),
            config.sender_email.clone(),
            config.sender_name.clone(),
        ) {
            Ok(m) => Arc::new(m),
            Err(e) => {
                error!("Mailer setup failed: {e}");
                std::process::exit(1);
            }
        },
        None => {
            warn!("BREVO_API_KEY not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let addr = config.bind_addr;
    let workers = config.max_workers;
    let app = Arc::new(App::new(config, mailer));

    // 3. Database schema
    if let Err(e) = init_db(&app.db) {
        error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    // 4. Daily rent reminders
    if let Err(e) = functions::reminders::spawn_daily(Arc::clone(&app)) {
        error!("Could not start reminder scheduler: {e}");
        std::process::exit(1);
    }

    // 5. Serve
    info!("Starting server at http://{addr}");
    let server = Server::bind(&addr).max_workers(workers);
    let result = server.serve(move |req, _info| route(req, &app));

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}
