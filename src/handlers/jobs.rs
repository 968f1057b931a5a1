// src/handlers/jobs.rs
use astra::Request;

use crate::app::{now_unix, today, App};
use crate::auth::token::hash_token;
use crate::errors::ServerError;
use crate::functions::reminders::run_rent_reminders;
use crate::handlers::header;
use crate::responses::{ok_json, ResultResp};

/// Job routes exist only when a job token is configured.
fn check_job_token(app: &App, req: &Request) -> Result<(), ServerError> {
    let Some(expected) = app.config.job_token.as_deref() else {
        return Err(ServerError::NotFound);
    };
    let given = header(req, "X-Job-Token")
        .ok_or_else(|| ServerError::Unauthorized("missing job token".into()))?;

    // Compare digests so the check doesn't leak a matching prefix.
    if hash_token(given) != hash_token(expected) {
        return Err(ServerError::Unauthorized("bad job token".into()));
    }
    Ok(())
}

pub fn rent_reminders(app: &App, req: &Request) -> ResultResp {
    check_job_token(app, req)?;
    let report = run_rent_reminders(app, today(), now_unix())?;
    ok_json(&report)
}
