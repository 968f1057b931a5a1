// src/functions/reminders.rs
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::app::{now_unix, App};
use crate::db::{reminders, tenants};
use crate::domain::dates::format_long;
use crate::errors::ServerError;
use crate::mailer::Email;
use crate::templates::emails::{reminder_email, reminder_subject, ReminderEmail};

/// Days before the due date on which a reminder goes out.
pub const REMINDER_DAYS: RangeInclusive<i64> = 1..=3;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    pub considered: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// One sweep over every tenant. A failed send gives its claim back so the next sweep
/// retries it.
pub fn run_rent_reminders(
    app: &App,
    today: NaiveDate,
    now: i64,
) -> Result<ReminderReport, ServerError> {
    let all = app.db.with_conn(|conn| tenants::list_all_tenants(conn))?;
    let mut report = ReminderReport::default();

    for tenant in all {
        report.considered += 1;

        let Some(due) = tenant.next_rent_date else {
            report.skipped += 1;
            continue;
        };
        let days = due.signed_duration_since(today).num_days();
        if !REMINDER_DAYS.contains(&days) {
            report.skipped += 1;
            continue;
        }

        // Claim before sending so overlapping sweeps cannot both send.
        let tenant_id = tenant.user_id;
        if !app
            .db
            .with_conn(|conn| reminders::claim(conn, tenant_id, due, days, now))?
        {
            debug!(tenant_id, days, "reminder already sent");
            report.skipped += 1;
            continue;
        }

        let amount = tenant.rent.to_string();
        let due_text = format_long(due);
        let property_name = tenant.property_name.as_deref().unwrap_or("your property");
        let html = reminder_email(&ReminderEmail {
            first_name: &tenant.first_name,
            property_name,
            days,
            amount: &amount,
            due_date: &due_text,
            year: today.year(),
        });
        let email = Email::new(&tenant.email, reminder_subject(days), html.into_string());

        match app.mailer.send(&email) {
            Ok(()) => report.sent += 1,
            Err(e) => {
                warn!(tenant_id, error = %e, "rent reminder failed");
                app.db
                    .with_conn(|conn| reminders::release(conn, tenant_id, due, days))?;
                report.failed += 1;
            }
        }
    }

    info!(
        considered = report.considered,
        sent = report.sent,
        skipped = report.skipped,
        failed = report.failed,
        "rent reminder sweep finished"
    );
    Ok(report)
}

/// The next `hour:00` strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, hour: u32) -> NaiveDateTime {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}

/// Background thread that runs the sweep once a day at the configured local hour.
pub fn spawn_daily(app: Arc<App>) -> std::io::Result<JoinHandle<()>> {
    let hour = app.config.reminder_hour;
    thread::Builder::new()
        .name("rent-reminders".into())
        .spawn(move || loop {
            let now = Local::now().naive_local();
            let next = next_run_after(now, hour);
            let wait = (next - now).to_std().unwrap_or(Duration::from_secs(60));
            info!(next_run = %next, "rent reminders scheduled");
            thread::sleep(wait);

            let today = Local::now().date_naive();
            if let Err(e) = run_rent_reminders(&app, today, now_unix()) {
                error!(error = %e, "rent reminder sweep failed");
            }
        })
}
