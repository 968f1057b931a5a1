use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use http::{Method, Request};
use serde_json::json;

use crate::app::now_unix;
use crate::functions::reminders::{run_rent_reminders, ReminderReport};
use crate::tests::utils::{read_body, TestApp};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 26).unwrap()
}

/// One landlord with a tenant due on each of the given dates.
fn tenants_due(t: &TestApp, due: &[Option<&str>]) {
    let landlord = t.signup_landlord("lana@example.com");
    let property = t.add_property(&landlord, "Flat 2");
    for (i, date) in due.iter().enumerate() {
        let id = t.onboard_tenant(&landlord, &format!("tenant{i}@example.com"), property);
        let terms = match date {
            Some(d) => json!({ "next_rent_date": d }),
            None => json!({}),
        };
        let (status, _) = t.call(Method::PUT, &format!("/api/tenants/{id}"), Some(&landlord), Some(terms));
        assert_eq!(status, 200);
        if date.is_none() {
            t.app
                .db
                .with_conn(|conn| {
                    conn.execute("update tenants set next_rent_date = null where user_id = ?", [id])?;
                    Ok(())
                })
                .unwrap();
        }
    }
}

#[test]
fn reminders_go_out_once_per_due_date_and_day() {
    let t = TestApp::new();
    tenants_due(
        &t,
        &[
            Some("2025-02-26"),
            Some("2025-02-27"),
            Some("2025-03-01"),
            Some("2025-03-02"),
            None,
        ],
    );
    let before = t.mailer.emails().len();

    let report = run_rent_reminders(&t.app, today(), now_unix()).unwrap();
    assert_eq!(
        report,
        ReminderReport {
            considered: 5,
            sent: 2,
            skipped: 3,
            failed: 0
        }
    );

    let sent = &t.mailer.emails()[before..];
    let mut subjects: Vec<_> = sent.iter().map(|e| e.subject.clone()).collect();
    subjects.sort();
    assert_eq!(
        subjects,
        vec!["Rent Due in 1 Day – RentWave", "Rent Due in 3 Days – RentWave"]
    );
    assert!(sent.iter().any(|e| e.to == "tenant1@example.com"));
    assert!(sent.iter().any(|e| e.html.contains("Sat Mar 01 2025")));

    let again = run_rent_reminders(&t.app, today(), now_unix()).unwrap();
    assert_eq!(again.sent, 0);
    assert_eq!(again.skipped, 5);
    assert_eq!(t.mailer.emails().len(), before + 2);
}

#[test]
fn failed_reminders_are_retried_on_the_next_sweep() {
    let t = TestApp::new();
    tenants_due(&t, &[Some("2025-02-28")]);
    t.mailer.set_failing(true);

    let report = run_rent_reminders(&t.app, today(), now_unix()).unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.sent, 0);

    t.mailer.set_failing(false);
    let report = run_rent_reminders(&t.app, today(), now_unix()).unwrap();
    assert_eq!(report.sent, 1);
    assert_eq!(t.mailer.last().subject, "Rent Due in 2 Days – RentWave");
}

#[test]
fn overlapping_sweeps_send_each_reminder_once() {
    let t = TestApp::new();
    tenants_due(&t, &[Some("2025-02-28")]);
    let before = t.mailer.emails().len();
    t.mailer.set_delay(Duration::from_millis(300));

    let reports: Vec<ReminderReport> = thread::scope(|s| {
        let sweeps: Vec<_> = (0..2)
            .map(|_| s.spawn(|| run_rent_reminders(&t.app, today(), now_unix()).unwrap()))
            .collect();
        sweeps.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(t.mailer.emails().len(), before + 1);
    assert_eq!(reports.iter().map(|r| r.sent).sum::<usize>(), 1);
    assert_eq!(reports.iter().map(|r| r.skipped).sum::<usize>(), 1);
}

#[test]
fn job_endpoint_requires_the_job_token() {
    let t = TestApp::new();
    let call = |token: Option<&str>| {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/jobs/rent-reminders");
        if let Some(token) = token {
            builder = builder.header("X-Job-Token", token);
        }
        let resp = t.send(builder.body(astra::Body::empty()).unwrap());
        let status = resp.status().as_u16();
        (status, read_body(resp))
    };

    assert_eq!(call(None).0, 401);
    assert_eq!(call(Some("guess")).0, 401);

    let (status, body) = call(Some("job-secret"));
    assert_eq!(status, 200);
    let report: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["considered"], 0);
    assert_eq!(report["sent"], 0);

    let (status, _) = t.call(Method::GET, "/api/jobs/rent-reminders", None, None);
    assert_eq!(status, 404);
}
