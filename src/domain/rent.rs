// src/domain/rent.rs

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::dates::add_one_month;

/// Days ahead of the due date that still count as "due soon".
pub const DUE_SOON_DAYS: i64 = 7;

/// Where a tenant stands relative to their next rent due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentStatus {
    Overdue { days_late: i64 },
    DueSoon { days_left: i64 },
    UpToDate,
    Unknown,
}

impl RentStatus {
    /// Classify by whole calendar days between `today` and `due`.
    pub fn classify(due: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(due) = due else {
            return RentStatus::Unknown;
        };

        let days = (due - today).num_days();
        if days < 0 {
            RentStatus::Overdue { days_late: -days }
        } else if days <= DUE_SOON_DAYS {
            RentStatus::DueSoon { days_left: days }
        } else {
            RentStatus::UpToDate
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RentStatus::Overdue { .. } => "overdue",
            RentStatus::DueSoon { .. } => "due_soon",
            RentStatus::UpToDate => "up_to_date",
            RentStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> String {
        match self {
            RentStatus::Overdue { days_late } => format!("Overdue by {days_late} {}", days(*days_late)),
            RentStatus::DueSoon { days_left } => format!("Due Soon (in {days_left} {})", days(*days_left)),
            RentStatus::UpToDate => "Up to Date".to_string(),
            RentStatus::Unknown => "Status Unknown".to_string(),
        }
    }

    pub fn view(&self) -> RentStatusView {
        let days = match self {
            RentStatus::Overdue { days_late } => Some(-days_late),
            RentStatus::DueSoon { days_left } => Some(*days_left),
            RentStatus::UpToDate | RentStatus::Unknown => None,
        };
        RentStatusView {
            kind: self.kind(),
            label: self.label(),
            days_until_due: days,
        }
    }
}

fn days(n: i64) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

/// JSON shape of a rent status.
#[derive(Debug, Clone, Serialize)]
pub struct RentStatusView {
    pub kind: &'static str,
    pub label: String,
    pub days_until_due: Option<i64>,
}

/// Next due date after a payment: one month past the current due date, or
/// one month from today when none was set.
pub fn advance_due_date(current: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    add_one_month(current.unwrap_or(today))
}
