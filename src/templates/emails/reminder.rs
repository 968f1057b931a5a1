use maud::{html, Markup};

use crate::templates::layouts::email::email_layout;

fn day_word(days: i64) -> &'static str {
    if days == 1 {
        "day"
    } else {
        "days"
    }
}

pub fn reminder_subject(days: i64) -> String {
    let plural = if days == 1 { "" } else { "s" };
    format!("Rent Due in {days} Day{plural} – RentWave")
}

pub struct ReminderEmail<'a> {
    pub first_name: &'a str,
    pub property_name: &'a str,
    pub days: i64,
    pub amount: &'a str,
    /// e.g. "Fri Jan 31 2025"
    pub due_date: &'a str,
    pub year: i32,
}

pub fn reminder_email(data: &ReminderEmail<'_>) -> Markup {
    let first_name = if data.first_name.trim().is_empty() {
        "Tenant"
    } else {
        data.first_name
    };

    let content = html! {
        p { "Dear " (first_name) "," }
        p {
            "This is a friendly reminder that your rent payment for "
            strong { (data.property_name) }
            " is due in "
            strong { (data.days) " " (day_word(data.days)) }
            "."
        }
        div class="highlight" {
            p { strong { "Amount: " } "£" (data.amount) }
            p { strong { "Due Date: " } (data.due_date) }
        }
        p { "Please ensure payment is made on time." }
        p { "If you have already paid, kindly ignore this email." }
        p { "Best regards," br; strong { "RentWave Team" } }
    };

    email_layout(
        "Rent Due Reminder - RentWave",
        "Rent Due Reminder",
        &format!("© {} RentWave", data.year),
        content,
    )
}
