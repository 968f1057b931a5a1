pub mod onboarding;
pub mod password_reset;
pub mod receipt;
pub mod reminder;

pub use onboarding::{onboarding_email, OnboardingEmail, ONBOARDING_SUBJECT};
pub use password_reset::{password_reset_email, PASSWORD_RESET_SUBJECT};
pub use receipt::{receipt_email, RECEIPT_SUBJECT};
pub use reminder::{reminder_email, reminder_subject, ReminderEmail};
