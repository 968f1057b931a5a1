pub mod onboarding;
pub mod receipts;
pub mod reminders;
