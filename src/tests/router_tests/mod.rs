mod auth_tests;
mod file_tests;
mod message_tests;
mod payment_tests;
mod property_tests;
mod reminder_tests;
mod tenant_tests;
