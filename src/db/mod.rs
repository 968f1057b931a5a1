pub mod auth;
pub mod connection;
pub mod images;
pub mod messages;
pub mod payments;
pub mod properties;
pub mod reminders;
pub mod requests;
pub mod tenants;
pub mod users;

pub use connection::{init_db, Database};
