pub mod password;
pub mod reset;
pub mod sessions;
pub mod token;

pub use sessions::Session;
