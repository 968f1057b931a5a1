pub mod dates;
pub mod models;
pub mod money;
pub mod rent;
pub mod validation;
