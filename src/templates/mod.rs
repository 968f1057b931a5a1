pub mod emails;
pub mod layouts;
