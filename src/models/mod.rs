pub mod appointment;
pub mod client;
pub mod user;
