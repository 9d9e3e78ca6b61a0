pub mod admin;
pub mod guard;
pub mod preferences;
pub mod session;
