pub mod auth;
pub mod client;
pub mod evaluation;
pub mod session;
