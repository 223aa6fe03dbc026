pub mod auth;
pub mod cors;
pub mod error_handler;
