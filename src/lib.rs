pub mod comment;
pub mod config;
pub mod database;
pub mod like;
pub mod middleware;
pub mod post;
pub mod router;
pub mod state;
pub mod user;
pub mod utils;
