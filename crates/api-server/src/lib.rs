#![warn(clippy::unwrap_used)]

pub mod page;
pub mod rest;
pub mod server;
pub mod session_rest;

pub use rest::AppState;
pub use server::ApiServer;
