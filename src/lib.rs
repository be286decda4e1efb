pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod menu;
pub mod middleware;
pub mod router;
pub mod server;
pub mod session;
pub mod state;
pub mod store;
