//! HTTP surface of archivist: passwordless magic-link login, session tokens,
//! and the bearer gate that protects the user registry.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
