//! GA4 export web server library.
//!
//! Exposes config, state, error handling, the form, views and routes so the
//! integration tests and the binary entrypoint share them.

pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod views;
