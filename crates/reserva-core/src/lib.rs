//! Cross-service plumbing shared by Reserva services.
//!
//! Health endpoints, tracing init, request-id middleware, and the env config
//! loader trait.

pub mod config;
pub mod health;
pub mod middleware;
pub mod tracing;
