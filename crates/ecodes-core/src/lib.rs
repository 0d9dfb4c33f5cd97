//! Shared plumbing for E-Codes services: env config loading, health
//! handlers, request-id middleware, wire serializers, tracing setup.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
