//! Test utilities for E-Codes services.
//!
//! Provides `MockAuth` (gateway identity headers) and store seeding
//! helpers. Import in `#[cfg(test)]` and `tests/` only — never in
//! production code.

pub mod auth;
pub mod seed;
