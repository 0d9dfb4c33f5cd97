//! Caller identity for E-Codes services.
//!
//! Services sit behind a gateway that authenticates the session and injects
//! the caller's subject id, bound organization, and role claims as
//! `x-ecodes-*` headers. This crate provides the axum extractor for those
//! headers and the role-claim types shared with the identity provider.

pub mod identity;
pub mod roles;
