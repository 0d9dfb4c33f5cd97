//! Domain types for the E-Codes emergency-notification system.
//!
//! Everything here is plain data: the organization tree (departments,
//! buildings, floors), emergency-code definitions, user records, and the
//! denormalized map documents kept in sync with the primary records.
//! Wire shape is camelCase JSON, matching the persisted documents.

pub mod code;
pub mod maps;
pub mod name;
pub mod org;
pub mod user;
