//! Document-store access layer for the E-Codes services.
//!
//! The store holds JSON documents addressed by slash-separated paths
//! (`orgs/{orgId}/departments/{deptId}`). Reads are versioned; writers
//! stage changes in a [`txn::Transaction`] (conditional on the versions
//! read) or a [`txn::WriteBatch`] (unconditional) and commit atomically.
//! [`txn::run_transaction`] retries the whole body on write conflicts.
//!
//! Two adapters: [`memory::MemoryStore`] for tests and local development,
//! [`pg::PgStore`] backed by Postgres through sea-orm.
//! [`conn::StoreConnection`] wraps whichever one a service was started with.

#![allow(async_fn_in_trait)]

pub mod conn;
pub mod layout;
pub mod memory;
pub mod path;
pub mod pg;
pub mod store;
pub mod txn;

pub use conn::StoreConnection;
pub use memory::MemoryStore;
pub use path::DocPath;
pub use pg::PgStore;
pub use store::{Document, DocumentStore, StoreError, Version, Write};
pub use txn::{MAX_TXN_ATTEMPTS, Transaction, WriteBatch, run_transaction};
