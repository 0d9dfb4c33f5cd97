//! sea-orm entities for the Postgres document-store adapter.

pub mod documents;
