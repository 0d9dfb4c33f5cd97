use std::future::Future;

use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::path::DocPath;

/// Raw document payload as stored.
pub type Document = serde_json::Value;

/// Document version. 0 means "absent"; any write produces a version that
/// differs from every version the document previously had, so a matching
/// version proves the document is unchanged since it was read.
pub type Version = u64;

/// A staged write: full-document set or delete.
#[derive(Debug, Clone)]
pub enum Write {
    Set { path: DocPath, data: Document },
    Delete { path: DocPath },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A document in the read set changed between read and commit.
    #[error("write conflict")]
    Conflict,
    #[error("document serialization failed")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Port over the managed document store.
///
/// Implementors are cheap to clone (a handle over shared state or a
/// connection pool). Atomicity guarantees live entirely in [`Self::commit`]:
/// either every staged write lands or none does, and the commit fails with
/// [`StoreError::Conflict`] if any read version is stale.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Read one document together with its current version.
    fn get_versioned(
        &self,
        path: &DocPath,
    ) -> impl Future<Output = Result<(Option<Document>, Version), StoreError>> + Send;

    /// Read bypassing any replica or cache. Backends without replicas
    /// answer from the same state as [`Self::get_versioned`].
    fn get_from_primary(
        &self,
        path: &DocPath,
    ) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send {
        async { self.get_versioned(path).await.map(|(doc, _)| doc) }
    }

    /// Atomically apply `writes` iff every `(path, version)` pair in
    /// `reads` is still current. An empty read set is an unconditional
    /// batch commit.
    fn commit(
        &self,
        reads: &[(DocPath, Version)],
        writes: Vec<Write>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Direct children of a collection path.
    fn list(
        &self,
        collection: &DocPath,
    ) -> impl Future<Output = Result<Vec<(DocPath, Document)>, StoreError>> + Send;

    /// Subscribe to a single document. The receiver holds the current value
    /// immediately and observes every subsequent change to that document in
    /// order; no ordering is promised across different documents.
    fn watch(
        &self,
        path: &DocPath,
    ) -> impl Future<Output = Result<watch::Receiver<Option<Document>>, StoreError>> + Send;

    /// Best-effort delete of a document and all of its descendants.
    /// Not transactional; callers must tolerate partial completion and
    /// retry idempotently.
    fn recursive_delete(&self, path: &DocPath) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Typed read of one document.
    fn get<T: DeserializeOwned>(
        &self,
        path: &DocPath,
    ) -> impl Future<Output = Result<Option<T>, StoreError>> + Send {
        async {
            let (doc, _) = self.get_versioned(path).await?;
            doc.map(serde_json::from_value).transpose().map_err(Into::into)
        }
    }
}
