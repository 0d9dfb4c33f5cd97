use tokio::sync::watch;

use crate::memory::MemoryStore;
use crate::path::DocPath;
use crate::pg::PgStore;
use crate::store::{Document, DocumentStore, StoreError, Version, Write};

/// Handle over whichever store backend a service was started with.
///
/// Services hold this in their `AppState` so handlers stay concrete;
/// production wires [`PgStore`], tests wire [`MemoryStore`]. Mirrors how
/// sea-orm's `DatabaseConnection` enumerates its backends.
#[derive(Clone)]
pub enum StoreConnection {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl From<PgStore> for StoreConnection {
    fn from(store: PgStore) -> Self {
        Self::Postgres(store)
    }
}

impl From<MemoryStore> for StoreConnection {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl DocumentStore for StoreConnection {
    async fn get_versioned(
        &self,
        path: &DocPath,
    ) -> Result<(Option<Document>, Version), StoreError> {
        match self {
            Self::Postgres(store) => store.get_versioned(path).await,
            Self::Memory(store) => store.get_versioned(path).await,
        }
    }

    async fn get_from_primary(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        match self {
            Self::Postgres(store) => store.get_from_primary(path).await,
            Self::Memory(store) => store.get_from_primary(path).await,
        }
    }

    async fn commit(
        &self,
        reads: &[(DocPath, Version)],
        writes: Vec<Write>,
    ) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.commit(reads, writes).await,
            Self::Memory(store) => store.commit(reads, writes).await,
        }
    }

    async fn list(&self, collection: &DocPath) -> Result<Vec<(DocPath, Document)>, StoreError> {
        match self {
            Self::Postgres(store) => store.list(collection).await,
            Self::Memory(store) => store.list(collection).await,
        }
    }

    async fn watch(&self, path: &DocPath) -> Result<watch::Receiver<Option<Document>>, StoreError> {
        match self {
            Self::Postgres(store) => store.watch(path).await,
            Self::Memory(store) => store.watch(path).await,
        }
    }

    async fn recursive_delete(&self, path: &DocPath) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.recursive_delete(path).await,
            Self::Memory(store) => store.recursive_delete(path).await,
        }
    }
}
