use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::path::DocPath;
use crate::store::{DocumentStore, StoreError, Version, Write};

/// Upper bound on transaction attempts before a conflict is surfaced.
pub const MAX_TXN_ATTEMPTS: u32 = 5;

/// An optimistic read-modify-write unit.
///
/// Every [`Self::get`] records the version it observed; [`Self::commit`]
/// applies the staged writes only if all of those versions are still
/// current. Reads within one transaction therefore behave as a snapshot:
/// a concurrent write to anything read invalidates the whole commit.
pub struct Transaction<S> {
    store: S,
    reads: Vec<(DocPath, Version)>,
    writes: Vec<Write>,
}

impl<S: DocumentStore> Transaction<S> {
    pub fn begin(store: S) -> Self {
        Self {
            store,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Versioned typed read; the observed version joins the conflict set.
    pub async fn get<T: DeserializeOwned>(
        &mut self,
        path: &DocPath,
    ) -> Result<Option<T>, StoreError> {
        let (doc, version) = self.store.get_versioned(path).await?;
        self.reads.push((path.clone(), version));
        doc.map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    /// Stage a full-document write.
    pub fn set<T: Serialize>(&mut self, path: &DocPath, value: &T) -> Result<(), StoreError> {
        self.writes.push(Write::Set {
            path: path.clone(),
            data: serde_json::to_value(value)?,
        });
        Ok(())
    }

    /// Stage a document delete.
    pub fn delete(&mut self, path: &DocPath) {
        self.writes.push(Write::Delete { path: path.clone() });
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        self.store.commit(&self.reads, self.writes).await
    }
}

/// Unconditional staged writes with an atomic commit — no read set, so a
/// batch never conflicts.
#[derive(Default)]
pub struct WriteBatch {
    writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Serialize>(&mut self, path: &DocPath, value: &T) -> Result<(), StoreError> {
        self.writes.push(Write::Set {
            path: path.clone(),
            data: serde_json::to_value(value)?,
        });
        Ok(())
    }

    pub fn delete(&mut self, path: &DocPath) {
        self.writes.push(Write::Delete { path: path.clone() });
    }

    pub async fn commit<S: DocumentStore>(self, store: &S) -> Result<(), StoreError> {
        store.commit(&[], self.writes).await
    }
}

/// Run `body` inside a transaction, retrying the whole body when the
/// commit hits a write conflict, up to [`MAX_TXN_ATTEMPTS`].
///
/// The body observes a consistent snapshot per attempt and must not carry
/// side effects outside the transaction, since it may run several times.
pub async fn run_transaction<S, T, E, F>(store: &S, mut body: F) -> Result<T, E>
where
    S: DocumentStore,
    E: From<StoreError>,
    F: for<'a> FnMut(
        &'a mut Transaction<S>,
    ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>,
{
    let mut attempt = 1;
    loop {
        let mut txn = Transaction::begin(store.clone());
        let out = body(&mut txn).await?;
        match txn.commit().await {
            Ok(()) => return Ok(out),
            Err(StoreError::Conflict) if attempt < MAX_TXN_ATTEMPTS => {
                tracing::debug!(attempt, "transaction conflict, retrying");
                attempt += 1;
            }
            Err(e) => return Err(E::from(e)),
        }
    }
}
