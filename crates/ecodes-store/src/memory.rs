use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::path::DocPath;
use crate::store::{Document, DocumentStore, StoreError, Version, Write};

/// In-memory document store for tests and local development.
///
/// Versions come from one monotonic sequence, so a deleted-then-recreated
/// document never reuses a version a stale reader might still hold.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<State>,
    seq: AtomicU64,
}

#[derive(Default)]
struct State {
    docs: BTreeMap<DocPath, Entry>,
    watchers: HashMap<DocPath, watch::Sender<Option<Document>>>,
}

struct Entry {
    data: Document,
    version: Version,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_version(&self) -> Version {
        self.inner.seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn notify(state: &mut State, path: &DocPath) {
        let value = state.docs.get(path).map(|e| e.data.clone());
        if let Some(sender) = state.watchers.get(path) {
            // A failed send means every receiver is gone; drop the channel.
            if sender.send(value).is_err() {
                state.watchers.remove(path);
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    async fn get_versioned(
        &self,
        path: &DocPath,
    ) -> Result<(Option<Document>, Version), StoreError> {
        let state = self.inner.state.lock().unwrap();
        Ok(match state.docs.get(path) {
            Some(entry) => (Some(entry.data.clone()), entry.version),
            None => (None, 0),
        })
    }

    async fn commit(
        &self,
        reads: &[(DocPath, Version)],
        writes: Vec<Write>,
    ) -> Result<(), StoreError> {
        let mut state = self.inner.state.lock().unwrap();
        for (path, version) in reads {
            let current = state.docs.get(path).map(|e| e.version).unwrap_or(0);
            if current != *version {
                return Err(StoreError::Conflict);
            }
        }
        let mut touched = Vec::with_capacity(writes.len());
        for write in writes {
            match write {
                Write::Set { path, data } => {
                    let version = self.next_version();
                    state.docs.insert(path.clone(), Entry { data, version });
                    touched.push(path);
                }
                Write::Delete { path } => {
                    state.docs.remove(&path);
                    touched.push(path);
                }
            }
        }
        for path in &touched {
            Self::notify(&mut state, path);
        }
        Ok(())
    }

    async fn list(&self, collection: &DocPath) -> Result<Vec<(DocPath, Document)>, StoreError> {
        let state = self.inner.state.lock().unwrap();
        Ok(state
            .docs
            .iter()
            .filter(|(path, _)| path.is_child_of(collection))
            .map(|(path, entry)| (path.clone(), entry.data.clone()))
            .collect())
    }

    async fn watch(&self, path: &DocPath) -> Result<watch::Receiver<Option<Document>>, StoreError> {
        let mut state = self.inner.state.lock().unwrap();
        let current = state.docs.get(path).map(|e| e.data.clone());
        if let Some(sender) = state.watchers.get(path) {
            if !sender.is_closed() {
                return Ok(sender.subscribe());
            }
        }
        let (sender, receiver) = watch::channel(current);
        state.watchers.insert(path.clone(), sender);
        Ok(receiver)
    }

    async fn recursive_delete(&self, path: &DocPath) -> Result<(), StoreError> {
        let mut state = self.inner.state.lock().unwrap();
        let doomed: Vec<DocPath> = state
            .docs
            .keys()
            .filter(|p| *p == path || p.is_descendant_of(path))
            .cloned()
            .collect();
        for p in &doomed {
            state.docs.remove(p);
            Self::notify(&mut state, p);
        }
        Ok(())
    }
}
