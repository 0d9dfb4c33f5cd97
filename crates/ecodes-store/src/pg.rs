use std::time::Duration;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    QuerySelect, TransactionTrait,
};
use tokio::sync::watch;

use ecodes_store_schema::documents;

use crate::path::DocPath;
use crate::store::{Document, DocumentStore, StoreError, Version, Write};

/// How often a watch polls Postgres for a version change.
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Postgres-backed document store: one `documents` row per document,
/// versioned by commit timestamp (microseconds).
///
/// Commits run inside a SQL transaction; the rows of the read set are
/// re-selected with `FOR UPDATE`, which serializes concurrent committers
/// touching the same documents and turns stale versions into
/// [`StoreError::Conflict`]. Paths read as absent get a version-0
/// placeholder row first, so concurrent first creates of the same
/// document conflict instead of overwriting each other.
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

#[derive(Debug, thiserror::Error)]
enum TxnFailure {
    #[error("write conflict")]
    Conflict,
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl PgStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn current_version(txn: &DatabaseTransaction, path: &DocPath) -> Result<i64, TxnFailure> {
    let row = documents::Entity::find_by_id(path.as_str())
        .lock_exclusive()
        .one(txn)
        .await?;
    Ok(row.map(|m| m.version).unwrap_or(0))
}

/// `FOR UPDATE` takes no lock on a row that does not exist, so two
/// first-time creators of the same path would both pass the version
/// check. A version-0 placeholder row gives them a row to serialize on;
/// version 0 still reads as "absent" everywhere.
async fn insert_placeholder(txn: &DatabaseTransaction, path: &DocPath) -> Result<(), TxnFailure> {
    let model = documents::ActiveModel {
        path: Set(path.as_str().to_owned()),
        data: Set(Document::Null),
        version: Set(0),
        updated_at: Set(Utc::now()),
    };
    documents::Entity::insert(model)
        .on_conflict(
            OnConflict::column(documents::Column::Path)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

impl DocumentStore for PgStore {
    async fn get_versioned(
        &self,
        path: &DocPath,
    ) -> Result<(Option<Document>, Version), StoreError> {
        let row = documents::Entity::find_by_id(path.as_str())
            .one(&self.db)
            .await
            .context("read document")?;
        Ok(match row {
            Some(model) if model.version != 0 => (Some(model.data), model.version as Version),
            _ => (None, 0),
        })
    }

    async fn commit(
        &self,
        reads: &[(DocPath, Version)],
        writes: Vec<Write>,
    ) -> Result<(), StoreError> {
        let reads = reads.to_vec();
        let result = self
            .db
            .transaction::<_, (), TxnFailure>(|txn| {
                Box::pin(async move {
                    for (path, version) in &reads {
                        if *version == 0 {
                            insert_placeholder(txn, path).await?;
                        }
                        if current_version(txn, path).await? != *version as i64 {
                            return Err(TxnFailure::Conflict);
                        }
                    }
                    // One version for the whole commit. Assumes a
                    // non-regressing clock; see DESIGN.md.
                    let now = Utc::now();
                    let commit_version = now.timestamp_micros();
                    for write in writes {
                        match write {
                            Write::Set { path, data } => {
                                let model = documents::ActiveModel {
                                    path: Set(path.as_str().to_owned()),
                                    data: Set(data),
                                    version: Set(commit_version),
                                    updated_at: Set(now),
                                };
                                documents::Entity::insert(model)
                                    .on_conflict(
                                        OnConflict::column(documents::Column::Path)
                                            .update_columns([
                                                documents::Column::Data,
                                                documents::Column::Version,
                                                documents::Column::UpdatedAt,
                                            ])
                                            .to_owned(),
                                    )
                                    .exec(txn)
                                    .await?;
                            }
                            Write::Delete { path } => {
                                documents::Entity::delete_by_id(path.as_str())
                                    .exec(txn)
                                    .await?;
                            }
                        }
                    }
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(sea_orm::TransactionError::Transaction(TxnFailure::Conflict)) => {
                Err(StoreError::Conflict)
            }
            Err(e) => Err(anyhow::Error::new(e).context("commit documents").into()),
        }
    }

    async fn list(&self, collection: &DocPath) -> Result<Vec<(DocPath, Document)>, StoreError> {
        let rows = documents::Entity::find()
            .filter(documents::Column::Path.like(format!("{collection}/%")))
            .filter(documents::Column::Version.ne(0))
            .all(&self.db)
            .await
            .context("list documents")?;
        Ok(rows
            .into_iter()
            .map(|m| (DocPath::new(m.path), m.data))
            .filter(|(path, _)| path.is_child_of(collection))
            .collect())
    }

    async fn watch(&self, path: &DocPath) -> Result<watch::Receiver<Option<Document>>, StoreError> {
        let (initial, mut last_version) = self.get_versioned(path).await?;
        let (sender, receiver) = watch::channel(initial);
        let store = self.clone();
        let path = path.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(WATCH_POLL_INTERVAL);
            loop {
                ticker.tick().await;
                if sender.is_closed() {
                    break;
                }
                match store.get_versioned(&path).await {
                    Ok((doc, version)) if version != last_version => {
                        last_version = version;
                        if sender.send(doc).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(path = %path, error = %e, "document watch poll failed");
                    }
                }
            }
        });
        Ok(receiver)
    }

    async fn recursive_delete(&self, path: &DocPath) -> Result<(), StoreError> {
        documents::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(documents::Column::Path.eq(path.as_str()))
                    .add(documents::Column::Path.like(format!("{path}/%"))),
            )
            .exec(&self.db)
            .await
            .context("recursive delete")?;
        Ok(())
    }
}
