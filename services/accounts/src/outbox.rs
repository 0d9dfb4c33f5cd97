//! Operation outbox for user mutations.
//!
//! A user mutation spans two systems that cannot share a transaction: the
//! identity provider and the document store. Before touching either, the
//! intended operation is persisted under `orgs/{orgId}/outbox/{opId}`; it is
//! marked once both sides are done. A crash in between leaves a stale
//! `pending` entry for the reconciliation sweep to roll forward or back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecodes_store::{DocumentStore, WriteBatch, layout};

use crate::error::AccountsServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpKind {
    CreateUser,
    UpdateUser,
    DeleteUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpStatus {
    Pending,
    Processed,
    RolledBack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOp {
    pub kind: OpKind,
    /// The validated request, replayable by the sweep.
    pub payload: serde_json::Value,
    /// Identity-provider subject, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Uuid>,
    pub status: OpStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persist a new pending operation and return its id.
pub async fn record<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    kind: OpKind,
    payload: serde_json::Value,
    subject: Option<Uuid>,
) -> Result<Uuid, AccountsServiceError> {
    let op_id = Uuid::new_v4();
    let now = Utc::now();
    let op = PendingOp {
        kind,
        payload,
        subject,
        status: OpStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    let mut batch = WriteBatch::new();
    batch.set(&layout::outbox_doc(org_id, op_id), &op)?;
    batch.commit(store).await?;
    Ok(op_id)
}

/// Attach the provider subject to an operation once provisioning returned it.
pub async fn set_subject<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    op_id: Uuid,
    subject: Uuid,
) -> Result<(), AccountsServiceError> {
    let path = layout::outbox_doc(org_id, op_id);
    let mut op: PendingOp = store
        .get(&path)
        .await?
        .ok_or_else(|| AccountsServiceError::Internal(anyhow::anyhow!("outbox entry vanished")))?;
    op.subject = Some(subject);
    op.updated_at = Utc::now();
    let mut batch = WriteBatch::new();
    batch.set(&path, &op)?;
    batch.commit(store).await?;
    Ok(())
}

/// Move an operation to a terminal status.
pub async fn mark<S: DocumentStore>(
    store: &S,
    org_id: Uuid,
    op_id: Uuid,
    status: OpStatus,
) -> Result<(), AccountsServiceError> {
    let path = layout::outbox_doc(org_id, op_id);
    let Some(mut op) = store.get::<PendingOp>(&path).await? else {
        return Ok(());
    };
    op.status = status;
    op.updated_at = Utc::now();
    let mut batch = WriteBatch::new();
    batch.set(&path, &op)?;
    batch.commit(store).await?;
    Ok(())
}

/// Mark an operation done, downgrading a failure to a warning: the work
/// itself succeeded and the sweep handles the leftover entry idempotently.
pub async fn try_mark<S: DocumentStore>(store: &S, org_id: Uuid, op_id: Uuid, status: OpStatus) {
    if let Err(e) = mark(store, org_id, op_id, status).await {
        tracing::warn!(error = %e, %org_id, %op_id, "failed to finalize outbox entry");
    }
}
