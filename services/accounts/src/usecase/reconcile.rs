//! Outbox reconciliation: sweeps stale pending operations and drives each to
//! a terminal state. Create rolls back (no half-provisioned accounts), update
//! rolls forward (the record edit is re-applied), delete completes.

use chrono::{Duration, Utc};
use uuid::Uuid;

use ecodes_domain::user::UserRecord;
use ecodes_store::{DocumentStore, layout};

use crate::domain::provider::IdentityProvider;
use crate::error::AccountsServiceError;
use crate::outbox::{self, OpKind, OpStatus, PendingOp};
use crate::usecase::record;
use crate::validate::{UserPayload, validate_user_payload};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub processed: usize,
    pub rolled_back: usize,
    pub skipped: usize,
}

pub struct ReconcileOutboxUseCase<S: DocumentStore, P: IdentityProvider> {
    pub store: S,
    pub provider: P,
    /// A pending entry younger than this may belong to an in-flight request
    /// and is left alone.
    pub stale_after: Duration,
}

impl<S: DocumentStore, P: IdentityProvider> ReconcileOutboxUseCase<S, P> {
    pub async fn execute(&self, org_id: Uuid) -> Result<ReconcileReport, AccountsServiceError> {
        let now = Utc::now();
        let mut report = ReconcileReport::default();

        for (path, doc) in self.store.list(&layout::outbox(org_id)).await? {
            let op: PendingOp = match serde_json::from_value(doc) {
                Ok(op) => op,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path, "unreadable outbox entry");
                    continue;
                }
            };
            if op.status != OpStatus::Pending {
                continue;
            }
            if now - op.updated_at < self.stale_after {
                report.skipped += 1;
                continue;
            }
            let Ok(op_id) = Uuid::parse_str(path.leaf()) else {
                tracing::warn!(path = %path, "outbox entry with non-uuid id");
                continue;
            };

            let outcome = match op.kind {
                OpKind::CreateUser => self.reconcile_create(org_id, op_id, &op).await,
                OpKind::UpdateUser => self.reconcile_update(org_id, op_id, &op).await,
                OpKind::DeleteUser => self.reconcile_delete(org_id, op_id, &op).await,
            };
            match outcome {
                Ok(OpStatus::Processed) => report.processed += 1,
                Ok(OpStatus::RolledBack) => report.rolled_back += 1,
                Ok(OpStatus::Pending) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(error = %e, %org_id, %op_id, "failed to reconcile outbox entry");
                }
            }
        }
        Ok(report)
    }

    /// A stale create either completed everything except the final mark, or
    /// died in the middle; in the latter case the provider account is removed
    /// so the operation leaves no trace.
    async fn reconcile_create(
        &self,
        org_id: Uuid,
        op_id: Uuid,
        op: &PendingOp,
    ) -> Result<OpStatus, AccountsServiceError> {
        let status = match op.subject {
            Some(subject) => {
                let record_exists = self
                    .store
                    .get::<UserRecord>(&layout::user_doc(org_id, subject))
                    .await?
                    .is_some();
                if record_exists {
                    OpStatus::Processed
                } else {
                    if self.provider.get_account(subject).await?.is_some() {
                        self.provider.delete_account(subject).await?;
                    }
                    OpStatus::RolledBack
                }
            }
            // Died before the subject was written back. The account may
            // still have been provisioned, so look it up by the payload's
            // email and remove it before declaring the rollback complete.
            None => {
                let payload: UserPayload = serde_json::from_value(op.payload.clone())
                    .map_err(|e| AccountsServiceError::Internal(e.into()))?;
                if let Some(account) = self.provider.find_by_email(&payload.email).await? {
                    self.provider.delete_account(account.subject).await?;
                }
                OpStatus::RolledBack
            }
        };
        outbox::mark(&self.store, org_id, op_id, status).await?;
        Ok(status)
    }

    /// A stale update is rolled forward by re-applying the recorded payload,
    /// unless the user or the payload is no longer valid.
    async fn reconcile_update(
        &self,
        org_id: Uuid,
        op_id: Uuid,
        op: &PendingOp,
    ) -> Result<OpStatus, AccountsServiceError> {
        let status = match op.subject {
            Some(subject) => {
                let payload: UserPayload = serde_json::from_value(op.payload.clone())
                    .map_err(|e| AccountsServiceError::Internal(e.into()))?;
                match validate_user_payload(&self.store, org_id, &payload).await {
                    Ok(validated) => {
                        match record::edit_user(&self.store, org_id, subject, &validated).await {
                            Ok(_) => OpStatus::Processed,
                            Err(AccountsServiceError::UserNotFound) => OpStatus::RolledBack,
                            Err(e) => return Err(e),
                        }
                    }
                    Err(AccountsServiceError::InvalidArgument(_)) => OpStatus::RolledBack,
                    Err(e) => return Err(e),
                }
            }
            None => OpStatus::RolledBack,
        };
        outbox::mark(&self.store, org_id, op_id, status).await?;
        Ok(status)
    }

    /// A stale delete is always completed: the account and the record are
    /// both removed if either is still present.
    async fn reconcile_delete(
        &self,
        org_id: Uuid,
        op_id: Uuid,
        op: &PendingOp,
    ) -> Result<OpStatus, AccountsServiceError> {
        let status = match op.subject {
            Some(subject) => {
                if self.provider.get_account(subject).await?.is_some() {
                    self.provider.delete_account(subject).await?;
                }
                match record::remove_user(&self.store, org_id, subject).await {
                    Ok(()) | Err(AccountsServiceError::UserNotFound) => {}
                    Err(e) => return Err(e),
                }
                OpStatus::Processed
            }
            None => OpStatus::RolledBack,
        };
        outbox::mark(&self.store, org_id, op_id, status).await?;
        Ok(status)
    }
}
