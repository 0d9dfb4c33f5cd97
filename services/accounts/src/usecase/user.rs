//! Privileged user mutations. Each flow follows the same shape: validate,
//! persist the intent in the outbox, touch the identity provider, sync the
//! record, and finalize the outbox entry.

use chrono::Utc;
use uuid::Uuid;

use ecodes_auth_types::roles::{AccessClaims, RoleFlags};
use ecodes_domain::user::{Role, UserRecord};
use ecodes_store::DocumentStore;

use crate::domain::provider::{AccountChanges, IdentityProvider};
use crate::error::AccountsServiceError;
use crate::outbox::{self, OpKind, OpStatus};
use crate::usecase::record;
use crate::validate::{UserPayload, validate_user_payload};

/// Claims the provider should hold for a user of `role` in `org_id`.
/// The console's `Admin` role maps to the `OrgAdmin` claim flag.
pub fn claims_for(org_id: Uuid, role: Role) -> AccessClaims {
    let roles = match role {
        Role::Admin => RoleFlags {
            org_admin: true,
            ..Default::default()
        },
        Role::RotaAdmin => RoleFlags {
            rota_admin: true,
            ..Default::default()
        },
        Role::User => RoleFlags {
            user: true,
            ..Default::default()
        },
    };
    AccessClaims { org_id, roles }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserUseCase<S: DocumentStore, P: IdentityProvider> {
    pub store: S,
    pub provider: P,
}

impl<S: DocumentStore, P: IdentityProvider> CreateUserUseCase<S, P> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        payload: UserPayload,
    ) -> Result<(Uuid, UserRecord), AccountsServiceError> {
        let validated = validate_user_payload(&self.store, org_id, &payload).await?;

        let op_payload = serde_json::to_value(&payload)
            .map_err(|e| AccountsServiceError::Internal(e.into()))?;
        let op_id =
            outbox::record(&self.store, org_id, OpKind::CreateUser, op_payload, None).await?;

        let subject = self
            .provider
            .create_account(&validated.email, validated.phone_number.as_deref())
            .await?;
        outbox::set_subject(&self.store, org_id, op_id, subject).await?;
        self.provider
            .set_claims(subject, &claims_for(org_id, validated.role))
            .await?;

        let now = Utc::now();
        let user = UserRecord {
            email: validated.email,
            first_name: validated.first_name,
            last_name: validated.last_name,
            phone_number: validated.phone_number,
            job_title: validated.job_title,
            role: validated.role,
            department: validated.department,
            created_at: now,
            updated_at: now,
        };
        record::add_user(&self.store, org_id, subject, &user).await?;

        outbox::try_mark(&self.store, org_id, op_id, OpStatus::Processed).await;
        Ok((subject, user))
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserUseCase<S: DocumentStore, P: IdentityProvider> {
    pub store: S,
    pub provider: P,
}

impl<S: DocumentStore, P: IdentityProvider> UpdateUserUseCase<S, P> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        uid: Uuid,
        payload: UserPayload,
    ) -> Result<UserRecord, AccountsServiceError> {
        let validated = validate_user_payload(&self.store, org_id, &payload).await?;

        let account = self
            .provider
            .get_account(uid)
            .await?
            .ok_or_else(|| AccountsServiceError::invalid("Invalid user id"))?;
        if account.email != validated.email {
            return Err(AccountsServiceError::Unimplemented);
        }

        let op_payload = serde_json::to_value(&payload)
            .map_err(|e| AccountsServiceError::Internal(e.into()))?;
        let op_id =
            outbox::record(&self.store, org_id, OpKind::UpdateUser, op_payload, Some(uid)).await?;

        if validated.phone_number.is_some() && validated.phone_number != account.phone_number {
            self.provider
                .update_account(
                    uid,
                    &AccountChanges {
                        phone_number: validated.phone_number.clone(),
                    },
                )
                .await?;
        }

        let desired = claims_for(org_id, validated.role);
        let claims_current = account
            .claims
            .as_ref()
            .is_some_and(|c| c.org_id == desired.org_id && c.roles == desired.roles);
        if !claims_current {
            self.provider.set_claims(uid, &desired).await?;
        }

        let merged = record::edit_user(&self.store, org_id, uid, &validated).await?;

        outbox::try_mark(&self.store, org_id, op_id, OpStatus::Processed).await;
        Ok(merged)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<S: DocumentStore, P: IdentityProvider> {
    pub store: S,
    pub provider: P,
}

impl<S: DocumentStore, P: IdentityProvider> DeleteUserUseCase<S, P> {
    pub async fn execute(&self, org_id: Uuid, uid: Uuid) -> Result<(), AccountsServiceError> {
        self.provider
            .get_account(uid)
            .await?
            .ok_or_else(|| AccountsServiceError::invalid("Invalid user id"))?;

        let op_id = outbox::record(
            &self.store,
            org_id,
            OpKind::DeleteUser,
            serde_json::Value::Null,
            Some(uid),
        )
        .await?;

        self.provider.delete_account(uid).await?;
        match record::remove_user(&self.store, org_id, uid).await {
            // The record already being gone still completes the delete.
            Ok(()) | Err(AccountsServiceError::UserNotFound) => {}
            Err(e) => return Err(e),
        }

        outbox::try_mark(&self.store, org_id, op_id, OpStatus::Processed).await;
        Ok(())
    }
}
