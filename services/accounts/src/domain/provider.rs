//! Port to the external identity provider's admin API.
//!
//! The provider is the system of record for credentials and access-control
//! claims; the document store only keeps the profile record. Every user
//! mutation touches both, bridged by the outbox in `crate::outbox`.

use std::future::Future;

use uuid::Uuid;

use ecodes_auth_types::roles::AccessClaims;

use crate::error::AccountsServiceError;

/// An account as the identity provider reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderAccount {
    pub subject: Uuid,
    pub email: String,
    pub phone_number: Option<String>,
    pub claims: Option<AccessClaims>,
}

/// Mutable account attributes, applied as a partial update.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub phone_number: Option<String>,
}

pub trait IdentityProvider: Clone + Send + Sync + 'static {
    /// Provision an account and return its subject id.
    fn create_account(
        &self,
        email: &str,
        phone_number: Option<&str>,
    ) -> impl Future<Output = Result<Uuid, AccountsServiceError>> + Send;

    /// Replace the account's access-control claims.
    fn set_claims(
        &self,
        subject: Uuid,
        claims: &AccessClaims,
    ) -> impl Future<Output = Result<(), AccountsServiceError>> + Send;

    /// Fetch an account, `None` when the subject is unknown.
    fn get_account(
        &self,
        subject: Uuid,
    ) -> impl Future<Output = Result<Option<ProviderAccount>, AccountsServiceError>> + Send;

    /// Look an account up by email. Emails are unique on the provider side,
    /// so this recovers the subject of an account whose id was never stored.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<ProviderAccount>, AccountsServiceError>> + Send;

    /// Apply a partial update to the account's attributes.
    fn update_account(
        &self,
        subject: Uuid,
        changes: &AccountChanges,
    ) -> impl Future<Output = Result<(), AccountsServiceError>> + Send;

    /// Delete the account. Deleting an unknown subject is not an error.
    fn delete_account(
        &self,
        subject: Uuid,
    ) -> impl Future<Output = Result<(), AccountsServiceError>> + Send;
}
