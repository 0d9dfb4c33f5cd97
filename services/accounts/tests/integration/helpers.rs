use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use ecodes_accounts::domain::provider::{AccountChanges, IdentityProvider, ProviderAccount};
use ecodes_accounts::error::AccountsServiceError;
use ecodes_accounts::validate::{DepartmentPayload, UserPayload};
use ecodes_auth_types::roles::AccessClaims;
use ecodes_domain::org::Department;
use ecodes_store::{DocumentStore, MemoryStore, layout};

// ── MockIdentityProvider ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockIdentityProvider {
    pub accounts: Arc<Mutex<HashMap<Uuid, ProviderAccount>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_create: Arc<Mutex<bool>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register an account, as if provisioned earlier.
    pub fn with_account(self, account: ProviderAccount) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.subject, account);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn account(&self, subject: Uuid) -> Option<ProviderAccount> {
        self.accounts.lock().unwrap().get(&subject).cloned()
    }
}

impl IdentityProvider for MockIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        phone_number: Option<&str>,
    ) -> Result<Uuid, AccountsServiceError> {
        self.calls.lock().unwrap().push("create_account".into());
        if *self.fail_create.lock().unwrap() {
            return Err(AccountsServiceError::Internal(anyhow::anyhow!(
                "provisioning outage"
            )));
        }
        let subject = Uuid::new_v4();
        self.accounts.lock().unwrap().insert(
            subject,
            ProviderAccount {
                subject,
                email: email.to_owned(),
                phone_number: phone_number.map(str::to_owned),
                claims: None,
            },
        );
        Ok(subject)
    }

    async fn set_claims(
        &self,
        subject: Uuid,
        claims: &AccessClaims,
    ) -> Result<(), AccountsServiceError> {
        self.calls.lock().unwrap().push("set_claims".into());
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&subject)
            .ok_or(AccountsServiceError::UserNotFound)?;
        account.claims = Some(claims.clone());
        Ok(())
    }

    async fn get_account(
        &self,
        subject: Uuid,
    ) -> Result<Option<ProviderAccount>, AccountsServiceError> {
        self.calls.lock().unwrap().push("get_account".into());
        Ok(self.accounts.lock().unwrap().get(&subject).cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ProviderAccount>, AccountsServiceError> {
        self.calls.lock().unwrap().push("find_by_email".into());
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn update_account(
        &self,
        subject: Uuid,
        changes: &AccountChanges,
    ) -> Result<(), AccountsServiceError> {
        self.calls.lock().unwrap().push("update_account".into());
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&subject)
            .ok_or(AccountsServiceError::UserNotFound)?;
        if let Some(phone) = &changes.phone_number {
            account.phone_number = Some(phone.clone());
        }
        Ok(())
    }

    async fn delete_account(&self, subject: Uuid) -> Result<(), AccountsServiceError> {
        self.calls.lock().unwrap().push("delete_account".into());
        self.accounts.lock().unwrap().remove(&subject);
        Ok(())
    }
}

// ── Payload helpers ──────────────────────────────────────────────────────────

pub async fn department_payload(
    store: &MemoryStore,
    org_id: Uuid,
    dept_id: Uuid,
) -> DepartmentPayload {
    let dept: Department = store
        .get(&layout::department_doc(org_id, dept_id))
        .await
        .unwrap()
        .expect("seeded department");
    DepartmentPayload {
        id: Some(dept_id),
        name: dept.name,
    }
}

pub fn user_payload(email: &str, role: &str, department: DepartmentPayload) -> UserPayload {
    UserPayload {
        email: email.to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Nurse".to_owned(),
        phone_number: None,
        job_title: None,
        role: role.to_owned(),
        department: Some(department),
    }
}
