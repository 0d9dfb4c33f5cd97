//! HTTP adapter for the identity provider's admin API.

use anyhow::Context;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecodes_auth_types::roles::AccessClaims;

use crate::domain::provider::{AccountChanges, IdentityProvider, ProviderAccount};
use crate::error::AccountsServiceError;

#[derive(Clone)]
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountBody<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountBody {
    subject: Uuid,
    email: String,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    claims: Option<AccessClaims>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAccountBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
}

impl HttpIdentityProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        phone_number: Option<&str>,
    ) -> Result<Uuid, AccountsServiceError> {
        let response = self
            .http
            .post(self.url("/v1/accounts"))
            .bearer_auth(&self.api_key)
            .json(&CreateAccountBody {
                email,
                phone_number,
            })
            .send()
            .await
            .context("identity provider unreachable")?
            .error_for_status()
            .context("account provisioning failed")?;
        let body: AccountBody = response
            .json()
            .await
            .context("malformed provisioning response")?;
        Ok(body.subject)
    }

    async fn set_claims(
        &self,
        subject: Uuid,
        claims: &AccessClaims,
    ) -> Result<(), AccountsServiceError> {
        self.http
            .put(self.url(&format!("/v1/accounts/{subject}/claims")))
            .bearer_auth(&self.api_key)
            .json(claims)
            .send()
            .await
            .context("identity provider unreachable")?
            .error_for_status()
            .context("setting claims failed")?;
        Ok(())
    }

    async fn get_account(
        &self,
        subject: Uuid,
    ) -> Result<Option<ProviderAccount>, AccountsServiceError> {
        let response = self
            .http
            .get(self.url(&format!("/v1/accounts/{subject}")))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("identity provider unreachable")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: AccountBody = response
            .error_for_status()
            .context("account lookup failed")?
            .json()
            .await
            .context("malformed account response")?;
        Ok(Some(ProviderAccount {
            subject: body.subject,
            email: body.email,
            phone_number: body.phone_number,
            claims: body.claims,
        }))
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ProviderAccount>, AccountsServiceError> {
        let response = self
            .http
            .get(self.url("/v1/accounts"))
            .query(&[("email", email)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("identity provider unreachable")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: AccountBody = response
            .error_for_status()
            .context("account lookup failed")?
            .json()
            .await
            .context("malformed account response")?;
        Ok(Some(ProviderAccount {
            subject: body.subject,
            email: body.email,
            phone_number: body.phone_number,
            claims: body.claims,
        }))
    }

    async fn update_account(
        &self,
        subject: Uuid,
        changes: &AccountChanges,
    ) -> Result<(), AccountsServiceError> {
        self.http
            .patch(self.url(&format!("/v1/accounts/{subject}")))
            .bearer_auth(&self.api_key)
            .json(&UpdateAccountBody {
                phone_number: changes.phone_number.as_deref(),
            })
            .send()
            .await
            .context("identity provider unreachable")?
            .error_for_status()
            .context("account update failed")?;
        Ok(())
    }

    async fn delete_account(&self, subject: Uuid) -> Result<(), AccountsServiceError> {
        let response = self
            .http
            .delete(self.url(&format!("/v1/accounts/{subject}")))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("identity provider unreachable")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        response
            .error_for_status()
            .context("account deletion failed")?;
        Ok(())
    }
}
