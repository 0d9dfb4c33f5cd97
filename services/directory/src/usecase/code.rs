//! Emergency-code operations. Codes have no per-entity primary documents:
//! every mutation rewrites the single `maps/ecodes` document.

use chrono::Utc;
use uuid::Uuid;

use ecodes_domain::code::EmergencyCode;
use ecodes_domain::maps::CodesDoc;
use ecodes_domain::name::ensure_unique_name;
use ecodes_domain::user::DepartmentRef;
use ecodes_store::{DocumentStore, layout, run_transaction};

use crate::error::DirectoryServiceError;
use crate::usecase::access::validate_codes;

#[derive(Clone)]
pub struct CodeInput {
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub departments: Vec<DepartmentRef>,
}

// ── GetCodes ─────────────────────────────────────────────────────────────────

pub struct GetCodesUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> GetCodesUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        cached: Option<CodesDoc>,
    ) -> Result<CodesDoc, DirectoryServiceError> {
        validate_codes(&self.store, org_id, cached).await
    }
}

// ── CreateCode ───────────────────────────────────────────────────────────────

pub struct CreateCodeUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> CreateCodeUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        input: CodeInput,
    ) -> Result<(Uuid, EmergencyCode), DirectoryServiceError> {
        let code_id = Uuid::new_v4();
        let code = run_transaction(&self.store, |txn| {
            let input = input.clone();
            Box::pin(async move {
            let mut doc: CodesDoc = txn
                .get(&layout::codes_doc(org_id))
                .await?
                .unwrap_or_default();
            ensure_unique_name(
                &input.name,
                None,
                doc.codes_map.iter().map(|(id, c)| (id, c.name.as_str())),
            )
            .map_err(|_| DirectoryServiceError::NameExists { entity: "Code" })?;

            let now = Utc::now();
            let code = EmergencyCode {
                name: input.name.clone(),
                color: input.color.clone(),
                description: input.description.clone(),
                departments: input.departments.clone(),
                created_at: now,
                updated_at: now,
            };
            doc.codes_map.insert(code_id, code.clone());
            txn.set(&layout::codes_doc(org_id), &doc)?;
            Ok::<_, DirectoryServiceError>(code)
        })
        })
        .await?;
        Ok((code_id, code))
    }
}

// ── UpdateCode ───────────────────────────────────────────────────────────────

pub struct UpdateCodeUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> UpdateCodeUseCase<S> {
    pub async fn execute(
        &self,
        org_id: Uuid,
        code_id: Uuid,
        input: CodeInput,
    ) -> Result<EmergencyCode, DirectoryServiceError> {
        run_transaction(&self.store, |txn| {
            let input = input.clone();
            Box::pin(async move {
            let mut doc: CodesDoc = txn
                .get(&layout::codes_doc(org_id))
                .await?
                .unwrap_or_default();
            let existing = doc
                .codes_map
                .get(&code_id)
                .ok_or(DirectoryServiceError::CodeNotFound)?;

            let name = if input.name == existing.name {
                existing.name.clone()
            } else {
                ensure_unique_name(
                    &input.name,
                    Some(code_id),
                    doc.codes_map.iter().map(|(id, c)| (id, c.name.as_str())),
                )
                .map_err(|_| DirectoryServiceError::NameExists { entity: "Code" })?;
                input.name.clone()
            };

            let code = EmergencyCode {
                name,
                color: input.color.clone(),
                description: input.description.clone(),
                departments: input.departments.clone(),
                created_at: existing.created_at,
                updated_at: Utc::now(),
            };
            doc.codes_map.insert(code_id, code.clone());
            txn.set(&layout::codes_doc(org_id), &doc)?;
            Ok::<_, DirectoryServiceError>(code)
        })
        })
        .await
    }
}

// ── RemoveCode ───────────────────────────────────────────────────────────────

pub struct RemoveCodeUseCase<S: DocumentStore> {
    pub store: S,
}

impl<S: DocumentStore> RemoveCodeUseCase<S> {
    pub async fn execute(&self, org_id: Uuid, code_id: Uuid) -> Result<(), DirectoryServiceError> {
        run_transaction(&self.store, |txn| Box::pin(async move {
            let mut doc: CodesDoc = txn
                .get(&layout::codes_doc(org_id))
                .await?
                .unwrap_or_default();
            if doc.codes_map.remove(&code_id).is_none() {
                return Err(DirectoryServiceError::CodeNotFound);
            }
            txn.set(&layout::codes_doc(org_id), &doc)?;
            Ok::<_, DirectoryServiceError>(())
        }))
        .await
    }
}
