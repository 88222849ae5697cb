//! Work-crew (brigade) identity and assignment.
//!
//! A crew's id is a deterministic digest of its member set, so the same
//! composition always resolves to the same document regardless of member
//! order or how many times it is submitted.

use crate::error::ServiceError;
use chrono::Utc;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use siteshift_model::{BrigadeDocument, BrigadeMember, BrigadeSnapshot};
use siteshift_store::{DocumentStore, StoreError};
use std::sync::Arc;

/// Crew lookup and creation over the brigades collection
#[derive(Debug)]
pub struct BrigadeService<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> BrigadeService<S> {
    /// Create the service over the brigades store
    #[inline]
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Deterministic crew id: sorted members joined with `|`, hashed
    #[must_use]
    pub fn brigade_id_for_members(members: &[String]) -> String {
        let mut sorted: Vec<&str> = members.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let joined = sorted.join("|");
        hex::encode(Sha256::digest(joined.as_bytes()))
    }

    /// Fetch a crew by id; absent crews are `None`, not an error
    pub async fn get_brigade(&self, brigade_id: &str) -> Result<Option<BrigadeDocument>, ServiceError> {
        match self.store.get(brigade_id).await {
            Ok(versioned) => {
                let document = serde_json::from_value(versioned.document)?;
                Ok(Some(document))
            }
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Resolve a member set to its crew, creating the document on first use
    pub async fn create_or_get_by_members(
        &self,
        members: &[String],
        brigade_name: Option<&str>,
        created_by: Option<&str>,
    ) -> Result<BrigadeDocument, ServiceError> {
        if members.is_empty() {
            return Err(ServiceError::Validation("members list must not be empty".into()));
        }

        let brigade_id = Self::brigade_id_for_members(members);
        if let Some(existing) = self.get_brigade(&brigade_id).await? {
            return Ok(existing);
        }

        let document = BrigadeDocument {
            brigade_id: brigade_id.clone(),
            brigade_name: Some(
                brigade_name
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Crew {}", &brigade_id[..6])),
            ),
            members: members
                .iter()
                .map(|user_id| BrigadeMember {
                    user_id: user_id.clone(),
                    email: None,
                })
                .collect(),
            created_at: Some(Utc::now()),
            created_by: created_by.map(str::to_string),
            extra: Map::new(),
        };
        let body = serde_json::to_value(&document)?;
        self.store.put(&brigade_id, body, None).await?;
        tracing::info!(brigade = %brigade_id, members = members.len(), "brigade created");
        Ok(document)
    }

    /// Rewrite a raw subtask payload's `assignees` into crew fields
    ///
    /// When the payload carries a non-empty `assignees` list, resolves (or
    /// creates) the crew, sets `brigade_id` and `brigade_snapshot`, and
    /// removes `assignees`. Payloads without assignees pass through
    /// untouched.
    pub async fn assign_to_subtask_payload(
        &self,
        payload: &mut Map<String, Value>,
        created_by: Option<&str>,
    ) -> Result<(), ServiceError> {
        let members: Vec<String> = payload
            .get("assignees")
            .and_then(Value::as_array)
            .map(|assignees| {
                assignees
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if members.is_empty() {
            return Ok(());
        }

        let brigade = self
            .create_or_get_by_members(&members, None, created_by)
            .await?;
        let snapshot: BrigadeSnapshot = brigade.snapshot();
        payload.insert("brigade_id".into(), Value::String(brigade.brigade_id));
        payload.insert("brigade_snapshot".into(), serde_json::to_value(snapshot)?);
        payload.remove("assignees");
        Ok(())
    }
}
