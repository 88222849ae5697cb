//! The project document: the root aggregate owning the whole work subtree.

use crate::hierarchy::WorkStage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A whole construction-project document
///
/// The document exclusively owns its subtree; the only cross-aggregate
/// references are opaque id strings (`foreman_id`, crew ids inside
/// subtasks). Unknown fields are preserved verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Assigned foreman, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreman_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreman_email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_stages: Vec<WorkStage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectDocument {
    /// Decode a raw stored document
    ///
    /// # Errors
    /// Fails when a named field has the wrong shape; unknown fields never
    /// cause a failure.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Encode back into the stored representation
    ///
    /// # Errors
    /// Fails only on non-serializable contents, which the model cannot hold.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Id/name projection of a project, returned by listing operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

/// Payload for creating a new project document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub project_id: String,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreman_id: Option<String>,
    #[serde(default)]
    pub work_stages: Vec<WorkStage>,
}

impl From<ProjectCreate> for ProjectDocument {
    fn from(create: ProjectCreate) -> Self {
        Self {
            project_id: create.project_id,
            project_name: Some(create.project_name),
            foreman_id: create.foreman_id,
            foreman_email: None,
            work_stages: create.work_stages,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn document_round_trip_preserves_extra_fields() {
        let raw = serde_json::json!({
            "project_id": "p1",
            "project_name": "Residential block A",
            "foreman_id": "f-17",
            "contract_number": "N-2024-118",
            "work_stages": [{"stage_id": "s1"}]
        });
        let doc = ProjectDocument::from_value(raw.clone()).unwrap();
        assert_eq!(doc.extra["contract_number"], "N-2024-118");
        assert_eq!(doc.to_value().unwrap(), raw);
    }

    #[test]
    fn create_payload_becomes_document() {
        let create = ProjectCreate {
            project_id: "p9".into(),
            project_name: "Warehouse".into(),
            foreman_id: None,
            work_stages: vec![],
        };
        let doc = ProjectDocument::from(create);
        assert_eq!(doc.project_id, "p9");
        assert_eq!(doc.project_name.as_deref(), Some("Warehouse"));
        assert!(doc.work_stages.is_empty());
    }
}
