//! Work crews (brigades) and the snapshots embedded in subtasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One member of a crew
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrigadeMember {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Crew composition captured at assignment time
///
/// Stored on the subtask, not referenced live: later roster changes must
/// not rewrite what the subtask was assigned with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrigadeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brigade_name: Option<String>,
    #[serde(default)]
    pub members: Vec<BrigadeMember>,
}

/// A crew document in its own collection, keyed by deterministic id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrigadeDocument {
    pub brigade_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brigade_name: Option<String>,
    #[serde(default)]
    pub members: Vec<BrigadeMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BrigadeDocument {
    /// Snapshot of this crew for embedding into a subtask
    #[must_use]
    pub fn snapshot(&self) -> BrigadeSnapshot {
        BrigadeSnapshot {
            brigade_name: self.brigade_name.clone(),
            members: self.members.clone(),
        }
    }
}
