use serde::{Deserialize, Serialize};

use super::{IssueType, Priority, Status};

/// A canonical work item, flattened from whichever source supplied it.
///
/// `id` is the dedup identity within a source; `key` is the human-readable
/// code (e.g. PROJ-101) and is only unique per source. `source` records
/// which import produced the record and drives selective removal.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub issue_type: IssueType,
    pub priority: Priority,
    pub status: Status,
    pub assignee_id: Option<String>,
    pub story_points: f64,
    pub sprint_id: Option<String>,
    pub source: String,
    #[serde(default)]
    pub time_spent_seconds: u64,
    #[serde(default)]
    pub time_estimate_seconds: u64,
    pub parent_key: Option<String>,
    pub parent_summary: Option<String>,
}

impl Issue {
    /// Project key portion of the issue key ("PROJ-101" -> "PROJ"),
    /// falling back to the source tag for keys without a prefix.
    pub fn project_key(&self) -> &str {
        match self.key.split_once('-') {
            Some((prefix, _)) if !prefix.is_empty() => prefix,
            _ => &self.source,
        }
    }
}
