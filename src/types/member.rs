use serde::{Deserialize, Serialize};

/// A team member with a per-sprint capacity in effort points.
///
/// `id` is stable per source; merging the same id from a later import
/// overwrites the earlier record. Capacity is user-editable after import.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: Option<String>,
    pub capacity_per_sprint: f64,
    #[serde(default)]
    pub skills: Vec<String>,
}
