//! Raw tracker response shapes shared across the client and the paste
//! ingestion path.
//!
//! Every field below is optional or defaulted: a single malformed record
//! must never fail a whole batch, so the normalizer decides what is usable
//! record by record.

use std::collections::HashMap;

use serde::Deserialize;

/// A user record as returned by the assignable-user search.
#[derive(Deserialize, Debug, Clone)]
pub struct RawUser {
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "accountType")]
    pub account_type: Option<String>,
    #[serde(rename = "avatarUrls", default)]
    pub avatar_urls: HashMap<String, String>,
}

/// Paged sprint listing from the agile board endpoint.
#[derive(Deserialize, Debug)]
pub struct RawSprintPage {
    #[serde(default)]
    pub values: Vec<RawSprint>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawSprint {
    pub id: Option<serde_json::Value>,
    pub name: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// Issue search response.
#[derive(Deserialize, Debug)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawIssue {
    pub id: Option<String>,
    pub key: Option<String>,
    #[serde(default)]
    pub fields: RawIssueFields,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawIssueFields {
    pub summary: Option<String>,
    pub issuetype: Option<RawNamed>,
    pub priority: Option<RawNamed>,
    pub status: Option<RawStatus>,
    pub assignee: Option<RawAssignee>,
    /// Story-point estimate custom field; numbers, numeric strings and
    /// garbage all show up in the wild.
    #[serde(rename = "customfield_10016")]
    pub story_points: Option<serde_json::Value>,
    pub timespent: Option<serde_json::Value>,
    #[serde(rename = "timeoriginalestimate")]
    pub time_estimate: Option<serde_json::Value>,
    pub parent: Option<RawParent>,
    /// Sprint reference: an object, an array of objects, or a legacy
    /// toString blob depending on tracker version and field config.
    pub sprint: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawNamed {
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawStatus {
    pub name: Option<String>,
    #[serde(rename = "statusCategory")]
    pub status_category: Option<RawNamed>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawAssignee {
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawParent {
    pub key: Option<String>,
    #[serde(default)]
    pub fields: RawParentFields,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawParentFields {
    pub summary: Option<String>,
}
