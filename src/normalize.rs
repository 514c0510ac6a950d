//! Record normalization: raw tracker records in, canonical entities out.
//!
//! Individual malformed records are skipped rather than failing the batch;
//! only a blob that yields no usable issues at all surfaces an error.

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{PlanError, Result};
use crate::responses::{RawIssue, RawSprint, RawUser};
use crate::types::{Issue, IssueType, Priority, Sprint, SprintState, Status, TeamMember};

pub const DEFAULT_ROLE: &str = "Developer";
pub const DEFAULT_CAPACITY: f64 = 10.0;

/// Account classification the tracker uses for standard human users.
const HUMAN_ACCOUNT_TYPE: &str = "atlassian";

/// Convert a raw user record, or drop it.
///
/// Service and app accounts are filtered out; only accounts explicitly
/// classified as human users are kept. Fields the source does not carry
/// get fixed defaults.
pub fn member_from_raw(raw: &RawUser) -> Option<TeamMember> {
    let id = raw.account_id.as_deref()?.trim();
    if id.is_empty() {
        return None;
    }
    if raw.account_type.as_deref() != Some(HUMAN_ACCOUNT_TYPE) {
        return None;
    }

    let avatar = raw
        .avatar_urls
        .get("48x48")
        .or_else(|| raw.avatar_urls.values().next())
        .cloned();

    Some(TeamMember {
        id: id.to_string(),
        name: raw
            .display_name
            .clone()
            .unwrap_or_else(|| id.to_string()),
        role: DEFAULT_ROLE.to_string(),
        avatar,
        capacity_per_sprint: DEFAULT_CAPACITY,
        skills: Vec::new(),
    })
}

/// Convert a raw issue record, or drop it.
pub fn issue_from_raw(raw: &RawIssue, source: &str) -> Option<Issue> {
    let id = raw.id.as_deref()?.trim();
    let key = raw.key.as_deref()?.trim();
    if id.is_empty() || key.is_empty() {
        return None;
    }

    let fields = &raw.fields;
    let status = fields.status.as_ref();

    Some(Issue {
        id: id.to_string(),
        key: key.to_string(),
        summary: fields.summary.clone().unwrap_or_default(),
        issue_type: IssueType::from_raw(named(&fields.issuetype)),
        priority: Priority::from_raw(named(&fields.priority)),
        status: Status::from_raw(
            status.and_then(|s| s.name.as_deref()).unwrap_or_default(),
            status
                .and_then(|s| s.status_category.as_ref())
                .and_then(|c| c.name.as_deref()),
        ),
        assignee_id: fields
            .assignee
            .as_ref()
            .and_then(|a| a.account_id.clone()),
        story_points: fields
            .story_points
            .as_ref()
            .and_then(number_from)
            .filter(|p| *p >= 0.0)
            .unwrap_or(0.0),
        sprint_id: fields.sprint.as_ref().and_then(extract_sprint_id),
        source: source.to_string(),
        time_spent_seconds: seconds_from(fields.timespent.as_ref()),
        time_estimate_seconds: seconds_from(fields.time_estimate.as_ref()),
        parent_key: fields.parent.as_ref().and_then(|p| p.key.clone()),
        parent_summary: fields
            .parent
            .as_ref()
            .and_then(|p| p.fields.summary.clone()),
    })
}

/// Convert a raw sprint record, or drop it.
///
/// Undated sprints are kept (future sprints have no dates yet); a sprint
/// whose dates are inverted is malformed and dropped.
pub fn sprint_from_raw(raw: &RawSprint, source: &str) -> Option<Sprint> {
    let id = sprint_id_value(raw.id.as_ref()?)?;
    let name = raw.name.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }

    let start_date = raw.start_date.as_deref().and_then(parse_date);
    let end_date = raw.end_date.as_deref().and_then(parse_date);
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return None;
        }
    }

    Some(Sprint {
        id,
        name: name.to_string(),
        start_date,
        end_date,
        state: SprintState::from_raw(raw.state.as_deref().unwrap_or_default()),
        source: source.to_string(),
    })
}

/// Parse a pasted JSON export into raw issue records.
///
/// The blob must either be an object carrying an `issues` array or itself
/// be an array of issue-like records. Records that don't deserialize are
/// skipped; zero usable issues is an error so the caller never commits a
/// silently empty import.
pub fn parse_export(text: &str) -> Result<Vec<RawIssue>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| PlanError::InvalidExport(format!("not valid JSON: {e}")))?;

    let records = match &value {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Object(map) => match map.get("issues") {
            Some(serde_json::Value::Array(items)) => items.as_slice(),
            _ => {
                return Err(PlanError::InvalidExport(
                    "expected an 'issues' array or a top-level array".to_string(),
                ))
            }
        },
        _ => {
            return Err(PlanError::InvalidExport(
                "expected an 'issues' array or a top-level array".to_string(),
            ))
        }
    };

    let issues: Vec<RawIssue> = records
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .filter(|r: &RawIssue| r.id.is_some() && r.key.is_some())
        .collect();

    if issues.is_empty() {
        return Err(PlanError::NoIssuesFound);
    }

    Ok(issues)
}

fn named(field: &Option<crate::responses::RawNamed>) -> &str {
    field
        .as_ref()
        .and_then(|n| n.name.as_deref())
        .unwrap_or_default()
}

/// Read a numeric value that may arrive as a number or a numeric string.
fn number_from(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn seconds_from(value: Option<&serde_json::Value>) -> u64 {
    value
        .and_then(number_from)
        .filter(|s| *s >= 0.0)
        .map(|s| s as u64)
        .unwrap_or(0)
}

/// Pull a sprint id out of whichever shape the tracker sent.
///
/// Depending on version and field configuration the sprint field is an
/// object with an id, an array of those (last entry is the current one),
/// or a legacy `...Sprint@1a2b[id=42,name=...]` toString blob.
fn extract_sprint_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Object(_) => value.get("id").and_then(sprint_id_value),
        serde_json::Value::Array(items) => items
            .last()
            .and_then(|v| v.get("id"))
            .and_then(sprint_id_value),
        serde_json::Value::String(blob) => {
            let re = Regex::new(r"\bid=(\d+)").ok()?;
            re.captures(blob).map(|c| c[1].to_string())
        }
        _ => None,
    }
}

fn sprint_id_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Lenient ISO date parsing: accepts plain dates and full datetimes.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_user(id: Option<&str>, name: &str, account_type: Option<&str>) -> RawUser {
        serde_json::from_value(json!({
            "accountId": id,
            "displayName": name,
            "accountType": account_type,
        }))
        .unwrap()
    }

    #[test]
    fn member_defaults_applied() {
        let member = member_from_raw(&raw_user(Some("u1"), "Alice", Some("atlassian"))).unwrap();
        assert_eq!(member.id, "u1");
        assert_eq!(member.name, "Alice");
        assert_eq!(member.role, DEFAULT_ROLE);
        assert_eq!(member.capacity_per_sprint, DEFAULT_CAPACITY);
        assert!(member.skills.is_empty());
    }

    #[test]
    fn bot_and_app_accounts_filtered() {
        assert!(member_from_raw(&raw_user(Some("b1"), "CI Bot", Some("app"))).is_none());
        assert!(member_from_raw(&raw_user(Some("b2"), "Importer", None)).is_none());
    }

    #[test]
    fn member_without_identity_dropped() {
        assert!(member_from_raw(&raw_user(None, "Ghost", Some("atlassian"))).is_none());
    }

    #[test]
    fn issue_story_points_tolerate_any_shape() {
        let points = |v: serde_json::Value| {
            let raw: RawIssue = serde_json::from_value(json!({
                "id": "1", "key": "PROJ-1", "fields": { "customfield_10016": v }
            }))
            .unwrap();
            issue_from_raw(&raw, "demo").unwrap().story_points
        };

        assert_eq!(points(json!(5)), 5.0);
        assert_eq!(points(json!("3")), 3.0);
        assert_eq!(points(json!("not a number")), 0.0);
        assert_eq!(points(json!(null)), 0.0);
        assert_eq!(points(json!(-2)), 0.0);
    }

    #[test]
    fn issue_without_identity_dropped() {
        let raw: RawIssue =
            serde_json::from_value(json!({ "fields": { "summary": "orphan" } })).unwrap();
        assert!(issue_from_raw(&raw, "demo").is_none());
    }

    #[test]
    fn issue_defaults_on_sparse_record() {
        let raw: RawIssue = serde_json::from_value(json!({ "id": "9", "key": "X-9" })).unwrap();
        let issue = issue_from_raw(&raw, "demo").unwrap();
        assert_eq!(issue.issue_type, IssueType::Story);
        assert_eq!(issue.priority, Priority::Medium);
        assert_eq!(issue.status, Status::ToDo);
        assert_eq!(issue.story_points, 0.0);
        assert_eq!(issue.time_spent_seconds, 0);
        assert!(issue.sprint_id.is_none());
        assert!(issue.assignee_id.is_none());
    }

    #[test]
    fn sprint_id_from_object_array_and_blob() {
        assert_eq!(
            extract_sprint_id(&json!({ "id": 42, "name": "Sprint 1" })),
            Some("42".to_string())
        );
        assert_eq!(
            extract_sprint_id(&json!([{ "id": 41 }, { "id": 42 }])),
            Some("42".to_string())
        );
        assert_eq!(
            extract_sprint_id(&json!(
                "com.atlassian.greenhopper.service.sprint.Sprint@1a2b[id=42,rapidViewId=5,name=Sprint 1]"
            )),
            Some("42".to_string())
        );
        assert_eq!(extract_sprint_id(&json!(true)), None);
    }

    #[test]
    fn sprint_with_inverted_dates_dropped() {
        let raw: RawSprint = serde_json::from_value(json!({
            "id": 1, "name": "Backwards",
            "startDate": "2026-03-01T09:00:00.000Z",
            "endDate": "2026-02-01T09:00:00.000Z",
            "state": "future"
        }))
        .unwrap();
        assert!(sprint_from_raw(&raw, "demo").is_none());
    }

    #[test]
    fn undated_sprint_kept() {
        let raw: RawSprint =
            serde_json::from_value(json!({ "id": 2, "name": "Next", "state": "future" }))
                .unwrap();
        let sprint = sprint_from_raw(&raw, "demo").unwrap();
        assert_eq!(sprint.state, SprintState::Future);
        assert!(sprint.start_date.is_none());
    }

    #[test]
    fn export_object_and_array_accepted() {
        let wrapped = r#"{ "issues": [ { "id": "1", "key": "A-1" } ] }"#;
        let bare = r#"[ { "id": "1", "key": "A-1" }, { "id": "2", "key": "A-2" } ]"#;
        assert_eq!(parse_export(wrapped).unwrap().len(), 1);
        assert_eq!(parse_export(bare).unwrap().len(), 2);
    }

    #[test]
    fn export_skips_malformed_records() {
        let mixed = r#"[ { "id": "1", "key": "A-1" }, { "summary": "no identity" }, 7 ]"#;
        assert_eq!(parse_export(mixed).unwrap().len(), 1);
    }

    #[test]
    fn export_error_taxonomy() {
        assert!(matches!(
            parse_export("not json"),
            Err(PlanError::InvalidExport(_))
        ));
        assert!(matches!(
            parse_export(r#"{ "items": [] }"#),
            Err(PlanError::InvalidExport(_))
        ));
        assert!(matches!(
            parse_export(r#"{ "issues": [] }"#),
            Err(PlanError::NoIssuesFound)
        ));
        assert!(matches!(
            parse_export(r#"[ { "summary": "no identity" } ]"#),
            Err(PlanError::NoIssuesFound)
        ));
    }
}
