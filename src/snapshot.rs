//! The working set: one mutable owner for team, issues, sprints and the
//! list of connected sources.
//!
//! Mutations (import, removal, capacity edit) validate before touching any
//! field, so a caller either observes the fully applied result or the
//! previous state. An empty `sources` list with populated collections is
//! the bootstrap state: demo data shown before any real source connects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::types::{Issue, IssueType, Priority, Sprint, SprintState, Status, TeamMember};

/// Source tag carried by the bootstrap demo entities. Not listed in
/// `sources`; its presence there would defeat the sentinel check.
pub const BOOTSTRAP_TAG: &str = "demo";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Snapshot {
    pub team: Vec<TeamMember>,
    pub issues: Vec<Issue>,
    pub sprints: Vec<Sprint>,
    pub sources: Vec<String>,
}

/// One normalized import, ready to merge under a new source tag.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub team: Vec<TeamMember>,
    pub issues: Vec<Issue>,
    pub sprints: Vec<Sprint>,
}

impl Snapshot {
    /// True until the first real source is connected.
    pub fn is_bootstrap(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn active_sprint(&self) -> Option<&Sprint> {
        self.sprints.iter().find(|s| s.state == SprintState::Active)
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.team.iter().find(|m| m.id == id)
    }

    /// Integrate a normalized batch under a new source tag.
    ///
    /// Issues and sprints are additive across sources and get stamped with
    /// the tag; within the batch, issues sharing an id collapse to the
    /// last record. Team members merge by id, last write wins. The first
    /// real import replaces the bootstrap data instead of appending to it.
    pub fn merge_source(&mut self, tag: &str, batch: SourceBatch) -> Result<()> {
        if self.sources.iter().any(|s| s == tag) {
            return Err(PlanError::DuplicateSource(tag.to_string()));
        }

        if self.is_bootstrap() {
            self.team.clear();
            self.issues.clear();
            self.sprints.clear();
        }

        let mut incoming: Vec<Issue> = Vec::with_capacity(batch.issues.len());
        for mut issue in batch.issues {
            issue.source = tag.to_string();
            if let Some(pos) = incoming.iter().position(|i| i.id == issue.id) {
                incoming[pos] = issue;
            } else {
                incoming.push(issue);
            }
        }
        self.issues.extend(incoming);

        for mut sprint in batch.sprints {
            sprint.source = tag.to_string();
            self.sprints.push(sprint);
        }

        for member in batch.team {
            if let Some(pos) = self.team.iter().position(|m| m.id == member.id) {
                self.team[pos] = member;
            } else {
                self.team.push(member);
            }
        }

        self.sources.push(tag.to_string());
        Ok(())
    }

    /// Remove everything a source contributed.
    ///
    /// Issues and sprints carrying the tag are filtered out; team members
    /// are left in place even when no remaining source references them.
    /// Removing the last source resets the snapshot to bootstrap data.
    pub fn remove_source(&mut self, tag: &str) -> Result<()> {
        let pos = self
            .sources
            .iter()
            .position(|s| s == tag)
            .ok_or_else(|| PlanError::SourceNotFound(tag.to_string()))?;

        self.sources.remove(pos);
        if self.sources.is_empty() {
            *self = Snapshot::bootstrap();
            return Ok(());
        }

        self.issues.retain(|i| i.source != tag);
        self.sprints.retain(|s| s.source != tag);
        Ok(())
    }

    /// Targeted capacity edit; does not touch issues or sprints.
    pub fn set_capacity(&mut self, member_id: &str, capacity: f64) -> Result<()> {
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(PlanError::InvalidCapacity(capacity));
        }
        let member = self
            .team
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| PlanError::MemberNotFound(member_id.to_string()))?;
        member.capacity_per_sprint = capacity;
        Ok(())
    }

    /// Demo working set shown before any source is connected.
    pub fn bootstrap() -> Self {
        let team = vec![
            member("u-maya", "Maya Chen", "Frontend Developer", 20.0, &["React", "TypeScript"]),
            member("u-jonas", "Jonas Weber", "Backend Developer", 18.0, &["Rust", "Postgres"]),
            member("u-priya", "Priya Sharma", "QA Engineer", 15.0, &["Cypress", "Automation"]),
            member("u-tomas", "Tomás Rivera", "Tech Lead", 25.0, &["Architecture", "Rust"]),
        ];

        let sprints = vec![
            Sprint {
                id: "sprint-12".to_string(),
                name: "Sprint 12".to_string(),
                start_date: date(2026, 7, 27),
                end_date: date(2026, 8, 9),
                state: SprintState::Active,
                source: BOOTSTRAP_TAG.to_string(),
            },
            Sprint {
                id: "sprint-13".to_string(),
                name: "Sprint 13".to_string(),
                start_date: date(2026, 8, 10),
                end_date: date(2026, 8, 23),
                state: SprintState::Future,
                source: BOOTSTRAP_TAG.to_string(),
            },
        ];

        let issues = vec![
            demo_issue("DEMO-101", "Checkout form validation", IssueType::Story)
                .points(8.0)
                .status(Status::InProgress)
                .assignee("u-maya")
                .sprint("sprint-12")
                .time(14_400, 28_800)
                .parent("DEMO-90", "Checkout Revamp")
                .build(),
            demo_issue("DEMO-102", "Payment webhook drops retries", IssueType::Bug)
                .points(5.0)
                .status(Status::ToDo)
                .assignee("u-jonas")
                .sprint("sprint-12")
                .time(0, 10_800)
                .parent("DEMO-90", "Checkout Revamp")
                .build(),
            demo_issue("DEMO-103", "Regression pass on order flow", IssueType::Task)
                .points(3.0)
                .status(Status::Done)
                .assignee("u-priya")
                .sprint("sprint-12")
                .time(21_600, 14_400)
                .parent("DEMO-90", "Checkout Revamp")
                .build(),
            demo_issue("DEMO-104", "Margin report aggregation", IssueType::Story)
                .points(13.0)
                .status(Status::InReview)
                .assignee("u-tomas")
                .sprint("sprint-12")
                .time(36_000, 43_200)
                .parent("DEMO-91", "Reporting")
                .build(),
            demo_issue("DEMO-105", "Self-serve data export", IssueType::Story)
                .points(13.0)
                .status(Status::ToDo)
                .sprint("sprint-13")
                .parent("DEMO-91", "Reporting")
                .build(),
            demo_issue("DEMO-106", "Nightly build flakiness", IssueType::Task)
                .points(8.0)
                .status(Status::Done)
                .assignee("u-maya")
                .sprint("sprint-12")
                .time(7_200, 10_800)
                .build(),
        ];

        Snapshot {
            team,
            issues,
            sprints,
            sources: Vec::new(),
        }
    }
}

fn member(id: &str, name: &str, role: &str, capacity: f64, skills: &[&str]) -> TeamMember {
    TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        avatar: None,
        capacity_per_sprint: capacity,
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

struct DemoIssue(Issue);

fn demo_issue(key: &str, summary: &str, issue_type: IssueType) -> DemoIssue {
    DemoIssue(Issue {
        id: format!("id-{}", key.to_lowercase()),
        key: key.to_string(),
        summary: summary.to_string(),
        issue_type,
        priority: Priority::Medium,
        status: Status::ToDo,
        assignee_id: None,
        story_points: 0.0,
        sprint_id: None,
        source: BOOTSTRAP_TAG.to_string(),
        time_spent_seconds: 0,
        time_estimate_seconds: 0,
        parent_key: None,
        parent_summary: None,
    })
}

impl DemoIssue {
    fn points(mut self, points: f64) -> Self {
        self.0.story_points = points;
        self
    }
    fn status(mut self, status: Status) -> Self {
        self.0.status = status;
        self
    }
    fn assignee(mut self, id: &str) -> Self {
        self.0.assignee_id = Some(id.to_string());
        self
    }
    fn sprint(mut self, id: &str) -> Self {
        self.0.sprint_id = Some(id.to_string());
        self
    }
    fn time(mut self, spent: u64, estimate: u64) -> Self {
        self.0.time_spent_seconds = spent;
        self.0.time_estimate_seconds = estimate;
        self
    }
    fn parent(mut self, key: &str, summary: &str) -> Self {
        self.0.parent_key = Some(key.to_string());
        self.0.parent_summary = Some(summary.to_string());
        self
    }
    fn build(self) -> Issue {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_issue(id: &str, key: &str) -> Issue {
        Issue {
            id: id.to_string(),
            key: key.to_string(),
            summary: format!("Issue {key}"),
            issue_type: IssueType::Story,
            priority: Priority::Medium,
            status: Status::ToDo,
            assignee_id: None,
            story_points: 1.0,
            sprint_id: None,
            source: String::new(),
            time_spent_seconds: 0,
            time_estimate_seconds: 0,
            parent_key: None,
            parent_summary: None,
        }
    }

    fn make_member(id: &str, name: &str) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            name: name.to_string(),
            role: "Developer".to_string(),
            avatar: None,
            capacity_per_sprint: 10.0,
            skills: Vec::new(),
        }
    }

    fn batch(issues: Vec<Issue>, team: Vec<TeamMember>) -> SourceBatch {
        SourceBatch {
            team,
            issues,
            sprints: Vec::new(),
        }
    }

    #[test]
    fn bootstrap_matches_documented_defaults() {
        let snap = Snapshot::bootstrap();
        assert!(snap.is_bootstrap());
        let capacities: Vec<f64> = snap.team.iter().map(|m| m.capacity_per_sprint).collect();
        assert_eq!(capacities, vec![20.0, 18.0, 15.0, 25.0]);
        let points: Vec<f64> = snap.issues.iter().map(|i| i.story_points).collect();
        assert_eq!(points, vec![8.0, 5.0, 3.0, 13.0, 13.0, 8.0]);
        assert_eq!(snap.sprints.len(), 2);
        assert!(snap.active_sprint().is_some());
    }

    #[test]
    fn first_import_replaces_bootstrap() {
        let mut snap = Snapshot::bootstrap();
        snap.merge_source("alpha", batch(vec![make_issue("1", "AL-1")], Vec::new()))
            .unwrap();

        assert_eq!(snap.issues.len(), 1);
        assert!(snap.team.is_empty());
        assert!(snap.sprints.is_empty());
        assert_eq!(snap.sources, vec!["alpha"]);
        assert_eq!(snap.issues[0].source, "alpha");
    }

    #[test]
    fn merge_is_additive_across_sources() {
        let mut snap = Snapshot::bootstrap();
        snap.merge_source(
            "alpha",
            batch(vec![make_issue("1", "AL-1"), make_issue("2", "AL-2")], Vec::new()),
        )
        .unwrap();
        // Same key as an alpha issue: cross-source records never dedupe.
        snap.merge_source("beta", batch(vec![make_issue("1", "AL-1")], Vec::new()))
            .unwrap();

        assert_eq!(snap.issues.len(), 3);
        assert_eq!(snap.sources, vec!["alpha", "beta"]);
    }

    #[test]
    fn duplicate_tag_rejected_without_mutation() {
        let mut snap = Snapshot::bootstrap();
        snap.merge_source("alpha", batch(vec![make_issue("1", "AL-1")], Vec::new()))
            .unwrap();

        let err = snap
            .merge_source("alpha", batch(vec![make_issue("2", "AL-2")], Vec::new()))
            .unwrap_err();
        assert!(matches!(err, PlanError::DuplicateSource(_)));
        assert_eq!(snap.issues.len(), 1);
        assert_eq!(snap.sources, vec!["alpha"]);
    }

    #[test]
    fn issues_sharing_an_id_within_a_batch_collapse_to_last() {
        let mut snap = Snapshot::bootstrap();
        let mut updated = make_issue("1", "AL-1");
        updated.summary = "updated".to_string();
        snap.merge_source("alpha", batch(vec![make_issue("1", "AL-1"), updated], Vec::new()))
            .unwrap();

        assert_eq!(snap.issues.len(), 1);
        assert_eq!(snap.issues[0].summary, "updated");
    }

    #[test]
    fn team_merge_is_last_write_wins_by_id() {
        let mut snap = Snapshot::bootstrap();
        snap.merge_source("alpha", batch(Vec::new(), vec![make_member("u1", "Alice")]))
            .unwrap();
        snap.merge_source("beta", batch(Vec::new(), vec![make_member("u1", "Alicia")]))
            .unwrap();

        let matching: Vec<&TeamMember> = snap.team.iter().filter(|m| m.id == "u1").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "Alicia");
    }

    #[test]
    fn reimport_overwrites_capacity_edit() {
        // Last-write-wins applies to capacity too; a re-import of the same
        // member id discards a manual edit.
        let mut snap = Snapshot::bootstrap();
        snap.merge_source("alpha", batch(Vec::new(), vec![make_member("u1", "Alice")]))
            .unwrap();
        snap.set_capacity("u1", 30.0).unwrap();
        snap.merge_source("beta", batch(Vec::new(), vec![make_member("u1", "Alice")]))
            .unwrap();

        assert_eq!(snap.member("u1").unwrap().capacity_per_sprint, 10.0);
    }

    #[test]
    fn removing_last_source_resets_to_bootstrap() {
        let mut snap = Snapshot::bootstrap();
        snap.merge_source("alpha", batch(vec![make_issue("1", "AL-1")], Vec::new()))
            .unwrap();
        snap.remove_source("alpha").unwrap();

        let defaults = Snapshot::bootstrap();
        assert!(snap.is_bootstrap());
        assert_eq!(snap.issues.len(), defaults.issues.len());
        assert_eq!(snap.team.len(), defaults.team.len());
        assert_eq!(snap.sprints.len(), defaults.sprints.len());
    }

    #[test]
    fn removal_filters_by_tag_only() {
        let mut snap = Snapshot::bootstrap();
        snap.merge_source("alpha", batch(vec![make_issue("1", "AL-1")], Vec::new()))
            .unwrap();
        snap.merge_source("beta", batch(vec![make_issue("2", "BE-1")], Vec::new()))
            .unwrap();
        snap.remove_source("alpha").unwrap();

        assert_eq!(snap.issues.len(), 1);
        assert_eq!(snap.issues[0].source, "beta");
        assert_eq!(snap.sources, vec!["beta"]);
    }

    #[test]
    fn remove_source_keeps_team_members() {
        // Known characteristic: members contributed by a removed source
        // stay in the team list, even with zero assigned work left.
        let mut snap = Snapshot::bootstrap();
        snap.merge_source("alpha", batch(Vec::new(), vec![make_member("u1", "Alice")]))
            .unwrap();
        snap.merge_source(
            "beta",
            batch(vec![make_issue("2", "BE-1")], vec![make_member("u2", "Bob")]),
        )
        .unwrap();
        snap.remove_source("alpha").unwrap();

        assert!(snap.member("u1").is_some());
        assert!(snap.member("u2").is_some());
    }

    #[test]
    fn remove_unknown_source_rejected() {
        let mut snap = Snapshot::bootstrap();
        assert!(matches!(
            snap.remove_source("nope"),
            Err(PlanError::SourceNotFound(_))
        ));
    }

    #[test]
    fn capacity_edit_replaces_by_id() {
        let mut snap = Snapshot::bootstrap();
        snap.set_capacity("u-maya", 22.5).unwrap();
        assert_eq!(snap.member("u-maya").unwrap().capacity_per_sprint, 22.5);

        assert!(matches!(
            snap.set_capacity("u-ghost", 10.0),
            Err(PlanError::MemberNotFound(_))
        ));
        assert!(matches!(
            snap.set_capacity("u-maya", 0.0),
            Err(PlanError::InvalidCapacity(_))
        ));
        assert!(matches!(
            snap.set_capacity("u-maya", -3.0),
            Err(PlanError::InvalidCapacity(_))
        ));
    }
}
