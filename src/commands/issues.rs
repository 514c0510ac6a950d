use tabled::Tabled;

use crate::cli::IssueListArgs;
use crate::output::{self, format_points};
use crate::snapshot::Snapshot;
use crate::store::SnapshotStore;
use crate::types::Issue;

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Type")]
    issue_type: String,
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Points")]
    points: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Source")]
    source: String,
}

fn to_row(snapshot: &Snapshot, issue: &Issue) -> IssueRow {
    let assignee = issue
        .assignee_id
        .as_deref()
        .map(|id| match snapshot.member(id) {
            Some(member) => member.name.clone(),
            None => id.to_string(),
        })
        .unwrap_or_else(|| "-".to_string());

    IssueRow {
        key: issue.key.clone(),
        issue_type: issue.issue_type.colored(),
        summary: truncate(&issue.summary, 40),
        status: issue.status.colored(),
        priority: issue.priority.colored(),
        points: format_points(issue.story_points),
        assignee,
        source: issue.source.clone(),
    }
}

pub fn list(store: &SnapshotStore, args: IssueListArgs) {
    let snapshot = store.load();

    let issues: Vec<Issue> = snapshot
        .issues
        .iter()
        .filter(|i| match &args.source {
            Some(source) => &i.source == source,
            None => true,
        })
        .filter(|i| match &args.assignee {
            Some(assignee) => i.assignee_id.as_deref() == Some(assignee.as_str()),
            None => true,
        })
        .filter(|i| match &args.status {
            Some(status) => i
                .status
                .label()
                .to_lowercase()
                .contains(&status.to_lowercase()),
            None => true,
        })
        .cloned()
        .collect();

    output::print_table(&issues, |issue| to_row(&snapshot, issue));
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
