use std::io::Read;

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConnectArgs, PasteArgs};
use crate::client::TrackerClient;
use crate::config::Config;
use crate::error::{PlanError, Result};
use crate::normalize;
use crate::output;
use crate::snapshot::SourceBatch;
use crate::store::SnapshotStore;

#[derive(Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct SourceRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Issues")]
    issues: usize,
    #[tabled(rename = "Sprints")]
    sprints: usize,
}

pub fn list(store: &SnapshotStore) {
    let snapshot = store.load();

    if snapshot.is_bootstrap() {
        output::print_message("No sources connected; showing demo data. Run 'caplan source connect' to import a project.");
    }

    let rows: Vec<SourceRow> = snapshot
        .sources
        .iter()
        .map(|tag| SourceRow {
            source: tag.clone(),
            issues: snapshot.issues.iter().filter(|i| &i.source == tag).count(),
            sprints: snapshot.sprints.iter().filter(|s| &s.source == tag).count(),
        })
        .collect();

    output::print_table(&rows, |row| SourceRow {
        source: row.source.clone(),
        issues: row.issues,
        sprints: row.sprints,
    });
}

/// Import a project from the live tracker.
pub async fn connect(config: &Config, store: &SnapshotStore, args: ConnectArgs) -> Result<()> {
    let project = config.resolve_project(args.project.as_deref())?;
    let tag = args.tag.unwrap_or_else(|| project.clone());

    let mut snapshot = store.load();
    // Fail before any network round trip when the tag is taken.
    if snapshot.sources.iter().any(|s| s == &tag) {
        return Err(PlanError::DuplicateSource(tag));
    }

    let client = TrackerClient::new(config.site_url()?, &config.email()?, &config.api_token()?);
    client.validate_credentials().await?;

    let raw_team = client.fetch_team(&project).await?;
    let raw_issues = client
        .fetch_issues(&format!("project = \"{project}\" ORDER BY created ASC"))
        .await?;
    // Sprints need a board; without one configured the import proceeds
    // without sprint data.
    let raw_sprints = match config.resolve_board(args.board) {
        Ok(board) => client.fetch_sprints(board).await?,
        Err(PlanError::NoBoard) => Vec::new(),
        Err(e) => return Err(e),
    };

    let batch = SourceBatch {
        team: raw_team.iter().filter_map(normalize::member_from_raw).collect(),
        issues: raw_issues
            .iter()
            .filter_map(|raw| normalize::issue_from_raw(raw, &tag))
            .collect(),
        sprints: raw_sprints
            .iter()
            .filter_map(|raw| normalize::sprint_from_raw(raw, &tag))
            .collect(),
    };

    if batch.issues.is_empty() {
        return Err(PlanError::NoIssuesFound);
    }

    let summary = format!(
        "Connected source '{tag}': {} issues, {} sprints, {} team members",
        batch.issues.len(),
        batch.sprints.len(),
        batch.team.len()
    );

    snapshot.merge_source(&tag, batch)?;
    store.save(&snapshot);

    output::print_message(&summary);
    Ok(())
}

/// Import a pasted JSON export.
pub fn paste(store: &SnapshotStore, args: PasteArgs) -> Result<()> {
    let mut snapshot = store.load();
    if snapshot.sources.iter().any(|s| s == &args.tag) {
        return Err(PlanError::DuplicateSource(args.tag));
    }

    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let raw_issues = normalize::parse_export(&text)?;
    let issues: Vec<_> = raw_issues
        .iter()
        .filter_map(|raw| normalize::issue_from_raw(raw, &args.tag))
        .collect();
    if issues.is_empty() {
        return Err(PlanError::NoIssuesFound);
    }

    let summary = format!("Imported source '{}': {} issues", args.tag, issues.len());

    snapshot.merge_source(
        &args.tag,
        SourceBatch {
            team: Vec::new(),
            issues,
            sprints: Vec::new(),
        },
    )?;
    store.save(&snapshot);

    output::print_message(&summary);
    Ok(())
}

pub fn remove(store: &SnapshotStore, tag: &str) -> Result<()> {
    let mut snapshot = store.load();
    snapshot.remove_source(tag)?;
    store.save(&snapshot);

    if snapshot.is_bootstrap() {
        output::print_message(&format!(
            "Removed source '{tag}'. No sources left; reset to demo data."
        ));
    } else {
        output::print_message(&format!("Removed source '{tag}'"));
    }
    Ok(())
}
