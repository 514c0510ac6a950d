use colored::Colorize;
use tabled::Tabled;

use crate::analysis::{AnalysisClient, SuggestedAllocation};
use crate::config::Config;
use crate::error::Result;
use crate::output;
use crate::store::SnapshotStore;

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Issue")]
    issue: String,
    #[tabled(rename = "Suggested Assignee")]
    assignee: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&SuggestedAllocation> for AllocationRow {
    fn from(allocation: &SuggestedAllocation) -> Self {
        Self {
            issue: allocation.issue_key.clone(),
            assignee: allocation.suggested_assignee_id.clone(),
            reason: allocation.reason.clone(),
        }
    }
}

pub async fn run(config: &Config, store: &SnapshotStore) -> Result<()> {
    let snapshot = store.load();
    let client = AnalysisClient::from_config(config)?;

    output::print_message("Analyzing snapshot...");
    let report = client.analyze(&snapshot).await?;

    // The report is passed through untouched.
    output::print_item(&report, |report| {
        println!("{}", report.summary);

        if !report.risks.is_empty() {
            println!("\n{}", "Risks".red().bold());
            for risk in &report.risks {
                println!("  - {risk}");
            }
        }

        if !report.recommendations.is_empty() {
            println!("\n{}", "Recommendations".green().bold());
            for recommendation in &report.recommendations {
                println!("  - {recommendation}");
            }
        }

        if let Some(allocations) = &report.suggested_allocations {
            if !allocations.is_empty() {
                println!();
                let rows: Vec<AllocationRow> =
                    allocations.iter().map(AllocationRow::from).collect();
                let table = tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string();
                println!("{table}");
            }
        }
    });

    Ok(())
}
