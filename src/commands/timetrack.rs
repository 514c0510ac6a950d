use serde::Serialize;
use tabled::Tabled;

use crate::metrics::{self, BudgetDistribution, OverBudgetIssue, TimeAccuracy};
use crate::output::{self, format_hours, format_pct};
use crate::store::SnapshotStore;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimetrackReport {
    accuracy: TimeAccuracy,
    distribution: BudgetDistribution,
}

#[derive(Tabled)]
struct OverBudgetRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Estimate")]
    estimate: String,
    #[tabled(rename = "Overage")]
    overage: String,
}

impl From<&OverBudgetIssue> for OverBudgetRow {
    fn from(issue: &OverBudgetIssue) -> Self {
        Self {
            key: issue.key.clone(),
            summary: issue.summary.clone(),
            spent: format_hours(issue.spent_seconds),
            estimate: format_hours(issue.estimate_seconds),
            overage: format!("+{}", format_hours(issue.overage_seconds)),
        }
    }
}

pub fn run(store: &SnapshotStore) {
    let snapshot = store.load();

    let report = TimetrackReport {
        accuracy: metrics::time_accuracy(&snapshot),
        distribution: metrics::budget_distribution(&snapshot),
    };

    output::print_item(&report, |report| {
        let accuracy = &report.accuracy;
        if accuracy.tracked_issues == 0 {
            println!("No issues with time tracking data.");
            return;
        }

        println!(
            "Tracking accuracy: {} ({} spent vs {} estimated over {} issues)",
            format_pct(accuracy.accuracy),
            format_hours(accuracy.total_spent_seconds),
            format_hours(accuracy.total_estimate_seconds),
            accuracy.tracked_issues,
        );
        let dist = &report.distribution;
        println!(
            "Budget split: {} over, {} under, {} on track",
            dist.over, dist.under, dist.on_track
        );

        if !accuracy.over_budget.is_empty() {
            println!();
            let rows: Vec<OverBudgetRow> =
                accuracy.over_budget.iter().map(OverBudgetRow::from).collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{table}");
        }
    });
}
