use colored::Colorize;
use serde::Serialize;

use crate::metrics::{self, MemberLoad};
use crate::output::{self, format_pct, format_points};
use crate::store::SnapshotStore;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardReport {
    sources: Vec<String>,
    active_sprint: Option<String>,
    sprint_health: f64,
    members: Vec<MemberLoad>,
}

pub fn run(store: &SnapshotStore) {
    let snapshot = store.load();

    let report = DashboardReport {
        sources: snapshot.sources.clone(),
        active_sprint: snapshot.active_sprint().map(|s| s.name.clone()),
        sprint_health: metrics::sprint_health(&snapshot),
        members: metrics::member_loads(&snapshot),
    };

    output::print_item(&report, |report| {
        if report.sources.is_empty() {
            println!("{}", "Demo data (no sources connected)".bright_black());
        } else {
            println!("Sources: {}", report.sources.join(", "));
        }

        match &report.active_sprint {
            Some(name) => println!(
                "Active sprint: {name}  |  committed {} of capacity",
                format_pct(report.sprint_health)
            ),
            None => println!("No active sprint"),
        }
        println!();

        for load in &report.members {
            let bar = utilization_bar(load.utilization);
            let pct = format_pct(load.raw_utilization);
            let pct = if load.at_risk {
                format!("{} {}", pct.red().bold(), "at risk".red())
            } else {
                pct
            };
            println!(
                "{:<20} {bar} {pct}  ({} pts / {} cap, {} realized)",
                load.name,
                format_points(load.active_points),
                format_points(load.capacity_per_sprint),
                format_pct(load.realization),
            );
        }
    });
}

/// Fixed-width bar over the clamped utilization.
fn utilization_bar(utilization: f64) -> String {
    const WIDTH: usize = 24;
    let filled = ((utilization / metrics::UTILIZATION_CAP) * WIDTH as f64).round() as usize;
    let filled = filled.min(WIDTH);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(WIDTH - filled));
    if utilization > metrics::RISK_THRESHOLD {
        bar.red().to_string()
    } else {
        bar.green().to_string()
    }
}
