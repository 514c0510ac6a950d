use std::collections::HashMap;

use tabled::Tabled;

use crate::cli::ProfitArgs;
use crate::config::Config;
use crate::error::{PlanError, Result};
use crate::metrics::{self, ClientGroup};
use crate::output::{self, format_money, format_pct};
use crate::store::SnapshotStore;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    key: String,
    #[tabled(rename = "Issues")]
    issues: usize,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "Rev/Hour")]
    index: String,
    #[tabled(rename = "Quadrant")]
    quadrant: String,
}

impl From<&ClientGroup> for GroupRow {
    fn from(group: &ClientGroup) -> Self {
        Self {
            key: group.key.clone(),
            issues: group.issue_count,
            hours: format!("{:.1}", group.hours_spent),
            revenue: format_money(group.revenue),
            index: format_money(group.profitability_index),
            quadrant: group.quadrant.colored(),
        }
    }
}

pub fn run(config: &Config, store: &SnapshotStore, args: ProfitArgs) -> Result<()> {
    let snapshot = store.load();

    let mut revenue: HashMap<String, f64> = config.revenue.clone();
    for entry in &args.revenue {
        let (key, amount) = parse_revenue_entry(entry)?;
        revenue.insert(key, amount);
    }

    let groups = metrics::profitability(&snapshot, args.by, &revenue);
    output::print_table(&groups, |group| GroupRow::from(group));

    if !output::is_json_output() && groups.iter().all(|g| g.revenue == 0.0) {
        output::print_message(
            "No revenue data. Add a [revenue] table to the config or pass --revenue KEY=AMOUNT.",
        );
    }
    Ok(())
}

fn parse_revenue_entry(entry: &str) -> Result<(String, f64)> {
    let (key, amount) = entry
        .split_once('=')
        .ok_or_else(|| PlanError::InvalidRevenue(entry.to_string()))?;
    let key = key.trim();
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidRevenue(entry.to_string()))?;
    if key.is_empty() || !amount.is_finite() || amount < 0.0 {
        return Err(PlanError::InvalidRevenue(entry.to_string()));
    }
    Ok((key.to_string(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revenue_entry_parses() {
        assert_eq!(
            parse_revenue_entry("PROJ=50000").unwrap(),
            ("PROJ".to_string(), 50_000.0)
        );
        assert_eq!(
            parse_revenue_entry(" OPS = 1200.5 ").unwrap(),
            ("OPS".to_string(), 1200.5)
        );
    }

    #[test]
    fn malformed_revenue_entry_rejected() {
        assert!(parse_revenue_entry("PROJ").is_err());
        assert!(parse_revenue_entry("PROJ=lots").is_err());
        assert!(parse_revenue_entry("=100").is_err());
        assert!(parse_revenue_entry("PROJ=-5").is_err());
    }
}
