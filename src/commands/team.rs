use colored::Colorize;
use tabled::Tabled;

use crate::error::Result;
use crate::metrics::{self, MemberLoad};
use crate::output::{self, format_pct, format_points};
use crate::store::SnapshotStore;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Active Pts")]
    active_points: String,
    #[tabled(rename = "Utilization")]
    utilization: String,
    #[tabled(rename = "Realization")]
    realization: String,
}

impl From<&MemberLoad> for MemberRow {
    fn from(load: &MemberLoad) -> Self {
        let utilization = format_pct(load.raw_utilization);
        Self {
            id: load.member_id.clone(),
            name: load.name.clone(),
            role: load.role.clone(),
            capacity: format_points(load.capacity_per_sprint),
            active_points: format_points(load.active_points),
            utilization: if load.at_risk {
                format!("{} {}", utilization.red().bold(), "at risk".red())
            } else {
                utilization
            },
            realization: format_pct(load.realization),
        }
    }
}

pub fn list(store: &SnapshotStore) {
    let snapshot = store.load();
    let loads = metrics::member_loads(&snapshot);

    output::print_table(&loads, |load| MemberRow::from(load));
}

pub fn set_capacity(store: &SnapshotStore, id: &str, capacity: f64) -> Result<()> {
    let mut snapshot = store.load();
    snapshot.set_capacity(id, capacity)?;
    store.save(&snapshot);

    let member = snapshot.member(id).map(|m| m.name.clone()).unwrap_or_default();
    output::print_message(&format!(
        "Set capacity for {member} to {} points per sprint",
        format_points(capacity)
    ));
    Ok(())
}
