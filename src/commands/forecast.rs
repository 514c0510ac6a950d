use colored::Colorize;
use tabled::Tabled;

use crate::metrics::{self, SprintForecast};
use crate::output::{self, format_date, format_points};
use crate::store::SnapshotStore;

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Sprint")]
    name: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&SprintForecast> for ForecastRow {
    fn from(forecast: &SprintForecast) -> Self {
        Self {
            name: forecast.name.clone(),
            starts: format_date(forecast.start_date),
            state: forecast.state.colored(),
            workload: format_points(forecast.workload),
            capacity: format_points(forecast.capacity),
            status: if forecast.is_breach {
                "over capacity".red().bold().to_string()
            } else {
                "ok".green().to_string()
            },
        }
    }
}

pub fn run(store: &SnapshotStore) {
    let snapshot = store.load();
    let forecast = metrics::capacity_forecast(&snapshot);

    output::print_table(&forecast, |row| ForecastRow::from(row));
}
