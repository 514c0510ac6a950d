//! Derived metrics over a snapshot.
//!
//! Everything here is a pure function of `&Snapshot` (plus caller-supplied
//! revenue for profitability): identical input yields identical output, and
//! empty inputs yield zeroed results rather than division errors.

use std::collections::HashMap;

use chrono::NaiveDate;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use crate::snapshot::Snapshot;
use crate::types::{Issue, SprintState, Status, TeamMember};

/// Raw utilization above this is flagged as burnout risk (exclusive).
pub const RISK_THRESHOLD: f64 = 85.0;
/// Display utilization is clamped here for chart scaling; risk uses the
/// raw value.
pub const UTILIZATION_CAP: f64 = 120.0;
/// Spent/estimate ratio above this is over budget.
pub const OVER_BUDGET_RATIO: f64 = 1.1;
/// Spent/estimate ratio below this on a finished issue is under budget.
pub const UNDER_BUDGET_RATIO: f64 = 0.9;

pub fn total_capacity(team: &[TeamMember]) -> f64 {
    team.iter().map(|m| m.capacity_per_sprint).sum()
}

/// Committed points in the active sprint as a percentage of total team
/// capacity. 0 when there is no active sprint or no capacity.
pub fn sprint_health(snapshot: &Snapshot) -> f64 {
    let capacity = total_capacity(&snapshot.team);
    let Some(active) = snapshot.active_sprint() else {
        return 0.0;
    };
    if capacity <= 0.0 {
        return 0.0;
    }
    let points: f64 = snapshot
        .issues
        .iter()
        .filter(|i| i.sprint_id.as_deref() == Some(active.id.as_str()))
        .map(|i| i.story_points)
        .sum();
    points * 100.0 / capacity
}

/// Per-member workload picture.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MemberLoad {
    pub member_id: String,
    pub name: String,
    pub role: String,
    pub capacity_per_sprint: f64,
    /// Assigned, unfinished story points across the working set.
    pub active_points: f64,
    /// Unclamped utilization percentage; drives the risk flag.
    pub raw_utilization: f64,
    /// Display utilization, clamped for chart scaling.
    pub utilization: f64,
    pub at_risk: bool,
    /// Finished points, restricted to the active sprint when one exists.
    pub completed_points: f64,
    /// Completed share of the member's total known scope, as a percentage.
    pub realization: f64,
}

pub fn member_loads(snapshot: &Snapshot) -> Vec<MemberLoad> {
    let active_sprint_id = snapshot.active_sprint().map(|s| s.id.clone());

    snapshot
        .team
        .iter()
        .map(|member| {
            let assigned = |issue: &&Issue| issue.assignee_id.as_deref() == Some(member.id.as_str());

            let active_points: f64 = snapshot
                .issues
                .iter()
                .filter(assigned)
                .filter(|i| i.status != Status::Done)
                .map(|i| i.story_points)
                .sum();

            let completed_points: f64 = snapshot
                .issues
                .iter()
                .filter(assigned)
                .filter(|i| i.status == Status::Done)
                .filter(|i| match &active_sprint_id {
                    Some(id) => i.sprint_id.as_deref() == Some(id.as_str()),
                    None => true,
                })
                .map(|i| i.story_points)
                .sum();

            let raw_utilization = if member.capacity_per_sprint > 0.0 {
                active_points * 100.0 / member.capacity_per_sprint
            } else {
                0.0
            };

            let scope = active_points + completed_points;
            let realization = if scope > 0.0 {
                completed_points * 100.0 / scope
            } else {
                0.0
            };

            MemberLoad {
                member_id: member.id.clone(),
                name: member.name.clone(),
                role: member.role.clone(),
                capacity_per_sprint: member.capacity_per_sprint,
                active_points,
                raw_utilization,
                utilization: raw_utilization.min(UTILIZATION_CAP),
                at_risk: raw_utilization > RISK_THRESHOLD,
                completed_points,
                realization,
            }
        })
        .collect()
}

/// Planned workload vs team capacity for one sprint.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SprintForecast {
    pub sprint_id: String,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub state: SprintState,
    pub workload: f64,
    pub capacity: f64,
    pub is_breach: bool,
}

/// Every sprint ordered by start date ascending (undated sprints last),
/// with its planned workload against the current total capacity.
pub fn capacity_forecast(snapshot: &Snapshot) -> Vec<SprintForecast> {
    let capacity = total_capacity(&snapshot.team);

    let mut rows: Vec<SprintForecast> = snapshot
        .sprints
        .iter()
        .map(|sprint| {
            let workload: f64 = snapshot
                .issues
                .iter()
                .filter(|i| i.sprint_id.as_deref() == Some(sprint.id.as_str()))
                .map(|i| i.story_points)
                .sum();
            SprintForecast {
                sprint_id: sprint.id.clone(),
                name: sprint.name.clone(),
                start_date: sprint.start_date,
                state: sprint.state,
                workload,
                capacity,
                is_breach: workload > capacity,
            }
        })
        .collect();

    rows.sort_by(|a, b| match (a.start_date, b.start_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    rows
}

/// An issue that has burned past its estimate.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OverBudgetIssue {
    pub key: String,
    pub summary: String,
    pub spent_seconds: u64,
    pub estimate_seconds: u64,
    pub overage_seconds: u64,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimeAccuracy {
    /// Issues with any time tracked or estimated.
    pub tracked_issues: usize,
    pub total_spent_seconds: u64,
    pub total_estimate_seconds: u64,
    /// Total spent as a percentage of total estimate; 0 with no estimates.
    pub accuracy: f64,
    /// Ranked by descending overage.
    pub over_budget: Vec<OverBudgetIssue>,
}

pub fn time_accuracy(snapshot: &Snapshot) -> TimeAccuracy {
    let tracked: Vec<&Issue> = snapshot
        .issues
        .iter()
        .filter(|i| i.time_spent_seconds > 0 || i.time_estimate_seconds > 0)
        .collect();

    let total_spent: u64 = tracked.iter().map(|i| i.time_spent_seconds).sum();
    let total_estimate: u64 = tracked.iter().map(|i| i.time_estimate_seconds).sum();

    let accuracy = if total_estimate > 0 {
        total_spent as f64 * 100.0 / total_estimate as f64
    } else {
        0.0
    };

    let mut over_budget: Vec<OverBudgetIssue> = tracked
        .iter()
        .filter(|i| i.time_estimate_seconds > 0 && i.time_spent_seconds > i.time_estimate_seconds)
        .map(|i| OverBudgetIssue {
            key: i.key.clone(),
            summary: i.summary.clone(),
            spent_seconds: i.time_spent_seconds,
            estimate_seconds: i.time_estimate_seconds,
            overage_seconds: i.time_spent_seconds - i.time_estimate_seconds,
        })
        .collect();
    over_budget.sort_by(|a, b| b.overage_seconds.cmp(&a.overage_seconds));

    TimeAccuracy {
        tracked_issues: tracked.len(),
        total_spent_seconds: total_spent,
        total_estimate_seconds: total_estimate,
        accuracy,
        over_budget,
    }
}

/// Three-way time-budget classification for estimated issues.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetClass {
    Over,
    Under,
    OnTrack,
}

impl BudgetClass {
    pub fn label(self) -> &'static str {
        match self {
            BudgetClass::Over => "Over Budget",
            BudgetClass::Under => "Under Budget",
            BudgetClass::OnTrack => "On Track",
        }
    }

    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            BudgetClass::Over => label.red().to_string(),
            BudgetClass::Under => label.green().to_string(),
            BudgetClass::OnTrack => label.blue().to_string(),
        }
    }
}

/// None for issues without an estimate. The over rule wins over the
/// done-based under rule, and an unfinished issue under 90% of its
/// estimate is on track, not under: its remaining time is simply unspent.
pub fn budget_class(issue: &Issue) -> Option<BudgetClass> {
    if issue.time_estimate_seconds == 0 {
        return None;
    }
    let ratio = issue.time_spent_seconds as f64 / issue.time_estimate_seconds as f64;
    if ratio > OVER_BUDGET_RATIO {
        Some(BudgetClass::Over)
    } else if ratio < UNDER_BUDGET_RATIO && issue.status == Status::Done {
        Some(BudgetClass::Under)
    } else {
        Some(BudgetClass::OnTrack)
    }
}

#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDistribution {
    pub over: usize,
    pub under: usize,
    pub on_track: usize,
}

pub fn budget_distribution(snapshot: &Snapshot) -> BudgetDistribution {
    let mut dist = BudgetDistribution::default();
    for issue in &snapshot.issues {
        match budget_class(issue) {
            Some(BudgetClass::Over) => dist.over += 1,
            Some(BudgetClass::Under) => dist.under += 1,
            Some(BudgetClass::OnTrack) => dist.on_track += 1,
            None => {}
        }
    }
    dist
}

/// How issues are grouped for profitability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GroupBy {
    /// Project key prefix of the issue key, source tag as fallback.
    #[default]
    Project,
    /// Parent epic summary, parent key as fallback.
    Epic,
}

/// Dataset-relative profitability classification.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    CashCow,
    StrategicPartner,
    Standard,
    Drain,
}

impl Quadrant {
    pub fn label(self) -> &'static str {
        match self {
            Quadrant::CashCow => "Cash Cow",
            Quadrant::StrategicPartner => "Strategic Partner",
            Quadrant::Standard => "Standard",
            Quadrant::Drain => "Drain",
        }
    }

    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            Quadrant::CashCow => label.green().bold().to_string(),
            Quadrant::StrategicPartner => label.blue().to_string(),
            Quadrant::Standard => label.bright_black().to_string(),
            Quadrant::Drain => label.red().bold().to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClientGroup {
    pub key: String,
    pub issue_count: usize,
    pub hours_spent: f64,
    /// Externally supplied, not derived from issues.
    pub revenue: f64,
    /// Revenue per hour; 0 with no tracked hours.
    pub profitability_index: f64,
    pub quadrant: Quadrant,
}

const UNGROUPED: &str = "Ungrouped";

/// Group issues and classify each group into a profitability quadrant.
///
/// Quadrant boundaries sit at half of the observed maximum hours and
/// revenue across the current groups, so the classification is a ranking
/// relative to the dataset, not an absolute scale: thresholds move as data
/// is added or removed.
pub fn profitability(
    snapshot: &Snapshot,
    mode: GroupBy,
    revenue: &HashMap<String, f64>,
) -> Vec<ClientGroup> {
    let mut keys: Vec<String> = Vec::new();
    let mut seconds: Vec<u64> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();

    for issue in &snapshot.issues {
        let key = match mode {
            GroupBy::Project => issue.project_key().to_string(),
            GroupBy::Epic => issue
                .parent_summary
                .as_deref()
                .or(issue.parent_key.as_deref())
                .unwrap_or(UNGROUPED)
                .to_string(),
        };
        match keys.iter().position(|k| *k == key) {
            Some(pos) => {
                seconds[pos] += issue.time_spent_seconds;
                counts[pos] += 1;
            }
            None => {
                keys.push(key);
                seconds.push(issue.time_spent_seconds);
                counts.push(1);
            }
        }
    }

    let hours: Vec<f64> = seconds.iter().map(|s| *s as f64 / 3600.0).collect();
    let revenues: Vec<f64> = keys
        .iter()
        .map(|k| revenue.get(k).copied().unwrap_or(0.0))
        .collect();

    let hours_midpoint = hours.iter().cloned().fold(0.0, f64::max) / 2.0;
    let revenue_midpoint = revenues.iter().cloned().fold(0.0, f64::max) / 2.0;

    let mut groups: Vec<ClientGroup> = keys
        .into_iter()
        .enumerate()
        .map(|(i, key)| {
            let high_hours = hours[i] > hours_midpoint;
            let high_revenue = revenues[i] > revenue_midpoint;
            let quadrant = match (high_revenue, high_hours) {
                (true, false) => Quadrant::CashCow,
                (true, true) => Quadrant::StrategicPartner,
                (false, false) => Quadrant::Standard,
                (false, true) => Quadrant::Drain,
            };
            ClientGroup {
                key,
                issue_count: counts[i],
                hours_spent: hours[i],
                revenue: revenues[i],
                profitability_index: if hours[i] > 0.0 {
                    revenues[i] / hours[i]
                } else {
                    0.0
                },
                quadrant,
            }
        })
        .collect();

    groups.sort_by(|a, b| b.hours_spent.total_cmp(&a.hours_spent));
    groups
}
