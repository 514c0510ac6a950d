use std::fmt;

use chrono::NaiveDate;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// A time-boxed work period.
///
/// Future sprints may not have dates yet; when both dates are present the
/// normalizer guarantees start <= end.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: String,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub state: SprintState,
    pub source: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SprintState {
    Active,
    Future,
    Closed,
}

impl SprintState {
    /// Map a raw sprint state onto the lifecycle enum. Unrecognized text
    /// is treated as an upcoming sprint.
    pub fn from_raw(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("active") {
            SprintState::Active
        } else if lower.contains("closed") {
            SprintState::Closed
        } else {
            SprintState::Future
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SprintState::Active => "active",
            SprintState::Future => "future",
            SprintState::Closed => "closed",
        }
    }

    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            SprintState::Active => label.green().bold().to_string(),
            SprintState::Future => label.blue().to_string(),
            SprintState::Closed => label.bright_black().to_string(),
        }
    }
}

impl fmt::Display for SprintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_from_raw() {
        assert_eq!(SprintState::from_raw("ACTIVE"), SprintState::Active);
        assert_eq!(SprintState::from_raw("closed"), SprintState::Closed);
        assert_eq!(SprintState::from_raw("future"), SprintState::Future);
        assert_eq!(SprintState::from_raw("draft"), SprintState::Future);
    }
}
