use std::fmt;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Priority levels for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Highest,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Map a raw tracker priority name onto a canonical level.
    ///
    /// Case-insensitive substring match; "highest" must be checked before
    /// "high". Anything unrecognized lands on Medium.
    pub fn from_raw(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("highest") || lower.contains("blocker") {
            Priority::Highest
        } else if lower.contains("high") || lower.contains("critical") {
            Priority::High
        } else if lower.contains("low") || lower.contains("minor") {
            Priority::Low
        } else {
            Priority::Medium
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Highest => "Highest",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Get the colored label for terminal output.
    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            Priority::Highest => label.red().bold().to_string(),
            Priority::High => label.yellow().bold().to_string(),
            Priority::Medium => label.blue().to_string(),
            Priority::Low => label.bright_black().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_wins_over_high_substring() {
        assert_eq!(Priority::from_raw("Highest"), Priority::Highest);
        assert_eq!(Priority::from_raw("BLOCKER"), Priority::Highest);
        assert_eq!(Priority::from_raw("High"), Priority::High);
        assert_eq!(Priority::from_raw("critical"), Priority::High);
    }

    #[test]
    fn unmatched_defaults_to_medium() {
        assert_eq!(Priority::from_raw(""), Priority::Medium);
        assert_eq!(Priority::from_raw("P5 - whatever"), Priority::Medium);
    }

    #[test]
    fn low_aliases() {
        assert_eq!(Priority::from_raw("Lowest"), Priority::Low);
        assert_eq!(Priority::from_raw("minor"), Priority::Low);
    }
}
