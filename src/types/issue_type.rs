use std::fmt;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Canonical issue categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    Story,
    Bug,
    Task,
    Epic,
}

impl IssueType {
    /// Map a raw tracker type name onto a canonical category.
    ///
    /// Case-insensitive substring match in the order bug > task > epic, so
    /// "Sub-task" is a Task and "Bug Report" is a Bug. Anything else,
    /// including an empty name, is a Story.
    pub fn from_raw(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("bug") {
            IssueType::Bug
        } else if lower.contains("task") {
            IssueType::Task
        } else if lower.contains("epic") {
            IssueType::Epic
        } else {
            IssueType::Story
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueType::Story => "Story",
            IssueType::Bug => "Bug",
            IssueType::Task => "Task",
            IssueType::Epic => "Epic",
        }
    }

    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            IssueType::Story => label.green().to_string(),
            IssueType::Bug => label.red().to_string(),
            IssueType::Task => label.blue().to_string(),
            IssueType::Epic => label.magenta().to_string(),
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_order() {
        assert_eq!(IssueType::from_raw("Bug Report"), IssueType::Bug);
        assert_eq!(IssueType::from_raw("Sub-task"), IssueType::Task);
        assert_eq!(IssueType::from_raw("EPIC"), IssueType::Epic);
    }

    #[test]
    fn unmatched_defaults_to_story() {
        assert_eq!(IssueType::from_raw(""), IssueType::Story);
        assert_eq!(IssueType::from_raw("Improvement"), IssueType::Story);
    }
}
