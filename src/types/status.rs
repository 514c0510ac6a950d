use std::fmt;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Canonical workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    ToDo,
    InProgress,
    InReview,
    Done,
}

impl Status {
    /// Map a raw status name (and optional status category) onto a
    /// canonical status.
    ///
    /// The tracker's status category, when supplied, is authoritative:
    /// a "done" category is Done and an "in progress" category is
    /// InProgress regardless of what the status was renamed to. Review
    /// detection is text-only, so it applies when no category rule fired.
    pub fn from_raw(raw_status: &str, raw_category: Option<&str>) -> Self {
        let status = raw_status.to_lowercase();
        let category = raw_category.map(|c| c.to_lowercase()).unwrap_or_default();

        if category.contains("done") || status.contains("done") || status.contains("closed") {
            return Status::Done;
        }
        if category.contains("progress") {
            return Status::InProgress;
        }
        if status.contains("review") || status.contains("qa") {
            return Status::InReview;
        }
        if status.contains("progress") {
            return Status::InProgress;
        }
        Status::ToDo
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::ToDo => "To Do",
            Status::InProgress => "In Progress",
            Status::InReview => "In Review",
            Status::Done => "Done",
        }
    }

    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            Status::ToDo => label.bright_black().to_string(),
            Status::InProgress => label.blue().to_string(),
            Status::InReview => label.magenta().to_string(),
            Status::Done => label.green().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_and_text_agree_on_done() {
        assert_eq!(Status::from_raw("Done", Some("Done")), Status::Done);
        assert_eq!(Status::from_raw("CLOSED", None), Status::Done);
    }

    #[test]
    fn category_takes_precedence_over_text() {
        // A renamed terminal status still lands on Done via its category,
        // and an in-progress category wins over unrecognized status text.
        assert_eq!(Status::from_raw("Shipped", Some("Done")), Status::Done);
        assert_eq!(
            Status::from_raw("In Review", Some("In Progress")),
            Status::InProgress
        );
    }

    #[test]
    fn review_states_detected_without_category() {
        assert_eq!(Status::from_raw("In Review", None), Status::InReview);
        assert_eq!(Status::from_raw("QA", None), Status::InReview);
        // A category with no rule of its own falls through to text.
        assert_eq!(Status::from_raw("Code Review", Some("To Do")), Status::InReview);
    }

    #[test]
    fn unmatched_defaults_to_todo() {
        assert_eq!(Status::from_raw("Backlog", None), Status::ToDo);
        assert_eq!(Status::from_raw("", None), Status::ToDo);
    }
}
