mod issue;
mod issue_type;
mod member;
mod priority;
mod sprint;
mod status;

pub use issue::Issue;
pub use issue_type::IssueType;
pub use member::TeamMember;
pub use priority::Priority;
pub use sprint::{Sprint, SprintState};
pub use status::Status;
