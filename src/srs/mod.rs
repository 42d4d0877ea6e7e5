pub mod problem_hands;
pub mod progress;
pub mod sm2;

pub use problem_hands::{update_problem_hands, ProblemHandEntry};
pub use progress::{format_duration, record_attempt, ProgressRecord, SessionSummary};
pub use sm2::{calculate_review, describe_next_review, is_due, Quality, ReviewState};
