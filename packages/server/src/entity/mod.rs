pub mod problem_progress;
pub mod submission;
pub mod user;
