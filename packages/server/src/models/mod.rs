pub mod auth;
pub mod problem;
pub mod progress;
pub mod shared;
pub mod submission;
