pub mod achievement;
pub mod activity;
pub mod catalog;
pub mod config;
pub mod problem;
pub mod progress;
pub mod stats;
pub mod store;
pub mod submission_status;

pub use catalog::{ProblemCatalog, StaticCatalog};
pub use problem::{Difficulty, Problem};
pub use progress::{ProblemStatus, ProblemStatusDetail, StoredStatus, UserProgress, WritePolicy};
pub use store::{ProgressStore, StoreError};
pub use submission_status::SubmissionStatus;
