
mod problem;
mod submission;
