pub mod runner;

pub use runner::{run_checkers, sort_reports};
