pub mod path_run;
pub mod violation;

pub use path_run::PathRun;
pub use violation::{CheckError, Report};
