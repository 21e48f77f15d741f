pub mod context;
pub mod contract_checker;
pub mod usage_checker;
pub mod walker;

pub use context::{CheckContext, DeferItem};
pub use contract_checker::ContractChecker;
pub use usage_checker::UsageChecker;
pub use walker::FlowWalker;
