pub mod fetch;
pub mod inspect;

pub use fetch::run_fetch;
pub use inspect::{TableSummary, run_inspect, summarize};
