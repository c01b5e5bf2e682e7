// 私有模块声明
mod app;
mod cli;
mod commands;
pub mod project_info; // 公开项目信息模块
mod utils;

// 通过 pub use 精确控制对外暴露的接口
pub use app::{CliApp, failure_message, report_failure, with_stage};
pub use cli::{Cli, Commands, FetchArgs};
pub use commands::{TableSummary, summarize};
pub use utils::setup_logging;
