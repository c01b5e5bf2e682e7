use schema_core::{Result, SchemaError};
use schema_core::config::AppConfig;
use std::path::Path;

use crate::cli::Commands;
use crate::commands;
use crate::project_info::get_version_string;
use tracing::{Level, debug, error};

#[derive(Debug, Clone, Default)]
pub struct CliApp {
    pub config: AppConfig,
}

impl CliApp {
    /// 加载配置并初始化CLI应用，未指定配置文件时使用默认配置
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = AppConfig::load_optional(config_path)?;
        debug!("{}", get_version_string());
        Ok(Self { config })
    }

    /// 运行应用命令
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Fetch(args) => commands::run_fetch(&self.config, &args).await,
            Commands::Inspect { path } => commands::run_inspect(path.as_deref()).await,
        }
    }
}

/// 在错误信息前标注失败的处理阶段
pub fn with_stage(err: SchemaError) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("{stage}阶段失败"))
}

/// 失败时的诊断信息，包含完整错误链
pub fn failure_message(err: &anyhow::Error) -> String {
    format!("❌ {:#}", err)
}

/// 输出失败诊断；日志过滤掉 ERROR 级别时直接写到 stderr
pub fn report_failure(err: &anyhow::Error) {
    let message = failure_message(err);
    if tracing::enabled!(Level::ERROR) {
        error!("{}", message);
    } else {
        eprintln!("{message}");
    }
}
