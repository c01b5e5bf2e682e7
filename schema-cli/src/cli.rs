use crate::project_info::{metadata, version_info};
use clap::{Args, Parser, Subcommand};
use schema_core::FieldSelection;
use schema_core::config::FetchOverrides;
use std::path::PathBuf;

/// osquery 表结构同步工具
#[derive(Parser, Debug)]
#[command(name = "schema-cli")]
#[command(about = metadata::PROJECT_DESCRIPTION)]
#[command(version = version_info::CLI_VERSION)]
#[command(long_about = metadata::display::DESCRIPTION_LONG)]
#[command(author = metadata::PROJECT_AUTHORS)]
pub struct Cli {
    /// 配置文件路径（可选，TOML 格式）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 下载表结构 JSON，过滤字段后写入输出文件
    Fetch(FetchArgs),
    /// 查看已生成的表结构文件
    Inspect {
        /// 表结构文件路径（默认: osquery/osquery_schemas.json）
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// 表结构 JSON 的下载地址
    #[arg(conflicts_with = "osquery_version")]
    pub url: Option<String>,

    /// osquery 版本号（X.Y.Z），自动生成官网下载地址
    #[arg(long, value_name = "X.Y.Z")]
    pub osquery_version: Option<String>,

    /// 输出文件路径（默认: osquery/osquery_schemas.json）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 保留的字段集合
    #[arg(long, value_name = "basic|full")]
    pub fields: Option<FieldSelection>,

    /// 完整模式下，源记录缺少 columns 字段时报错
    #[arg(long)]
    pub require_columns: bool,

    /// HTTP 请求超时时间（秒，默认 30）
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// 非 ASCII 字符原样输出，不转义为 \uXXXX
    #[arg(long)]
    pub no_ensure_ascii: bool,
}

impl FetchArgs {
    pub fn overrides(&self) -> FetchOverrides {
        FetchOverrides {
            url: self.url.clone(),
            osquery_version: self.osquery_version.clone(),
            output: self.output.clone(),
            fields: self.fields,
            require_columns: self.require_columns,
            timeout_secs: self.timeout,
            no_ensure_ascii: self.no_ensure_ascii,
        }
    }
}
