//! 下载 → 过滤 → 写入 的完整流程
//!
//! 所有下载与过滤都在写入之前完成，任何一步失败都不会改动已有的输出文件。

use crate::error::Result;
use crate::fetcher::{FetcherConfig, SchemaFetcher};
use crate::model::FilterOptions;
use crate::writer::{WriteOptions, write_output};
use std::path::PathBuf;
use tracing::info;

/// 单次执行的完整配置
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub location: String,
    pub output_path: PathBuf,
    pub filter: FilterOptions,
    pub write: WriteOptions,
    pub fetcher: FetcherConfig,
}

/// 执行结果摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub output_path: PathBuf,
    pub table_count: usize,
    pub column_count: usize,
}

/// 执行一次完整流程
pub async fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    info!(
        "🚀 开始同步表结构 (字段集合: {}, 输出: {})",
        config.filter.fields,
        config.output_path.display()
    );

    let fetcher = SchemaFetcher::new(config.fetcher.clone())?;
    let records = fetcher
        .fetch_and_filter(&config.location, &config.filter)
        .await?;

    write_output(&records, &config.output_path, &config.write)?;

    let column_count = records
        .iter()
        .filter_map(|r| r.columns.as_ref())
        .map(Vec::len)
        .sum();

    Ok(PipelineReport {
        output_path: config.output_path.clone(),
        table_count: records.len(),
        column_count,
    })
}
