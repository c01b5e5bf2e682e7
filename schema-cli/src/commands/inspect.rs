use schema_core::constants::output;
use schema_core::writer::read_output;
use schema_core::{FilteredRecord, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// 单张表的摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub example_count: usize,
    /// 精简模式下没有列信息
    pub column_count: Option<usize>,
}

pub fn summarize(records: &[FilteredRecord]) -> Vec<TableSummary> {
    records
        .iter()
        .map(|r| TableSummary {
            name: r.name.clone(),
            example_count: r.examples.len(),
            column_count: r.columns.as_ref().map(Vec::len),
        })
        .collect()
}

/// 查看已生成的表结构文件
pub async fn run_inspect(path: Option<&Path>) -> Result<()> {
    let path: PathBuf = path
        .map(Path::to_path_buf)
        .unwrap_or_else(output::get_default_output_path);
    info!("📂 读取表结构文件: {}", path.display());

    let summaries = summarize(&read_output(&path)?);
    let width = summaries
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max(4);

    println!("{:<width$}  {:>6}  {:>6}", "表名", "示例", "列数");
    for summary in &summaries {
        let columns = summary
            .column_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<width$}  {:>6}  {:>6}",
            summary.name, summary.example_count, columns
        );
    }

    let total_columns: usize = summaries.iter().filter_map(|s| s.column_count).sum();
    println!("共 {} 张表, {} 列", summaries.len(), total_columns);
    Ok(())
}
