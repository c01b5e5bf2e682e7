use crate::constants::{http, output};
use crate::error::{Result, SchemaError};
use crate::fetcher::{FetcherConfig, schema_url_for_version};
use crate::model::{FieldSelection, FilterOptions};
use crate::pipeline::PipelineConfig;
use crate::writer::WriteOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 应用配置结构（可选的 TOML 配置文件，所有字段均可省略）
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// 表结构来源配置
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub url: Option<String>,
    pub osquery_version: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// 输出相关配置
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub fields: Option<FieldSelection>,
    pub require_columns: Option<bool>,
    pub ensure_ascii: Option<bool>,
}

/// 命令行参数对配置的覆盖，优先级高于配置文件
#[derive(Debug, Default, Clone)]
pub struct FetchOverrides {
    pub url: Option<String>,
    pub osquery_version: Option<String>,
    pub output: Option<PathBuf>,
    pub fields: Option<FieldSelection>,
    pub require_columns: bool,
    pub timeout_secs: Option<u64>,
    pub no_ensure_ascii: bool,
}

impl AppConfig {
    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::config(format!("无法读取配置文件 {}: {e}", path.display()))
        })?;
        let config: AppConfig = toml::from_str(&content)?;

        tracing::debug!("已加载配置文件: {}", path.display());
        Ok(config)
    }

    /// 加载配置，未指定文件时使用默认配置
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// 确定下载地址：命令行优先，其次配置文件；URL 与版本号不能同时指定
    pub fn resolve_location(&self, overrides: &FetchOverrides) -> Result<Option<String>> {
        if let Some(location) = location_from(
            overrides.url.as_deref(),
            overrides.osquery_version.as_deref(),
        )? {
            return Ok(Some(location));
        }

        location_from(
            self.source.url.as_deref(),
            self.source.osquery_version.as_deref(),
        )
    }

    /// 合并配置文件与命令行参数，生成最终的执行配置
    pub fn into_pipeline_config(
        self,
        location: String,
        overrides: &FetchOverrides,
    ) -> Result<PipelineConfig> {
        let timeout_seconds = overrides
            .timeout_secs
            .or(self.source.timeout_secs)
            .unwrap_or(http::DEFAULT_TIMEOUT);
        if timeout_seconds == 0 {
            return Err(SchemaError::config("超时时间必须大于 0 秒"));
        }

        let fields = overrides
            .fields
            .or(self.output.fields)
            .unwrap_or_default();
        let require_columns =
            overrides.require_columns || self.output.require_columns.unwrap_or(false);
        let ensure_ascii = !overrides.no_ensure_ascii && self.output.ensure_ascii.unwrap_or(true);

        let output_path = overrides
            .output
            .clone()
            .or(self.output.path)
            .unwrap_or_else(output::get_default_output_path);

        Ok(PipelineConfig {
            location,
            output_path,
            filter: FilterOptions::new(fields).with_require_columns(require_columns),
            write: WriteOptions {
                ensure_ascii,
                ..Default::default()
            },
            fetcher: FetcherConfig {
                timeout_seconds,
                ..Default::default()
            },
        })
    }
}

fn location_from(url: Option<&str>, version: Option<&str>) -> Result<Option<String>> {
    match (url, version) {
        (Some(_), Some(_)) => Err(SchemaError::config(
            "不能同时指定下载地址和 osquery 版本号",
        )),
        (Some(url), None) => Ok(Some(url.trim().to_string())),
        (None, Some(version)) => schema_url_for_version(version).map(Some),
        (None, None) => Ok(None),
    }
}
