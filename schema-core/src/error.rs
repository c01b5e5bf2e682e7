use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("下载表结构失败: {url}")]
    Retrieval {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("服务端响应错误: {url}: HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("无效的下载地址: {0}")]
    InvalidUrl(String),

    #[error("表结构解析失败: {0}")]
    Parse(String),

    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("记录 {record} 缺少字段 '{field}'")]
    MissingField { record: String, field: String },

    #[error("文件读写失败: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置错误: {0}")]
    Config(String),

    #[error("配置文件格式错误: {0}")]
    ConfigFormat(#[from] toml::de::Error),
}

/// 出错时所处的处理阶段，用于命令行诊断输出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieval,
    Parse,
    MissingField,
    Io,
    Config,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Retrieval => "下载",
            Stage::Parse => "解析",
            Stage::MissingField => "字段缺失",
            Stage::Io => "文件读写",
            Stage::Config => "配置",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl SchemaError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn missing_field(record: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            record: record.into(),
            field: field.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 错误对应的处理阶段
    pub fn stage(&self) -> Stage {
        match self {
            SchemaError::Retrieval { .. }
            | SchemaError::HttpStatus { .. }
            | SchemaError::InvalidUrl(_) => Stage::Retrieval,
            SchemaError::Parse(_) | SchemaError::Json(_) => Stage::Parse,
            SchemaError::MissingField { .. } => Stage::MissingField,
            SchemaError::Io { .. } => Stage::Io,
            SchemaError::Config(_) | SchemaError::ConfigFormat(_) => Stage::Config,
        }
    }
}
