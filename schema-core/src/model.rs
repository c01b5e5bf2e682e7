use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 过滤后的列信息，只保留列名和描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredColumn {
    pub name: String,
    pub description: String,
}

/// 过滤后的表结构记录
///
/// 字段顺序即输出顺序：`name`、`description`、`examples`、`columns`。
/// `columns` 为 `None` 时不输出该字段（精简模式或源记录没有列信息）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredRecord {
    pub name: String,
    pub description: String,
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<FilteredColumn>>,
}

/// 需要保留的字段集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSelection {
    /// name + description + examples
    Basic,
    /// name + description + examples + columns(name, description)
    #[default]
    Full,
}

impl FieldSelection {
    pub fn includes_columns(&self) -> bool {
        matches!(self, FieldSelection::Full)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSelection::Basic => "basic",
            FieldSelection::Full => "full",
        }
    }
}

impl fmt::Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(FieldSelection::Basic),
            "full" => Ok(FieldSelection::Full),
            other => Err(format!("未知的字段集合: {other}（可选: basic, full）")),
        }
    }
}

/// 过滤选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub fields: FieldSelection,
    /// 完整模式下，源记录缺少 `columns` 时是否视为错误
    pub require_columns: bool,
}

impl FilterOptions {
    pub fn new(fields: FieldSelection) -> Self {
        Self {
            fields,
            require_columns: false,
        }
    }

    pub fn with_require_columns(mut self, require_columns: bool) -> Self {
        self.require_columns = require_columns;
        self
    }
}
