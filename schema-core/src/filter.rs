//! # 表结构过滤模块
//!
//! 将下载到的表结构文档解析为记录列表，并按字段集合投影为插件需要的精简记录。
//!
//! - 只做字段选择，不改名、不改值
//! - 输出顺序与输入一致，列顺序与每张表的原始列顺序一致
//! - 必需字段缺失时立即失败，不做默认值填充

use crate::constants::fields;
use crate::error::{Result, SchemaError};
use crate::model::{FilterOptions, FilteredColumn, FilteredRecord};
use serde_json::{Map, Value};
use tracing::debug;

/// 源文档中的单条记录（JSON 对象）
pub type RawRecord = Map<String, Value>;

/// 将响应内容解析为记录列表
///
/// 文档必须是 JSON 数组，且每个元素都是 JSON 对象。
pub fn parse_document(body: &str) -> Result<Vec<RawRecord>> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| SchemaError::parse(format!("响应内容不是有效的 JSON: {e}")))?;

    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(SchemaError::parse(format!(
                "表结构文档应为 JSON 数组，实际为 {}",
                json_type(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(SchemaError::parse(format!(
                "第 {index} 条记录应为 JSON 对象，实际为 {}",
                json_type(&other)
            ))),
        })
        .collect()
}

/// 按过滤选项投影所有记录
pub fn filter_records(records: &[RawRecord], options: &FilterOptions) -> Result<Vec<FilteredRecord>> {
    let filtered = records
        .iter()
        .enumerate()
        .map(|(index, record)| filter_record(index, record, options))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "过滤完成: {} 条记录, 字段集合: {}",
        filtered.len(),
        options.fields
    );
    Ok(filtered)
}

/// 投影单条记录
pub fn filter_record(index: usize, record: &RawRecord, options: &FilterOptions) -> Result<FilteredRecord> {
    let label = record_label(index, record);

    let name = required_string(record, fields::NAME, &label, fields::NAME)?;
    let description = required_string(record, fields::DESCRIPTION, &label, fields::DESCRIPTION)?;
    let examples = required_string_list(record, fields::EXAMPLES, &label)?;

    let columns = if options.fields.includes_columns() {
        filter_columns(record, &label, options.require_columns)?
    } else {
        None
    };

    Ok(FilteredRecord {
        name,
        description,
        examples,
        columns,
    })
}

fn filter_columns(
    record: &RawRecord,
    label: &str,
    require_columns: bool,
) -> Result<Option<Vec<FilteredColumn>>> {
    let columns = match record.get(fields::COLUMNS) {
        Some(Value::Array(columns)) => columns,
        Some(other) => {
            return Err(SchemaError::parse(format!(
                "记录 {label} 的字段 '{}' 应为数组，实际为 {}",
                fields::COLUMNS,
                json_type(other)
            )));
        }
        None if require_columns => {
            return Err(SchemaError::missing_field(label, fields::COLUMNS));
        }
        None => return Ok(None),
    };

    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let path = format!("{}[{i}]", fields::COLUMNS);
            let column = column.as_object().ok_or_else(|| {
                SchemaError::parse(format!(
                    "记录 {label} 的 {path} 应为 JSON 对象，实际为 {}",
                    json_type(column)
                ))
            })?;

            Ok(FilteredColumn {
                name: required_string(
                    column,
                    fields::NAME,
                    label,
                    &format!("{path}.{}", fields::NAME),
                )?,
                description: required_string(
                    column,
                    fields::DESCRIPTION,
                    label,
                    &format!("{path}.{}", fields::DESCRIPTION),
                )?,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// 记录在错误信息中的标识，例如 `#3 (processes)`
fn record_label(index: usize, record: &RawRecord) -> String {
    match record.get(fields::NAME).and_then(Value::as_str) {
        Some(name) => format!("#{index} ({name})"),
        None => format!("#{index}"),
    }
}

fn required_string(object: &RawRecord, key: &str, label: &str, path: &str) -> Result<String> {
    match object.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(SchemaError::parse(format!(
            "记录 {label} 的字段 '{path}' 应为字符串，实际为 {}",
            json_type(other)
        ))),
        None => Err(SchemaError::missing_field(label, path)),
    }
}

fn required_string_list(object: &RawRecord, key: &str, label: &str) -> Result<Vec<String>> {
    let values = match object.get(key) {
        Some(Value::Array(values)) => values,
        Some(other) => {
            return Err(SchemaError::parse(format!(
                "记录 {label} 的字段 '{key}' 应为字符串数组，实际为 {}",
                json_type(other)
            )));
        }
        None => return Err(SchemaError::missing_field(label, key)),
    };

    values
        .iter()
        .enumerate()
        .map(|(i, value)| match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(SchemaError::parse(format!(
                "记录 {label} 的字段 '{key}[{i}]' 应为字符串，实际为 {}",
                json_type(other)
            ))),
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "布尔值",
        Value::Number(_) => "数字",
        Value::String(_) => "字符串",
        Value::Array(_) => "数组",
        Value::Object(_) => "对象",
    }
}
