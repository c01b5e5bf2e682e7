//! # 输出文件模块
//!
//! 将过滤后的表结构写入插件使用的 JSON 文件，以及读回已写入的文件。
//!
//! 写入先落到目标目录下的临时文件，再原子重命名覆盖目标文件，
//! 写入失败时原有文件保持不变。不会自动创建父目录。

use crate::constants::output;
use crate::error::{Result, SchemaError};
use crate::model::FilteredRecord;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// 输出格式选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// 缩进宽度（空格数）
    pub indent_width: usize,
    /// 是否将非 ASCII 字符转义为 `\uXXXX`
    pub ensure_ascii: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent_width: output::INDENT_WIDTH,
            ensure_ascii: true,
        }
    }
}

/// 序列化为带缩进的 JSON，末尾不带换行
pub fn to_json_bytes(records: &[FilteredRecord], options: &WriteOptions) -> Result<Vec<u8>> {
    let indent = " ".repeat(options.indent_width);
    let pretty = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();

    if options.ensure_ascii {
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter { inner: pretty });
        records.serialize(&mut ser)?;
    } else {
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, pretty);
        records.serialize(&mut ser)?;
    }

    Ok(buf)
}

/// 写入输出文件，覆盖原有内容
pub fn write_output<P: AsRef<Path>>(
    records: &[FilteredRecord],
    destination: P,
    options: &WriteOptions,
) -> Result<()> {
    let destination = destination.as_ref();
    let bytes = to_json_bytes(records, options)?;

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SchemaError::io(destination, e))?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| SchemaError::io(destination, e))?;

    // 临时文件默认权限为 0600，保持与普通新建文件一致
    let permissions = match fs::metadata(destination) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| SchemaError::io(destination, e))?;
    }

    tmp.persist(destination)
        .map_err(|e| SchemaError::io(destination, e.error))?;

    info!(
        "💾 已写入 {} 张表到 {} ({} 字节)",
        records.len(),
        destination.display(),
        bytes.len()
    );
    Ok(())
}

/// 读取已写入的输出文件
pub fn read_output<P: AsRef<Path>>(path: P) -> Result<Vec<FilteredRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    let records: Vec<FilteredRecord> = serde_json::from_str(&content).map_err(|e| {
        SchemaError::parse(format!("输出文件格式错误: {}: {e}", path.display()))
    })?;

    debug!("读取 {} 张表: {}", records.len(), path.display());
    Ok(records)
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

/// 在缩进格式基础上把可打印 ASCII 以外的字符（含 DEL）写成 `\uXXXX`（BMP 之外使用代理对）
struct AsciiFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        if fragment.bytes().all(|b| b.is_ascii() && b != 0x7f) {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() && ch != '\u{7f}' {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilteredColumn;
    use tempfile::TempDir;

    fn sample() -> Vec<FilteredRecord> {
        vec![
            FilteredRecord {
                name: "processes".to_string(),
                description: "OS processes".to_string(),
                examples: vec!["select * from processes".to_string()],
                columns: Some(vec![FilteredColumn {
                    name: "pid".to_string(),
                    description: "process id".to_string(),
                }]),
            },
            FilteredRecord {
                name: "uptime".to_string(),
                description: "System uptime".to_string(),
                examples: vec![],
                columns: None,
            },
        ]
    }

    #[test]
    fn test_four_space_indentation() {
        let bytes = to_json_bytes(&sample()[..1], &WriteOptions::default()).unwrap();
        let expected = r#"[
    {
        "name": "processes",
        "description": "OS processes",
        "examples": [
            "select * from processes"
        ],
        "columns": [
            {
                "name": "pid",
                "description": "process id"
            }
        ]
    }
]"#;
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_empty_sequence() {
        let bytes = to_json_bytes(&[], &WriteOptions::default()).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn test_ensure_ascii_escapes_non_ascii() {
        let records = vec![FilteredRecord {
            name: "t".to_string(),
            description: "café ☕ 🦀 \"q\"".to_string(),
            examples: vec![],
            columns: None,
        }];

        let escaped = String::from_utf8(to_json_bytes(&records, &WriteOptions::default()).unwrap()).unwrap();
        assert!(
            escaped.contains(r#""caf\u00e9 \u2615 \ud83e\udd80 \"q\"""#),
            "{escaped}"
        );
        assert!(escaped.is_ascii());

        let del = vec![FilteredRecord {
            name: "a\u{7f}b".to_string(),
            description: String::new(),
            examples: vec![],
            columns: None,
        }];
        let escaped_del = String::from_utf8(to_json_bytes(&del, &WriteOptions::default()).unwrap()).unwrap();
        assert!(escaped_del.contains(r#""name": "a\u007fb""#), "{escaped_del}");
        assert!(!escaped_del.contains('\u{7f}'));

        let literal = WriteOptions {
            ensure_ascii: false,
            ..Default::default()
        };
        let raw = String::from_utf8(to_json_bytes(&records, &literal).unwrap()).unwrap();
        assert!(raw.contains("café ☕ 🦀"));

        let back: Vec<FilteredRecord> = serde_json::from_str(&escaped).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("osquery_schemas.json");

        write_output(&sample(), &path, &WriteOptions::default()).unwrap();
        assert_eq!(read_output(&path).unwrap(), sample());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("osquery_schemas.json");
        fs::write(&path, "x".repeat(10_000)).unwrap();

        write_output(&sample()[1..], &path, &WriteOptions::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('['));
        assert!(content.ends_with(']'));
        assert_eq!(read_output(&path).unwrap(), sample()[1..].to_vec());

        // 目录中不应残留临时文件
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_parent_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("osquery_schemas.json");

        let err = write_output(&sample(), &path, &WriteOptions::default()).unwrap_err();
        match err {
            SchemaError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("应返回 IO 错误, 实际为 {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_read_output_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_output(dir.path().join("nope.json")),
            Err(SchemaError::Io { .. })
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"[{"name":"t"}]"#).unwrap();
        assert!(matches!(read_output(&bad), Err(SchemaError::Parse(_))));
    }
}
