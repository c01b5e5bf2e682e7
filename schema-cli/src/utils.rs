use std::io::{BufRead, IsTerminal, Write};

/// # Schema CLI 日志系统使用说明
///
/// ## 基本原则
/// 1. **库代码只使用 `tracing` 宏**：`info!()`, `warn!()`, `error!()`, `debug!()`
/// 2. **应用入口控制日志配置**：在 `main.rs` 中调用 `setup_logging()`
/// 3. **最终结果与日志分离**：保存成功的提示和 `inspect` 的表格输出到 stdout
///
/// ## 日志配置选项
/// - `-v, --verbose`：启用详细日志模式（DEBUG 级别）
/// - `RUST_LOG`：标准的 Rust 日志级别控制（如 `debug`, `info`, `warn`, `error`）
/// - `SCHEMA_LOG_FILE`：日志文件路径，设置后日志输出到文件而非终端
///
/// ```bash
/// schema-cli fetch --osquery-version 5.12.1
/// schema-cli -v fetch https://example.com/5.12.1.json
/// SCHEMA_LOG_FILE=schema.log schema-cli fetch --osquery-version 5.12.1
/// ```
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // 根据verbose参数和环境变量确定日志级别
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_file = std::env::var("SCHEMA_LOG_FILE").ok().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| eprintln!("无法打开日志文件 {path}: {e}，改为输出到终端"))
            .ok()
    });

    if let Some(file) = log_file {
        // 输出到文件 - 使用详细格式便于调试
        fmt()
            .with_env_filter(env_filter)
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_names(true)
            .with_line_number(true)
            .init();
    } else {
        // 输出到终端 - 使用简洁格式，用户友好
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .without_time()
            .compact()
            .init();
    }
}

/// 交互式读取下载地址，stdin 不是终端时返回 None
pub fn prompt_for_location() -> std::io::Result<Option<String>> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return Ok(None);
    }

    print!("请输入当前 osquery 表结构 JSON 的下载地址: ");
    std::io::stdout().flush()?;

    read_location(stdin.lock())
}

fn read_location<R: BufRead>(mut reader: R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let location = line.trim();
    Ok((!location.is_empty()).then(|| location.to_string()))
}
