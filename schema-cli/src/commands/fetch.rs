use crate::cli::FetchArgs;
use crate::utils::prompt_for_location;
use schema_core::config::AppConfig;
use schema_core::pipeline::run_pipeline;
use schema_core::{Result, SchemaError};
use tracing::{debug, info};

/// 执行表结构下载、过滤和写入
pub async fn run_fetch(config: &AppConfig, args: &FetchArgs) -> Result<()> {
    run_fetch_with_prompt(config, args, prompt_for_location).await
}

/// 命令行与配置文件都没有下载地址时，通过 `prompt` 获取
async fn run_fetch_with_prompt<F>(config: &AppConfig, args: &FetchArgs, prompt: F) -> Result<()>
where
    F: FnOnce() -> std::io::Result<Option<String>>,
{
    let overrides = args.overrides();

    let location = match config.resolve_location(&overrides)? {
        Some(location) => location,
        None => prompt()
            .map_err(|e| SchemaError::config(format!("读取下载地址失败: {e}")))?
            .ok_or_else(|| {
                SchemaError::config(
                    "未指定下载地址，请传入 URL 或使用 --osquery-version 指定版本",
                )
            })?,
    };

    let pipeline = config.clone().into_pipeline_config(location, &overrides)?;
    debug!("执行配置: {:?}", pipeline);

    let report = run_pipeline(&pipeline).await?;
    info!(
        "📊 共 {} 张表, {} 列",
        report.table_count, report.column_count
    );

    println!(
        "✅ 已保存过滤后的表结构 ({} 张表) 到 '{}'",
        report.table_count,
        report.output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_core::FieldSelection;
    use schema_core::config::SourceConfig;
    use std::fs;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SOURCE: &str = r#"[{"name":"processes","description":"OS processes","examples":["select * from processes"],"columns":[{"name":"pid","description":"process id","type":"int"}]}]"#;

    /// 只响应一次请求的本地服务
    async fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while let Ok(n) = stream.read(&mut chunk).await {
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{addr}/osquery_schema.json")
    }

    fn no_prompt() -> std::io::Result<Option<String>> {
        Ok(None)
    }

    #[tokio::test]
    async fn test_location_from_config_file_and_flags_merged() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("osquery_schemas.json");
        let config = AppConfig {
            source: SourceConfig {
                url: Some(serve_once(SOURCE).await),
                ..Default::default()
            },
            ..Default::default()
        };
        let args = FetchArgs {
            output: Some(output.clone()),
            fields: Some(FieldSelection::Basic),
            ..Default::default()
        };

        run_fetch_with_prompt(&config, &args, || panic!("配置文件已提供地址，不应提示输入"))
            .await
            .unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("\"name\": \"processes\""));
        assert!(!content.contains("columns"));
    }

    #[tokio::test]
    async fn test_missing_location_without_terminal_is_config_error() {
        let dir = TempDir::new().unwrap();
        let args = FetchArgs {
            output: Some(dir.path().join("osquery_schemas.json")),
            ..Default::default()
        };

        let err = run_fetch_with_prompt(&AppConfig::default(), &args, no_prompt)
            .await
            .unwrap_err();
        assert!(matches!(err, SchemaError::Config(_)));
        assert!(!dir.path().join("osquery_schemas.json").exists());
    }

    #[tokio::test]
    async fn test_prompted_location_is_used() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("osquery_schemas.json");
        let url = serve_once(SOURCE).await;
        let args = FetchArgs {
            output: Some(output.clone()),
            ..Default::default()
        };

        run_fetch_with_prompt(&AppConfig::default(), &args, move || Ok(Some(url)))
            .await
            .unwrap();
        assert!(fs::read_to_string(&output).unwrap().contains("\"columns\""));
    }
}
