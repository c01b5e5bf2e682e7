//! # 表结构下载模块
//!
//! 通过 HTTP 获取 osquery 表结构 JSON 文档，并交给过滤模块处理。
//! 不做重试，请求失败或服务端返回非 2xx 状态时直接报错。

use crate::constants::{http, source};
use crate::error::{Result, SchemaError};
use crate::filter::{filter_records, parse_document};
use crate::model::{FilterOptions, FilteredRecord};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// 下载器配置
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: http::DEFAULT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

/// 表结构下载器
#[derive(Debug, Clone)]
pub struct SchemaFetcher {
    client: Client,
}

impl SchemaFetcher {
    /// 创建新的下载器
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| SchemaError::config(format!("创建 HTTP 客户端失败: {e}")))?;

        Ok(Self { client })
    }

    /// 下载表结构文档，返回响应内容
    pub async fn fetch_document(&self, location: &str) -> Result<String> {
        let url = validate_location(location)?;
        info!("🌐 正在下载表结构: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SchemaError::Retrieval {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SchemaError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|e| SchemaError::Retrieval {
            url: url.to_string(),
            source: e,
        })?;

        debug!("下载完成: HTTP {}, {} 字节", status, body.len());
        Ok(body)
    }

    /// 下载并过滤表结构
    pub async fn fetch_and_filter(
        &self,
        location: &str,
        options: &FilterOptions,
    ) -> Result<Vec<FilteredRecord>> {
        let body = self.fetch_document(location).await?;
        let records = parse_document(&body)?;
        info!("📋 解析到 {} 张表", records.len());
        filter_records(&records, options)
    }
}

/// 校验下载地址，只接受 http/https
pub fn validate_location(location: &str) -> Result<Url> {
    let trimmed = location.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| SchemaError::InvalidUrl(format!("{trimmed} ({e})")))?;

    if !source::ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(SchemaError::InvalidUrl(format!(
            "{trimmed} (不支持的协议: {})",
            url.scheme()
        )));
    }

    Ok(url)
}

/// 根据 osquery 版本号生成官网表结构地址
pub fn schema_url_for_version(version: &str) -> Result<String> {
    let version = version.trim().trim_start_matches('v');
    let parts: Vec<&str> = version.split('.').collect();
    let valid = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

    if !valid {
        return Err(SchemaError::config(format!(
            "无效的 osquery 版本号: '{version}'，应为 X.Y.Z 格式"
        )));
    }

    Ok(source::OSQUERY_SCHEMA_URL_TEMPLATE.replace("{version}", version))
}
