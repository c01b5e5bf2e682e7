/// 表结构来源相关常量
pub mod source {
    /// osquery 官网发布的表结构 JSON 地址模板，`{version}` 为 X.Y.Z 形式的版本号
    pub const OSQUERY_SCHEMA_URL_TEMPLATE: &str = "https://raw.githubusercontent.com/osquery/osquery-site/source/src/data/osquery_schema_versions/{version}.json";

    /// 允许的 URL 协议
    pub const ALLOWED_SCHEMES: &[&str] = &["http", "https"];
}

/// 输出文件相关常量
pub mod output {
    use std::path::PathBuf;

    /// 插件目录名
    pub const PLUGIN_DIR_NAME: &str = "osquery";

    /// 过滤后表结构文件名
    pub const SCHEMA_FILE_NAME: &str = "osquery_schemas.json";

    /// JSON 缩进宽度（空格数）
    pub const INDENT_WIDTH: usize = 4;

    /// 获取默认输出文件路径（跨平台）
    pub fn get_default_output_path() -> PathBuf {
        PathBuf::from(PLUGIN_DIR_NAME).join(SCHEMA_FILE_NAME)
    }
}

/// HTTP相关常量
pub mod http {
    /// 默认请求超时时间（秒）
    pub const DEFAULT_TIMEOUT: u64 = 30;

    /// User-Agent头
    pub const USER_AGENT: &str = concat!("schema-cli/", env!("CARGO_PKG_VERSION"));
}

/// 表结构字段名
pub mod fields {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const EXAMPLES: &str = "examples";
    pub const COLUMNS: &str = "columns";
}

/// 版本相关常量
pub mod version {
    /// 核心库版本（自动从 Cargo.toml 同步）
    pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
}
