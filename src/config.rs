use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 地址
    pub api_base_url: String,
    /// 会话 Cookie（由登录模块提供，原样附加到上传请求）
    pub session_cookie: Option<String>,
    /// 待导入文件所在目录
    pub input_folder: String,
    /// 上传请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否在解析后上传
    pub submit_enabled: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行日志文件
    pub output_log_file: String,
    /// 通知记录文件
    pub notice_file: String,
    /// 导入报告文件（JSON）
    pub report_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            session_cookie: None,
            input_folder: "input_invoices".to_string(),
            request_timeout_secs: 60,
            submit_enabled: true,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            notice_file: "warn.txt".to_string(),
            report_file: "import_report.json".to_string(),
        }
    }
}

impl Config {
    /// 默认配置 + 环境变量覆盖
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 加载配置
    ///
    /// 设置了 `INGEST_CONFIG` 时先读取该 TOML 文件，再用环境变量覆盖。
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("INGEST_CONFIG") {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("INGEST_API_BASE_URL").unwrap_or(self.api_base_url),
            session_cookie: std::env::var("INGEST_SESSION_COOKIE").ok().or(self.session_cookie),
            input_folder: std::env::var("INGEST_INPUT_FOLDER").unwrap_or(self.input_folder),
            request_timeout_secs: std::env::var("INGEST_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            submit_enabled: std::env::var("INGEST_SUBMIT_ENABLED").ok().and_then(|v| v.parse().ok()).unwrap_or(self.submit_enabled),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            notice_file: std::env::var("INGEST_NOTICE_FILE").unwrap_or(self.notice_file),
            report_file: std::env::var("INGEST_REPORT_FILE").unwrap_or(self.report_file),
        }
    }
}
