//! 错误类型定义
//!
//! 各层使用各自的错误枚举。
//! 导入队列中单个文件的失败（解压或解析）汇总为 [`AppError`]，
//! 应用层（`main` / `App` / 加载器）直接使用 `anyhow::Result`。

use thiserror::Error;

/// 单个文件处理失败的原因
#[derive(Debug, Error)]
pub enum AppError {
    /// 压缩包相关错误
    #[error("压缩包错误: {0}")]
    Archive(#[from] ArchiveError),
    /// XML 解析错误
    #[error("XML解析错误: {0}")]
    Parse(#[from] ParseError),
}

/// 压缩包解压错误
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// 不是合法的 zip 数据
    #[error("无法解码压缩包 {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },
    /// 读取条目内容失败
    #[error("无法解压条目 {entry} ({name}): {source}")]
    EntryRead {
        name: String,
        entry: String,
        #[source]
        source: std::io::Error,
    },
    /// 解压任务异常终止
    #[error("解压任务异常终止 ({name}): {source}")]
    TaskFailed {
        name: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// XML 语法错误
///
/// 结构不符合发票格式不算错误，解析器会返回 `Ok(None)`。
#[derive(Debug, Error)]
pub enum ParseError {
    /// 分词器无法继续
    #[error("XML语法错误 (位置 {position}): {source}")]
    Syntax {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    /// 文档结束时仍有未闭合的标签
    #[error("XML标签未闭合: <{tag}>")]
    Unclosed { tag: String },
    /// 多余的结束标签
    #[error("多余的结束标签: </{tag}>")]
    UnexpectedClosingTag { tag: String },
    /// 根元素之后又出现了元素
    #[error("根元素之后存在多余的元素: <{tag}>")]
    TrailingElement { tag: String },
    /// 文档中没有任何元素
    #[error("XML文档没有根元素")]
    NoRootElement,
}

/// 上传接口错误
#[derive(Debug, Error)]
pub enum UploadError {
    /// 网络请求失败
    #[error("请求发送失败 ({endpoint}): {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回非 2xx 状态
    #[error("服务端拒绝请求 ({endpoint}): status={status}, message={message:?}")]
    Rejected {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 响应体无法解析
    #[error("响应解析失败 ({endpoint}): {source}")]
    InvalidResponse {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl UploadError {
    /// 服务端在响应体中给出的 `message`（如果有）
    pub fn server_message(&self) -> Option<&str> {
        match self {
            UploadError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
