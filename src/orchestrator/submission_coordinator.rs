//! 提交协调器 - 编排层
//!
//! ## 职责
//!
//! 把已接受的文件按扩展名分成两组，分别上传到对应接口，
//! 并把各次调用的结果合并成一个 [`SubmissionResult`]。
//!
//! ## 分组规则
//!
//! - `.txt`（忽略大小写）→ 结构化文本组，逐个、按顺序上传到 `/import-sri-txt`
//! - 其他（包括 `.xml` 和没有扩展名的文件）→ XML 组，一次性上传到 `/facturas/importar`
//!
//! ## 失败处理
//!
//! - 文本组：单个文件失败只记录该文件，继续下一个
//! - XML 组：整批失败时组内每个文件各记一条相同的错误
//! - 本模块从不返回错误，所有失败都体现在结果里

use crate::infrastructure::UploadTransport;
use crate::models::{FileErrorEntry, RawFile, SubmissionResult};
use std::sync::Arc;
use tracing::{info, warn};

pub const TXT_IMPORT_ENDPOINT: &str = "/import-sri-txt";
pub const TXT_FIELD: &str = "file";
pub const XML_IMPORT_ENDPOINT: &str = "/facturas/importar";
pub const XML_FIELD: &str = "xml_files[]";

const TXT_DEFAULT_ERROR: &str = "error importing TXT";
const XML_DEFAULT_ERROR: &str = "error importing XML";

/// 上传分组
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// 结构化文本（`.txt`）
    StructuredText,
    /// XML 批量
    XmlBatch,
}

impl Partition {
    /// 按扩展名判断分组
    pub fn of(file: &RawFile) -> Self {
        if file.has_extension("txt") {
            Partition::StructuredText
        } else {
            Partition::XmlBatch
        }
    }
}

/// 按分组拆分文件，各组内保持原顺序
pub fn partition(files: &[RawFile]) -> (Vec<RawFile>, Vec<RawFile>) {
    files
        .iter()
        .cloned()
        .partition(|file| Partition::of(file) == Partition::StructuredText)
}

/// 提交协调器
///
/// 不持有调用之间的状态，每次 `submit` 相互独立。
pub struct SubmissionCoordinator {
    transport: Arc<dyn UploadTransport>,
}

impl SubmissionCoordinator {
    pub fn new(transport: Arc<dyn UploadTransport>) -> Self {
        Self { transport }
    }

    /// 提交文件
    ///
    /// # 参数
    /// - `files`: 已接受的原始文件
    ///
    /// # 返回
    /// 汇总结果，`success` 仅在没有任何错误记录时为 true
    pub async fn submit(&self, files: &[RawFile]) -> SubmissionResult {
        let (text_files, xml_files) = partition(files);
        let mut imported = Vec::new();
        let mut errors = Vec::new();

        info!(
            "📤 开始上传: TXT {} 个, XML {} 个",
            text_files.len(),
            xml_files.len()
        );

        // ========== 文本组：逐个上传 ==========
        for file in &text_files {
            match self
                .transport
                .upload(TXT_IMPORT_ENDPOINT, TXT_FIELD, std::slice::from_ref(file))
                .await
            {
                Ok(response) => {
                    imported.extend(response.imported);
                    errors.extend(response.errors);
                }
                Err(e) => {
                    warn!("TXT 上传失败 {}: {}", file.name(), e);
                    let message = e.server_message().unwrap_or(TXT_DEFAULT_ERROR);
                    errors.push(FileErrorEntry::new(file.name(), message));
                }
            }
        }

        // ========== XML 组：一次性上传 ==========
        if !xml_files.is_empty() {
            match self
                .transport
                .upload(XML_IMPORT_ENDPOINT, XML_FIELD, &xml_files)
                .await
            {
                Ok(response) => {
                    imported.extend(response.imported);
                    errors.extend(response.errors);
                }
                Err(e) => {
                    warn!("XML 批量上传失败 ({} 个文件): {}", xml_files.len(), e);
                    let message = e.server_message().unwrap_or(XML_DEFAULT_ERROR);
                    errors.extend(
                        xml_files
                            .iter()
                            .map(|file| FileErrorEntry::new(file.name(), message)),
                    );
                }
            }
        }

        SubmissionResult::from_parts(imported, errors)
    }
}
