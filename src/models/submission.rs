use serde::{Deserialize, Serialize};

/// 单个文件的导入错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileErrorEntry {
    pub file: String,
    pub error: String,
}

impl FileErrorEntry {
    pub fn new(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            error: error.into(),
        }
    }
}

/// 导入接口的响应体 `{imported, errors}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    /// 后端分配的记录 ID
    #[serde(default)]
    pub imported: Vec<i64>,
    #[serde(default)]
    pub errors: Vec<FileErrorEntry>,
}

/// 一次提交的汇总结果
///
/// 成功只体现为 ID 列表，后端不返回 ID 与文件名的对应关系；
/// 失败按文件名记录。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    /// 没有任何错误记录时为 true
    pub success: bool,
    pub imported: Vec<i64>,
    pub errors: Vec<FileErrorEntry>,
}

impl SubmissionResult {
    pub fn from_parts(imported: Vec<i64>, errors: Vec<FileErrorEntry>) -> Self {
        Self {
            success: errors.is_empty(),
            imported,
            errors,
        }
    }
}
