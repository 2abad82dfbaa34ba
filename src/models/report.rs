//! 导入报告
//!
//! 每次运行结束后写出的 JSON 报告，代替界面上的预览表格。

use crate::models::invoice::InvoiceRecord;
use crate::models::preview::QueueSnapshot;
use crate::models::submission::SubmissionResult;
use serde::Serialize;

/// 单个文件的状态行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub name: String,
    pub size: usize,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// 一次运行的完整报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub total_files: usize,
    pub valid: usize,
    pub invalid: usize,
    /// 直接上传、不经过解析的 TXT 文件数
    pub text_reports: usize,
    pub items: Vec<ItemReport>,
    pub records: Vec<InvoiceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionResult>,
}

impl BatchReport {
    pub fn new(
        snapshot: &QueueSnapshot,
        text_reports: usize,
        submission: Option<SubmissionResult>,
    ) -> Self {
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            total_files: snapshot.items.len() + text_reports,
            valid: snapshot.valid_count(),
            invalid: snapshot.invalid_count(),
            text_reports,
            items: snapshot
                .items
                .iter()
                .map(|item| ItemReport {
                    name: item.name.clone(),
                    size: item.size,
                    status: item.status.label().to_string(),
                    reason: item.reason().map(str::to_string),
                })
                .collect(),
            records: snapshot.records.clone(),
            submission,
        }
    }

    /// 没有无效文件，且上传（如果执行了）全部成功
    pub fn is_clean(&self) -> bool {
        self.invalid == 0 && self.submission.as_ref().map_or(true, |s| s.success)
    }
}
