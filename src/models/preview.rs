//! 文件预览状态
//!
//! 每个待处理文件在队列中对应一个 [`FilePreview`]，
//! 状态只会从 `Pending` 变为 `Valid` 或 `Invalid` 一次。

use crate::models::invoice::InvoiceRecord;
use crate::models::raw_file::RawFile;

/// 预览状态
///
/// 解析结果放在 `Valid` 变体里，保证"有记录 ⇔ 有效"。
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewStatus {
    /// 等待解析
    Pending,
    /// 解析成功
    Valid(InvoiceRecord),
    /// 无效文件
    Invalid { reason: String },
}

impl PreviewStatus {
    /// 用于日志和报告的状态名
    pub fn label(&self) -> &'static str {
        match self {
            PreviewStatus::Pending => "pending",
            PreviewStatus::Valid(_) => "valid",
            PreviewStatus::Invalid { .. } => "invalid",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PreviewStatus::Pending)
    }
}

/// 队列中的单个文件
#[derive(Debug, Clone, PartialEq)]
pub struct FilePreview {
    /// 批次内稳定的编号
    pub id: usize,
    pub name: String,
    pub size: usize,
    pub status: PreviewStatus,
}

impl FilePreview {
    /// 创建待处理项
    pub fn pending(id: usize, name: impl Into<String>, size: usize) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            status: PreviewStatus::Pending,
        }
    }

    /// 从文件创建待处理项
    pub fn for_file(id: usize, file: &RawFile) -> Self {
        Self::pending(id, file.name(), file.size())
    }

    /// 解析出的记录（仅有效项有）
    pub fn record(&self) -> Option<&InvoiceRecord> {
        match &self.status {
            PreviewStatus::Valid(record) => Some(record),
            _ => None,
        }
    }

    /// 无效原因
    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            PreviewStatus::Invalid { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.record().is_some()
    }
}

/// 队列对外发布的完整快照
///
/// 每次发布都是整体替换，消费方不会读到一半更新的列表。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueSnapshot {
    pub items: Vec<FilePreview>,
    /// 有效记录，按队列顺序
    pub records: Vec<InvoiceRecord>,
}

impl QueueSnapshot {
    pub fn from_items(items: &[FilePreview]) -> Self {
        Self {
            items: items.to_vec(),
            records: items
                .iter()
                .filter_map(|item| item.record().cloned())
                .collect(),
        }
    }

    pub fn valid_count(&self) -> usize {
        self.records.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.items.iter().filter(|item| item.reason().is_some()).count()
    }

    pub fn pending_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !item.status.is_terminal())
            .count()
    }

    /// 各项状态名，按队列顺序
    pub fn statuses(&self) -> Vec<&'static str> {
        self.items.iter().map(|item| item.status.label()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> InvoiceRecord {
        InvoiceRecord {
            access_key: format!("KEY-{}", name),
            issue_date: String::new(),
            issuer_name: String::new(),
            buyer_name: String::new(),
            total_amount: 0.0,
            source_filename: name.to_string(),
            raw: RawFile::new(name, ""),
        }
    }

    #[test]
    fn test_snapshot_derives_records_in_order() {
        let mut a = FilePreview::pending(0, "a.xml", 10);
        let mut b = FilePreview::pending(1, "b.xml", 10);
        let c = FilePreview::pending(2, "c.xml", 10);
        let mut d = FilePreview::pending(3, "d.xml", 10);
        a.status = PreviewStatus::Valid(record("a.xml"));
        b.status = PreviewStatus::Invalid {
            reason: "broken".to_string(),
        };
        d.status = PreviewStatus::Valid(record("d.xml"));

        let snapshot = QueueSnapshot::from_items(&[a, b, c, d]);
        assert_eq!(snapshot.statuses(), vec!["valid", "invalid", "pending", "valid"]);
        assert_eq!(snapshot.valid_count(), 2);
        assert_eq!(snapshot.invalid_count(), 1);
        assert_eq!(snapshot.pending_count(), 1);
        assert_eq!(snapshot.records[0].source_filename, "a.xml");
        assert_eq!(snapshot.records[1].source_filename, "d.xml");
    }

    #[test]
    fn test_record_only_when_valid() {
        let mut item = FilePreview::pending(0, "a.xml", 1);
        assert!(item.record().is_none());
        item.status = PreviewStatus::Invalid {
            reason: "x".to_string(),
        };
        assert!(item.record().is_none());
        assert_eq!(item.reason(), Some("x"));
        item.status = PreviewStatus::Valid(record("a.xml"));
        assert!(item.is_valid());
        assert_eq!(item.reason(), None);
    }
}
