//! 导入队列 - 流程层
//!
//! 核心职责：维护当前工作集（每个文件一个 [`FilePreview`]），
//! 驱动解析器逐个处理文件，并把状态快照发布给界面。
//!
//! 流程顺序：
//! 1. 展开 zip（坏掉的压缩包变成一个无效项）
//! 2. 全部发布为 pending
//! 3. 按顺序逐个解析，每次状态变化后整体重新发布
//! 4. 发布最终状态和有效记录列表

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, ArchiveError};
use crate::models::{FilePreview, InvoiceRecord, PreviewStatus, QueueSnapshot, RawFile};
use crate::services::{archive_expander, invoice_parser, Notifier};

/// 展开后的待处理项
enum WorkItem {
    File(RawFile),
    /// 无法展开的压缩包
    BrokenArchive { archive: RawFile, error: ArchiveError },
}

impl WorkItem {
    /// 预览中代表该项的文件
    fn file(&self) -> &RawFile {
        match self {
            WorkItem::File(file) => file,
            WorkItem::BrokenArchive { archive, .. } => archive,
        }
    }
}

/// 导入队列
///
/// 工作集只由本结构修改，对外只发布完整快照。
pub struct IngestionQueue {
    items: Vec<FilePreview>,
    next_id: usize,
    publisher: watch::Sender<QueueSnapshot>,
    notifier: Arc<dyn Notifier>,
}

impl IngestionQueue {
    /// 创建新的导入队列
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        let (publisher, _) = watch::channel(QueueSnapshot::default());
        Self {
            items: Vec::new(),
            next_id: 0,
            publisher,
            notifier,
        }
    }

    /// 订阅快照更新
    pub fn subscribe(&self) -> watch::Receiver<QueueSnapshot> {
        self.publisher.subscribe()
    }

    /// 当前快照
    pub fn snapshot(&self) -> QueueSnapshot {
        self.publisher.borrow().clone()
    }

    pub fn items(&self) -> &[FilePreview] {
        &self.items
    }

    /// 当前有效记录，按队列顺序
    pub fn records(&self) -> Vec<InvoiceRecord> {
        self.items
            .iter()
            .filter_map(|item| item.record().cloned())
            .collect()
    }

    /// 处理一批文件，替换之前的工作集
    ///
    /// 单个文件失败不会中断整批。
    ///
    /// # 返回
    /// 最终快照
    pub async fn submit_batch(&mut self, inputs: Vec<RawFile>) -> QueueSnapshot {
        let work_items = self.flatten(inputs).await;

        let mut items = Vec::with_capacity(work_items.len());
        for work in &work_items {
            items.push(FilePreview::for_file(self.next_id, work.file()));
            self.next_id += 1;
        }
        self.items = items;
        self.publish();

        info!("📋 开始解析 {} 个文件", work_items.len());

        for (index, work) in work_items.into_iter().enumerate() {
            let status = self.process(work);
            self.items[index].status = status;
            self.publish();
            // 让订阅方有机会看到逐项更新
            tokio::task::yield_now().await;
        }

        let snapshot = self.publish();
        info!(
            "✓ 解析完成: 有效 {} / 无效 {} / 共 {}",
            snapshot.valid_count(),
            snapshot.invalid_count(),
            snapshot.items.len()
        );
        snapshot
    }

    /// 按位置移除一项，越界时不做任何改动
    pub fn remove_item(&mut self, index: usize) -> Option<FilePreview> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        debug!("移除文件: {}", removed.name);
        self.publish();
        Some(removed)
    }

    /// 清空工作集
    pub fn clear_all(&mut self) {
        self.items.clear();
        self.publish();
    }

    /// 展开压缩包，结果按输入顺序放在压缩包原来的位置
    async fn flatten(&self, inputs: Vec<RawFile>) -> Vec<WorkItem> {
        let mut work_items = Vec::with_capacity(inputs.len());

        for input in inputs {
            if !archive_expander::is_archive(&input) {
                work_items.push(WorkItem::File(input));
                continue;
            }

            match archive_expander::expand(&input).await {
                Ok(entries) => {
                    debug!("{} 展开得到 {} 个 XML", input.name(), entries.len());
                    work_items.extend(entries.into_iter().map(WorkItem::File));
                }
                Err(error) => work_items.push(WorkItem::BrokenArchive {
                    archive: input,
                    error,
                }),
            }
        }

        work_items
    }

    /// 处理单个文件，返回终态
    fn process(&self, work: WorkItem) -> PreviewStatus {
        let file = match work {
            WorkItem::File(file) => file,
            WorkItem::BrokenArchive { archive, error } => {
                let error = AppError::from(error);
                self.notifier
                    .error(&format!("无法展开压缩包 {}: {}", archive.name(), error));
                return PreviewStatus::Invalid {
                    reason: error.to_string(),
                };
            }
        };

        match read_and_parse(&file) {
            Ok(Some(record)) => {
                debug!("✓ {}", record);
                PreviewStatus::Valid(record)
            }
            Ok(None) => {
                self.notifier
                    .warn(&format!("{} 不是有效的发票 XML", file.name()));
                PreviewStatus::Invalid {
                    reason: "文档结构不符合发票格式".to_string(),
                }
            }
            Err(e) => {
                self.notifier
                    .error(&format!("处理 {} 时出错: {}", file.name(), e));
                PreviewStatus::Invalid {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// 整体替换并发布快照
    fn publish(&self) -> QueueSnapshot {
        let snapshot = QueueSnapshot::from_items(&self.items);
        self.publisher.send_replace(snapshot.clone());
        snapshot
    }
}

fn read_and_parse(file: &RawFile) -> AppResult<Option<InvoiceRecord>> {
    Ok(invoice_parser::parse_file(file)?)
}
