//! 批量导入处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整的导入运行。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：日志文件、通知文件、HTTP 上传通道
//! 2. **批量加载**：扫描输入目录中的 XML / ZIP / TXT 文件
//! 3. **解析预览**：XML / ZIP 交给导入队列逐个解析
//! 4. **提交上传**：有效发票的原始文件和 TXT 文件交给提交协调器
//! 5. **结果汇总**：写出 JSON 报告并输出统计
//!
//! TXT 文件是结构化的报表，不经过发票解析，直接进入上传。

use crate::config::Config;
use crate::error::FileError;
use crate::infrastructure::{HttpTransport, UploadTransport};
use crate::models::{load_input_files, BatchReport, RawFile};
use crate::orchestrator::submission_coordinator::{Partition, SubmissionCoordinator};
use crate::services::{NoticeWriter, Notifier};
use crate::utils::logging;
use crate::workflow::IngestionQueue;
use anyhow::{Context, Result};
use std::fs;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    queue: IngestionQueue,
    coordinator: SubmissionCoordinator,
    notifier: Arc<dyn Notifier>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config.input_folder, &config.api_base_url);

        let notifier: Arc<dyn Notifier> = Arc::new(NoticeWriter::with_path(&config.notice_file));
        let transport: Arc<dyn UploadTransport> = Arc::new(HttpTransport::new(&config)?);

        Ok(Self::with_parts(config, notifier, transport))
    }

    /// 使用指定的通知和上传通道组装应用
    pub fn with_parts(
        config: Config,
        notifier: Arc<dyn Notifier>,
        transport: Arc<dyn UploadTransport>,
    ) -> Self {
        Self {
            queue: IngestionQueue::new(notifier.clone()),
            coordinator: SubmissionCoordinator::new(transport),
            notifier,
            config,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<BatchReport> {
        info!("\n📁 正在扫描待导入的文件...");
        let all_files = load_input_files(&self.config.input_folder).await?;

        if all_files.is_empty() {
            warn!("⚠️ 没有找到待导入的文件，程序结束");
        }

        let (text_reports, invoices): (Vec<RawFile>, Vec<RawFile>) = all_files
            .into_iter()
            .partition(|file| Partition::of(file) == Partition::StructuredText);
        logging::log_files_loaded(invoices.len(), text_reports.len());

        // ========== 解析预览 ==========
        let snapshot = self.queue.submit_batch(invoices).await;
        logging::log_preview(&snapshot);

        // ========== 提交上传 ==========
        let mut accepted = text_reports.clone();
        accepted.extend(snapshot.records.iter().map(|record| record.raw.clone()));

        let submission = if !self.config.submit_enabled {
            info!("⏭️ 已关闭上传，跳过提交");
            None
        } else if accepted.is_empty() {
            info!("没有可上传的文件");
            None
        } else {
            let result = self.coordinator.submit(&accepted).await;
            logging::log_submission(&result);

            for entry in &result.errors {
                self.notifier
                    .error(&format!("{} 上传失败: {}", entry.file, entry.error));
            }
            if result.success {
                self.notifier
                    .success(&format!("成功导入 {} 条记录", result.imported.len()));
                // 上传成功后丢弃工作集
                self.queue.clear_all();
            }
            Some(result)
        };

        // ========== 结果汇总 ==========
        let report = BatchReport::new(&snapshot, text_reports.len(), submission);
        write_report(&self.config.report_file, &report)?;
        logging::print_final_stats(
            report.valid,
            report.invalid,
            report.total_files,
            &self.config.report_file,
        );

        Ok(report)
    }

    /// 导入队列（供调用方查看或订阅）
    pub fn queue(&self) -> &IngestionQueue {
        &self.queue
    }
}

fn write_report(path: &str, report: &BatchReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("无法序列化导入报告")?;
    fs::write(path, json).map_err(|source| FileError::WriteFailed {
        path: path.to_string(),
        source,
    })?;
    Ok(())
}
