//! # Invoice Ingest
//!
//! 电子发票（XML / ZIP）批量导入与对账上传
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端），只暴露能力
//! - `UploadTransport` - 上传通道接口，由调用方注入
//! - `HttpTransport` - 基于 reqwest 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文件
//! - `archive_expander` - 展开 zip 中的 XML
//! - `invoice_parser` - 把 XML 变成发票记录
//! - `Notifier` - 通知用户
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一批文件"的解析流程
//! - `IngestionQueue` - 工作集、状态流转、快照发布
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/submission_coordinator` - 分组上传并合并结果
//! - `orchestrator/batch_processor` - 整次运行：加载 → 解析 → 上传 → 报告
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{HttpTransport, UploadTransport};
pub use models::{FilePreview, InvoiceRecord, PreviewStatus, QueueSnapshot, RawFile, SubmissionResult};
pub use orchestrator::{App, SubmissionCoordinator};
pub use services::{NoticeWriter, Notifier};
pub use workflow::IngestionQueue;
