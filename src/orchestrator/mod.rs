//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次导入运行的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量导入处理器
//! - 管理应用生命周期（初始化、运行、报告）
//! - 加载输入目录
//! - 把 XML / ZIP 交给导入队列，把接受的文件交给提交协调器
//! - 输出全局统计信息
//!
//! ### `submission_coordinator` - 提交协调器
//! - 按扩展名分组
//! - TXT 逐个上传，XML 整批上传
//! - 合并各次调用的结果
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (整次运行)
//!     ↓
//! workflow::IngestionQueue (工作集 + 逐个解析)      submission_coordinator (分组上传)
//!     ↓                                                ↓
//! services (能力层：解压 / 解析 / 通知)             infrastructure (上传通道)
//! ```

pub mod batch_processor;
pub mod submission_coordinator;

// 重新导出主要类型
pub use batch_processor::App;
pub use submission_coordinator::{partition, Partition, SubmissionCoordinator};
