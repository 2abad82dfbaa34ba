//! 日志工具模块
//!
//! 提供日志初始化和批处理进度输出的辅助函数

use anyhow::{Context, Result};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{QueueSnapshot, SubmissionResult};

/// 初始化全局日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info 级别。
/// 重复调用是安全的。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n发票导入日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `input_folder`: 输入目录
/// - `api_base_url`: 后端地址
pub fn log_startup(input_folder: &str, api_base_url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 发票批量导入模式");
    info!("📁 输入目录: {}", input_folder);
    info!("🌐 后端地址: {}", api_base_url);
    info!("{}", "=".repeat(60));
}

/// 记录文件加载信息
///
/// # 参数
/// - `invoices`: 需要解析的文件数（XML / ZIP）
/// - `text_reports`: 直接上传的 TXT 文件数
pub fn log_files_loaded(invoices: usize, text_reports: usize) {
    info!("✓ 找到 {} 个 XML/ZIP 文件, {} 个 TXT 文件", invoices, text_reports);
}

/// 输出预览表
///
/// # 参数
/// - `snapshot`: 解析完成后的队列快照
pub fn log_preview(snapshot: &QueueSnapshot) {
    info!("\n{}", "─".repeat(60));
    info!("🧾 预览 ({} 个文件)", snapshot.items.len());
    info!("{}", "─".repeat(60));
    for (index, item) in snapshot.items.iter().enumerate() {
        match (item.record(), item.reason()) {
            (Some(record), _) => info!("{:>3}. ✅ {}", index + 1, record),
            (None, Some(reason)) => info!(
                "{:>3}. ❌ {} ({})",
                index + 1,
                item.name,
                truncate_text(reason, 60)
            ),
            (None, None) => info!("{:>3}. ⏳ {}", index + 1, item.name),
        }
    }
    info!("{}", "─".repeat(60));
}

/// 输出上传结果
///
/// # 参数
/// - `result`: 上传汇总结果
pub fn log_submission(result: &SubmissionResult) {
    info!("\n{}", "─".repeat(60));
    if result.success {
        info!("✓ 上传完成: 导入 {} 条记录", result.imported.len());
    } else {
        info!(
            "⚠️ 上传部分失败: 导入 {} 条记录, {} 个文件失败",
            result.imported.len(),
            result.errors.len()
        );
        for entry in &result.errors {
            info!("   ❌ {}: {}", entry.file, entry.error);
        }
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `valid`: 有效文件数
/// - `invalid`: 无效文件数
/// - `total`: 总数
/// - `report_file_path`: 报告文件路径
pub fn print_final_stats(valid: usize, invalid: usize, total: usize, report_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 有效: {}/{}", valid, total);
    info!("❌ 无效: {}", invalid);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("factura", 10), "factura");
        assert_eq!(truncate_text("无法展开压缩包", 4), "无法展开...");
    }

    #[test]
    fn test_init_log_file_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");

        init_log_file(path.to_str().unwrap()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("发票导入日志"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }
}
