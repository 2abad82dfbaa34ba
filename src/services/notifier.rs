//! 通知服务 - 业务能力层
//!
//! 只负责"告诉用户发生了什么"，不关心流程。
//! 在界面里这对应非阻塞的提示条；批处理运行时写入日志和通知文件。

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::{debug, error, info, warn};

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    fn tag(self) -> &'static str {
        match self {
            NoticeLevel::Success => "SUCCESS",
            NoticeLevel::Warning => "WARN",
            NoticeLevel::Error => "ERROR",
        }
    }
}

/// 通知接收方
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }

    fn warn(&self, message: &str) {
        self.notify(NoticeLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// 通知写入服务
///
/// 职责：
/// - 把通知输出到日志
/// - 配置了文件路径时追加写入通知文件
/// - 写文件失败不影响调用方
pub struct NoticeWriter {
    notice_file_path: Option<String>,
}

impl NoticeWriter {
    /// 只输出到日志
    pub fn new() -> Self {
        Self {
            notice_file_path: None,
        }
    }

    /// 同时追加到指定文件
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            notice_file_path: Some(path.into()),
        }
    }

    fn append(&self, path: &str, level: NoticeLevel, message: &str) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        let line = format!(
            "{} [{}] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.tag(),
            message
        );

        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

impl Default for NoticeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NoticeWriter {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => info!("✅ {}", message),
            NoticeLevel::Warning => warn!("⚠️ {}", message),
            NoticeLevel::Error => error!("❌ {}", message),
        }

        if let Some(path) = &self.notice_file_path {
            if let Err(e) = self.append(path, level, message) {
                debug!("写入通知文件失败 ({}): {}", path, e);
            }
        }
    }
}

/// 测试用：记录所有通知
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    notices: std::sync::Mutex<Vec<(NoticeLevel, String)>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub(crate) fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warn.txt");
        let writer = NoticeWriter::with_path(path.to_string_lossy());

        writer.warn("factura-1.xml no es una factura válida");
        writer.error("factura-2.xml: XML标签未闭合");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[WARN] factura-1.xml"));
        assert!(lines[1].contains("[ERROR] factura-2.xml"));
    }

    #[test]
    fn test_unwritable_notice_file_is_ignored() {
        let writer = NoticeWriter::with_path("/definitely/not/a/dir/warn.txt");
        writer.success("sin efecto");
    }

    #[test]
    fn test_default_methods_route_levels() {
        let recorder = RecordingNotifier::default();
        recorder.success("a");
        recorder.warn("b");
        recorder.error("c");
        assert_eq!(
            recorder.notices(),
            vec![
                (NoticeLevel::Success, "a".to_string()),
                (NoticeLevel::Warning, "b".to_string()),
                (NoticeLevel::Error, "c".to_string()),
            ]
        );
    }
}
