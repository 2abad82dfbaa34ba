//! 原始文件句柄
//!
//! 用户拖入的每个文件（以及从 zip 中解出的每个条目）都是一个 `RawFile`。
//! 创建后不可变，内容用 `Arc` 共享，克隆成本很低。

use crate::error::FileError;
use std::path::Path;
use std::sync::Arc;

/// 原始文件（名称 + 字节内容）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    name: String,
    content: Arc<[u8]>,
}

impl RawFile {
    /// 用内存中的内容创建文件
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    /// 从磁盘读取文件，名称取文件名部分
    pub async fn from_path(path: &Path) -> Result<Self, FileError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| FileError::ReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 字节数
    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.content
    }

    /// 按 UTF-8 读取文本，非法字节替换为 U+FFFD
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// 扩展名（小写，取最后一个 `.` 之后的部分）
    pub fn extension(&self) -> Option<String> {
        let base = self.name.rsplit(['/', '\\']).next().unwrap_or(&self.name);
        base.rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// 扩展名是否匹配（忽略大小写）
    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension()
            .is_some_and(|own| own.eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(RawFile::new("report.TXT", "").extension().as_deref(), Some("txt"));
        assert!(RawFile::new("facturas.Zip", "").has_extension("zip"));
        assert!(RawFile::new("a.b.xml", "").has_extension("XML"));
    }

    #[test]
    fn test_extension_ignores_directories() {
        assert_eq!(RawFile::new("lote.2024/factura", "").extension(), None);
        assert_eq!(RawFile::new("README", "").extension(), None);
        assert_eq!(
            RawFile::new("lote.2024/factura.xml", "").extension().as_deref(),
            Some("xml")
        );
    }

    #[test]
    fn test_text_is_lossy() {
        let file = RawFile::new("bad.xml", vec![b'<', 0xff, b'>']);
        assert_eq!(file.size(), 3);
        assert_eq!(file.text(), "<\u{fffd}>");
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("001-factura.xml");
        std::fs::write(&path, "<factura/>").unwrap();

        let file = RawFile::from_path(&path).await.unwrap();
        assert_eq!(file.name(), "001-factura.xml");
        assert_eq!(file.text(), "<factura/>");
    }
}
