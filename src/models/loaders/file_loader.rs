use crate::error::FileError;
use crate::models::raw_file::RawFile;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs;

/// 可导入的文件类型
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["xml", "zip", "txt"];

/// 从文件夹中加载所有可导入的文件，按文件名排序
///
/// 单个文件读取失败只记录警告，不影响其他文件。
pub async fn load_input_files(folder_path: &str) -> Result<Vec<RawFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let supported = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            });
        if supported && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match RawFile::from_path(&path).await {
            Ok(file) => {
                tracing::debug!("已加载: {} ({} 字节)", file.name(), file.size());
                files.push(file);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(files)
}
