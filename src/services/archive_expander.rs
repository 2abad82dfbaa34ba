//! 压缩包展开服务 - 业务能力层
//!
//! 把 `.zip` 文件展开成其中的 `.xml` 条目，其他条目（目录、非 XML 文件）直接跳过。

use crate::error::ArchiveError;
use crate::models::RawFile;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// 是否应当作压缩包展开
pub fn is_archive(file: &RawFile) -> bool {
    file.has_extension("zip")
}

/// 展开压缩包
///
/// 解压在阻塞线程池中进行，不阻塞运行时。
/// 返回顺序与压缩包内条目顺序一致，调用方应只按名称区分。
///
/// # 参数
/// - `archive`: zip 文件
///
/// # 返回
/// 每个 `.xml` 条目对应一个 `RawFile`，名称为条目在压缩包内的路径
pub async fn expand(archive: &RawFile) -> Result<Vec<RawFile>, ArchiveError> {
    let archive = archive.clone();
    let name = archive.name().to_string();

    tokio::task::spawn_blocking(move || expand_blocking(&archive))
        .await
        .map_err(|source| ArchiveError::TaskFailed { name, source })?
}

fn expand_blocking(archive: &RawFile) -> Result<Vec<RawFile>, ArchiveError> {
    let decode_error = |source| ArchiveError::Decode {
        name: archive.name().to_string(),
        source,
    };

    let mut zip = ZipArchive::new(Cursor::new(archive.bytes())).map_err(decode_error)?;
    let mut entries = Vec::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(decode_error)?;
        let entry_name = entry.name().to_string();

        if entry.is_dir() || !is_xml_entry(&entry_name) {
            debug!("跳过压缩包条目: {} ({})", entry_name, archive.name());
            continue;
        }

        // 条目头部声明的大小不可信，不按它预分配
        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|source| ArchiveError::EntryRead {
                name: archive.name().to_string(),
                entry: entry_name.clone(),
                source,
            })?;

        entries.push(RawFile::new(entry_name, content));
    }

    debug!("压缩包 {} 展开得到 {} 个 XML", archive.name(), entries.len());
    Ok(entries)
}

fn is_xml_entry(path: &str) -> bool {
    !path.ends_with('/') && path.to_ascii_lowercase().ends_with(".xml")
}

/// 测试用：在内存中打包 zip
#[cfg(test)]
pub(crate) fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::{FileOptions, ZipWriter};

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    for (path, content) in entries {
        if path.ends_with('/') {
            writer.add_directory(*path, options).unwrap();
        } else {
            writer.start_file(*path, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// 测试用：打包单个条目，中央目录中声明的解压大小改为 `claimed_size`
///
/// 通过 zip64 扩展字段写入，真实内容不变。
#[cfg(test)]
pub(crate) fn build_zip_claiming_size(path: &str, content: &str, claimed_size: u64) -> Vec<u8> {
    const END_OF_DIRECTORY: [u8; 4] = [0x50, 0x4b, 0x05, 0x06];
    const ZIP64_EXTRA_LEN: usize = 12;

    let read_u32 = |bytes: &[u8], at: usize| {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    };
    let read_u16 = |bytes: &[u8], at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);

    let mut bytes = build_zip(&[(path, content)]);
    let end = bytes
        .windows(4)
        .rposition(|w| w == END_OF_DIRECTORY)
        .unwrap();
    let header = read_u32(&bytes, end + 16) as usize;

    // 0xFFFFFFFF 表示真实大小在 zip64 扩展字段里
    bytes[header + 24..header + 28].copy_from_slice(&u32::MAX.to_le_bytes());
    let name_len = read_u16(&bytes, header + 28) as usize;
    let extra_len = read_u16(&bytes, header + 30) + ZIP64_EXTRA_LEN as u16;
    bytes[header + 30..header + 32].copy_from_slice(&extra_len.to_le_bytes());

    let mut extra = Vec::with_capacity(ZIP64_EXTRA_LEN);
    extra.extend_from_slice(&1u16.to_le_bytes());
    extra.extend_from_slice(&8u16.to_le_bytes());
    extra.extend_from_slice(&claimed_size.to_le_bytes());
    let at = header + 46 + name_len;
    bytes.splice(at..at, extra);

    let end = end + ZIP64_EXTRA_LEN;
    let directory_size = read_u32(&bytes, end + 12) + ZIP64_EXTRA_LEN as u32;
    bytes[end + 12..end + 16].copy_from_slice(&directory_size.to_le_bytes());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expand_keeps_only_xml_entries() {
        let bytes = build_zip(&[
            ("enero/", ""),
            ("enero/001.xml", "<factura/>"),
            ("enero/leeme.txt", "no"),
            ("002.XML", "<factura/>"),
            ("logo.png", "png"),
            ("003.xml", "<factura><x/></factura>"),
        ]);
        let archive = RawFile::new("lote.zip", bytes);

        let files = expand(&archive).await.unwrap();
        let mut names: Vec<&str> = files.iter().map(|f| f.name()).collect();
        names.sort();
        assert_eq!(names, vec!["002.XML", "003.xml", "enero/001.xml"]);

        let third = files.iter().find(|f| f.name() == "003.xml").unwrap();
        assert_eq!(third.text(), "<factura><x/></factura>");
    }

    #[tokio::test]
    async fn test_expand_ignores_declared_entry_size() {
        let bytes = build_zip_claiming_size("grande.xml", "<factura/>", 1 << 40);
        let archive = RawFile::new("lote.zip", bytes);

        let files = expand(&archive).await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "grande.xml");
        assert_eq!(files[0].text(), "<factura/>");
    }

    #[tokio::test]
    async fn test_expand_empty_archive() {
        let archive = RawFile::new("vacio.zip", build_zip(&[]));
        assert!(expand(&archive).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expand_rejects_non_zip_data() {
        let archive = RawFile::new("falso.zip", b"esto no es un zip".to_vec());
        let err = expand(&archive).await.unwrap_err();
        assert!(matches!(err, ArchiveError::Decode { .. }));
        assert!(err.to_string().contains("falso.zip"));
    }

    #[tokio::test]
    async fn test_expand_does_not_touch_input() {
        let bytes = build_zip(&[("a.xml", "<a/>")]);
        let archive = RawFile::new("a.zip", bytes.clone());
        expand(&archive).await.unwrap();
        assert_eq!(archive.bytes(), bytes.as_slice());
    }

    #[test]
    fn test_is_archive() {
        assert!(is_archive(&RawFile::new("Lote.ZIP", "")));
        assert!(!is_archive(&RawFile::new("factura.xml", "")));
    }
}
