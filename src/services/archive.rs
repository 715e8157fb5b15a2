//! 收据归档服务 - 业务能力层
//!
//! 只负责"把收据PDF打包成ZIP"能力，每次运行结束时调用一次

use crate::error::{AppError, ArchiveError};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// 收据归档服务
///
/// 职责：
/// - 收集收据目录中的全部PDF文件（截图等其他文件被排除）
/// - 打包成单个压缩文件
/// - 目录为空或不存在时只告警，不算失败
pub struct ReceiptArchiver {
    archive_path: String,
}

impl ReceiptArchiver {
    /// 创建新的归档服务
    pub fn new(archive_path: impl Into<String>) -> Self {
        Self {
            archive_path: archive_path.into(),
        }
    }

    /// 把收据目录中的全部PDF打包成压缩文件
    ///
    /// # 返回
    /// 生成了压缩文件时返回其路径，无可归档内容时返回 None
    pub fn build(&self, receipts_dir: &str) -> Result<Option<PathBuf>> {
        let dir = Path::new(receipts_dir);
        if !dir.is_dir() {
            warn!("⚠️ 收据目录不存在，无可归档内容: {}", receipts_dir);
            return Ok(None);
        }

        let pdf_paths = collect_pdf_paths(dir)?;
        if pdf_paths.is_empty() {
            warn!("⚠️ 收据目录中没有PDF文件，跳过归档: {}", receipts_dir);
            return Ok(None);
        }

        info!("📦 正在归档 {} 个收据PDF...", pdf_paths.len());

        let out_file = File::create(&self.archive_path).map_err(|e| {
            AppError::Archive(ArchiveError::WriteFailed {
                path: self.archive_path.clone(),
                source: Box::new(e),
            })
        })?;
        let mut zip_writer = ZipWriter::new(out_file);
        let opts = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for path in &pdf_paths {
            let entry_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .context("PDF文件名异常")?;
            let data = fs::read(path)
                .with_context(|| format!("无法读取收据PDF: {}", path.display()))?;

            zip_writer.start_file(entry_name.as_str(), opts)?;
            zip_writer.write_all(&data)?;
        }

        zip_writer.finish()?;
        info!("✓ 压缩包已生成: {}", self.archive_path);

        Ok(Some(PathBuf::from(&self.archive_path)))
    }
}

/// 收集目录下的全部PDF路径，按文件名排序保证归档顺序稳定
fn collect_pdf_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        AppError::Archive(ArchiveError::ReadDirFailed {
            path: dir.display().to_string(),
            source: Box::new(e),
        })
    })?;

    let mut pdf_paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("读取目录项失败: {}", dir.display()))?
            .path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if path.is_file() && is_pdf {
            pdf_paths.push(path);
        }
    }
    pdf_paths.sort();

    Ok(pdf_paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_build_archives_only_pdf_files() {
        let dir = tempfile::tempdir().expect("创建临时目录");
        fs::write(dir.path().join("order_1.pdf"), b"%PDF-1.5 fake").unwrap();
        fs::write(dir.path().join("order_2.pdf"), b"%PDF-1.5 fake").unwrap();
        fs::write(dir.path().join("1.png"), b"not a pdf").unwrap();
        fs::write(dir.path().join("notes.txt"), b"stray file").unwrap();

        let archive_path = dir.path().join("receipts.zip");
        let archiver = ReceiptArchiver::new(archive_path.to_str().unwrap());
        let result = archiver
            .build(dir.path().to_str().unwrap())
            .expect("归档成功");
        assert!(result.is_some());

        let file = File::open(&archive_path).expect("打开压缩包");
        let mut archive = zip::ZipArchive::new(file).expect("读取压缩包");
        let names: HashSet<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains("order_1.pdf"));
        assert!(names.contains("order_2.pdf"));
    }

    #[test]
    fn test_build_empty_dir_is_noop() {
        let dir = tempfile::tempdir().expect("创建临时目录");
        let archive_path = dir.path().join("receipts.zip");
        let archiver = ReceiptArchiver::new(archive_path.to_str().unwrap());

        let result = archiver
            .build(dir.path().to_str().unwrap())
            .expect("空目录不算失败");
        assert!(result.is_none());
        assert!(!archive_path.exists());
    }

    #[test]
    fn test_build_missing_dir_is_noop() {
        let dir = tempfile::tempdir().expect("创建临时目录");
        let archiver = ReceiptArchiver::new(dir.path().join("receipts.zip").to_str().unwrap());

        let result = archiver
            .build(dir.path().join("no_such_dir").to_str().unwrap())
            .expect("目录不存在不算失败");
        assert!(result.is_none());
    }

    #[test]
    fn test_build_case_insensitive_pdf_extension() {
        let dir = tempfile::tempdir().expect("创建临时目录");
        fs::write(dir.path().join("order_9.PDF"), b"%PDF-1.5 fake").unwrap();

        let archive_path = dir.path().join("receipts.zip");
        let archiver = ReceiptArchiver::new(archive_path.to_str().unwrap());
        let result = archiver
            .build(dir.path().to_str().unwrap())
            .expect("归档成功");
        assert!(result.is_some());
    }
}
