//! 摘要写出服务 - 业务能力层
//!
//! 只负责"把摘要写成文件"能力，不关心流程

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 摘要写出服务
///
/// 职责：
/// - 将完成的摘要写入 `<原文件名>_summary.txt`
/// - 只处理单个摘要
pub struct SummaryWriter {
    output_folder: String,
}

impl SummaryWriter {
    /// 创建新的摘要写出服务
    pub fn new(config: &Config) -> Self {
        Self {
            output_folder: config.summary_folder.clone(),
        }
    }

    /// 使用自定义输出目录创建
    pub fn with_folder(folder: impl Into<String>) -> Self {
        Self {
            output_folder: folder.into(),
        }
    }

    /// 写出摘要文件
    ///
    /// # 参数
    /// - `file_name`: 原文件名（扩展名会被去掉）
    /// - `summary`: 摘要内容
    ///
    /// # 返回
    /// 返回写出的文件路径
    pub async fn write(&self, file_name: &str, summary: &str) -> Result<PathBuf> {
        let stem = Path::new(file_name)
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let output_path = PathBuf::from(&self.output_folder).join(format!("{}_summary.txt", stem));

        debug!(
            "写出摘要: {} | 摘要长度: {}",
            output_path.display(),
            summary.chars().count()
        );

        fs::create_dir_all(&self.output_folder)
            .await
            .with_context(|| format!("无法创建摘要目录: {}", self.output_folder))?;

        fs::write(&output_path, summary)
            .await
            .with_context(|| format!("无法写入摘要文件: {}", output_path.display()))?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SummaryWriter::with_folder(dir.path().to_str().unwrap());

        let path = writer.write("report.pdf", "这是摘要内容").await.unwrap();
        assert!(path.ends_with("report_summary.txt"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "这是摘要内容");
    }

    #[tokio::test]
    async fn test_write_creates_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("nested");
        let writer = SummaryWriter::with_folder(nested.to_str().unwrap());

        let path = writer.write("notes.txt", "summary").await.unwrap();
        assert!(path.exists());
    }
}
