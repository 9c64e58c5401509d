use crate::models::file_entry::UploadFile;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 根据扩展名推断 MIME 类型
///
/// 未知扩展名返回 application/octet-stream，由后续校验拦下
fn guess_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// 从磁盘读取单个文件并转换为 UploadFile 对象
pub async fn load_upload_file(file_path: &Path) -> Result<UploadFile> {
    let content = fs::read(file_path)
        .await
        .with_context(|| format!("无法读取文件: {}", file_path.display()))?;

    let name = file_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(UploadFile::new(name, guess_mime_type(file_path), content))
}

/// 从文件夹中加载所有候选文件（PDF / TXT）并转换为 UploadFile 对象列表
pub async fn load_upload_files(folder_path: &str) -> Result<Vec<UploadFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if matches!(ext.as_deref(), Some("pdf") | Some("txt")) {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_upload_file(&path).await {
                Ok(file) => {
                    tracing::info!("成功加载 {} ({} 字节)", file.name, file.size);
                    files.push(file);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_upload_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello world").unwrap();

        let file = load_upload_file(&path).await.unwrap();
        assert_eq!(file.name, "notes.txt");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.size, 11);
        assert_eq!(file.content, b"hello world");
    }

    #[tokio::test]
    async fn test_load_upload_files_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"aaa").unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF-1.4").unwrap();
        std::fs::write(dir.path().join("c.docx"), b"nope").unwrap();

        let files = load_upload_files(dir.path().to_str().unwrap()).await.unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.name.ends_with(".txt") || f.name.ends_with(".pdf")));
    }

    #[tokio::test]
    async fn test_load_upload_files_missing_folder() {
        let result = load_upload_files("no_such_folder_here").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type(Path::new("a.pdf")), "application/pdf");
        assert_eq!(guess_mime_type(Path::new("a.PDF")), "application/pdf");
        assert_eq!(guess_mime_type(Path::new("a.txt")), "text/plain");
        assert_eq!(
            guess_mime_type(Path::new("a.docx")),
            "application/octet-stream"
        );
    }
}
