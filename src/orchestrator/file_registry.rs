//! 文件列表 - 编排层
//!
//! ## 职责
//!
//! 本模块维护被跟踪文件的有序列表（最多 3 个），是唯一持有条目状态的地方。
//!
//! ## 核心功能
//!
//! 1. **容量控制**：列表满时拒绝新增，绝不挤掉已有条目
//! 2. **状态机约束**：所有状态变更走 `apply`，非法转换记日志后忽略
//! 3. **迟到事件**：id 找不到对应条目的事件直接丢弃
//!    （条目可能已被用户移除，移除不会中断在途请求）
//! 4. **不变量**：summary 当且仅当 Completed 存在；error 当且仅当 Error 存在

use crate::error::{AppError, ValidationError};
use crate::models::file_entry::{FileEntry, FileEvent, FileStatus, UploadFile};
use crate::services::FileValidator;
use crate::utils::logging::format_file_size;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// 文件列表
pub struct FileRegistry {
    max_files: usize,
    entries: Mutex<Vec<FileEntry>>,
}

impl FileRegistry {
    /// 创建新的文件列表
    pub fn new(max_files: usize) -> Self {
        Self {
            max_files,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// 新增文件条目
    ///
    /// 列表满或文件类型/文件名不合法时拒绝
    ///
    /// # 返回
    /// 返回分配的条目 ID
    pub async fn add_file(&self, file: UploadFile) -> Result<String, AppError> {
        let mut entries = self.entries.lock().await;

        if entries.len() >= self.max_files {
            return Err(AppError::Validation(ValidationError::RegistryFull {
                max_files: self.max_files,
            }));
        }

        if !FileValidator::is_allowed_type(&file.name, &file.mime_type) {
            return Err(AppError::Validation(ValidationError::UnsupportedType {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            }));
        }

        if !FileValidator::is_safe_name(&file.name) {
            return Err(AppError::Validation(ValidationError::SuspiciousFileName {
                name: file.name.clone(),
            }));
        }

        let entry = FileEntry::new(file);
        let id = entry.id.clone();
        info!(
            "✓ 已添加文件: {} ({}) (ID: {})",
            entry.file.name,
            format_file_size(entry.file.size),
            id
        );
        entries.push(entry);

        Ok(id)
    }

    /// 移除文件条目（任何状态都可以移除）
    ///
    /// 移除不会中断该条目在途的上传请求，
    /// 之后到达的事件会因为找不到 id 而被丢弃
    pub async fn remove_file(&self, id: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() < before;

        if removed {
            info!("🗑️ 已移除文件条目 (ID: {})", id);
        } else {
            warn!("⚠️ 要移除的条目不存在 (ID: {})", id);
        }

        removed
    }

    /// 按 ID 查找条目（克隆）
    pub async fn get(&self, id: &str) -> Option<FileEntry> {
        self.entries.lock().await.iter().find(|e| e.id == id).cloned()
    }

    /// 当前所有条目的快照
    pub async fn snapshot(&self) -> Vec<FileEntry> {
        self.entries.lock().await.clone()
    }

    /// 当前条目数量
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// 列表是否为空
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// 处于指定状态的条目：(id, 序号, 文件)
    ///
    /// 序号从 1 开始，仅用于日志显示
    pub async fn files_with_status(&self, status: FileStatus) -> Vec<(String, usize, UploadFile)> {
        self.entries
            .lock()
            .await
            .iter()
            .enumerate()
            .filter(|(_, e)| e.status == status)
            .map(|(i, e)| (e.id.clone(), i + 1, e.file.clone()))
            .collect()
    }

    /// 应用一条状态变更事件
    ///
    /// 每条事件只触碰自己 id 对应的条目，锁内不做任何 IO
    pub async fn apply(&self, event: FileEvent) {
        let mut entries = self.entries.lock().await;

        match event {
            FileEvent::StatusChanged { id, status, error } => {
                let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
                    // 迟到的响应：条目已被移除，丢弃
                    debug!("丢弃迟到事件 (ID: {}, 状态: {:?})", id, status);
                    return;
                };

                if !entry.status.can_transition_to(status) {
                    warn!(
                        "⚠️ 忽略非法状态转换: {:?} → {:?} (文件: {})",
                        entry.status, status, entry.file.name
                    );
                    return;
                }

                entry.status = status;
                entry.error = if status == FileStatus::Error {
                    // Error 状态必须带错误信息
                    error.or_else(|| Some("🚨 上传失败，请重试。".to_string()))
                } else {
                    None
                };

                debug!("文件 {} 状态 → {:?}", entry.file.name, status);
            }
            FileEvent::SummarySet { id, summary } => {
                let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
                    debug!("丢弃迟到摘要 (ID: {})", id);
                    return;
                };

                if entry.status != FileStatus::Processing {
                    warn!(
                        "⚠️ 忽略非 Processing 状态下的摘要 (文件: {}, 状态: {:?})",
                        entry.file.name, entry.status
                    );
                    return;
                }

                entry.status = FileStatus::Completed;
                entry.summary = Some(summary);
                entry.error = None;
            }
        }
    }
}
