//! 上传处理上下文
//!
//! 封装"我正在上传第几个文件、它是谁"这一信息

use std::fmt::Display;

/// 上传处理上下文
///
/// 包含处理单个文件所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct UploadCtx {
    /// 文件条目 ID
    pub file_id: String,

    /// 文件在列表中的序号（从1开始，仅用于日志显示）
    pub file_index: usize,

    /// 文件名
    pub file_name: String,
}

impl UploadCtx {
    /// 创建新的上传上下文
    pub fn new(file_id: String, file_index: usize, file_name: String) -> Self {
        Self {
            file_id,
            file_index,
            file_name,
        }
    }
}

impl Display for UploadCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文件 ID#{} 名称#{}]",
            self.file_id, self.file_name
        )
    }
}
