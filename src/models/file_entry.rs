use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户选中的文件
///
/// 一旦加入文件列表便不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFile {
    /// 文件名
    pub name: String,
    /// MIME 类型
    pub mime_type: String,
    /// 文件大小（字节）
    pub size: u64,
    /// 文件二进制内容
    #[serde(skip_serializing, skip_deserializing)]
    pub content: Vec<u8>,
}

impl UploadFile {
    /// 创建新的上传文件
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: content.len() as u64,
            content,
        }
    }
}

/// 文件生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// 等待上传
    Pending,
    /// 上传中
    Uploading,
    /// 已上传（Webhook 已确认收到）
    Uploaded,
    /// 等待 AI 生成摘要
    Processing,
    /// 摘要已生成（终态）
    Completed,
    /// 上传失败（可通过重试恢复）
    Error,
}

impl FileStatus {
    /// 判断状态转换是否合法
    ///
    /// 一次上传尝试内的状态单调递进，唯一的回退是重试从 Error 回到 Uploading。
    /// Completed 是终态；SummarySet 事件负责 Processing → Completed 这一步，
    /// 所以这里的 Processing → Completed 只会由它触发。
    pub fn can_transition_to(self, next: FileStatus) -> bool {
        use FileStatus::*;
        matches!(
            (self, next),
            (Pending, Uploading)
                | (Uploading, Uploaded)
                | (Uploaded, Processing)
                | (Processing, Completed)
                | (Pending, Error)
                | (Uploading, Error)
                | (Error, Error)
                | (Error, Uploading)
        )
    }

    /// 是否处于上传流程中（不可再次触发上传）
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            FileStatus::Uploading | FileStatus::Uploaded | FileStatus::Processing
        )
    }

    /// 状态的用户可见描述
    pub fn description(self) -> &'static str {
        match self {
            FileStatus::Pending => "等待上传",
            FileStatus::Uploading => "上传中...",
            FileStatus::Uploaded => "文件已上传",
            FileStatus::Processing => "等待 AI 生成摘要",
            FileStatus::Completed => "摘要已生成",
            FileStatus::Error => "上传失败",
        }
    }

    /// 进度百分比（用于进度条展示）
    pub fn progress_percent(self) -> u8 {
        match self {
            FileStatus::Pending => 0,
            FileStatus::Uploading => 25,
            FileStatus::Uploaded => 50,
            FileStatus::Processing => 75,
            FileStatus::Completed => 100,
            FileStatus::Error => 0,
        }
    }
}

/// 文件状态变更事件
///
/// 所有对文件条目的修改都通过事件进入 FileRegistry，
/// 事件中的 id 对应不到条目时直接丢弃（条目可能已被用户移除）
#[derive(Debug, Clone)]
pub enum FileEvent {
    /// 状态变更
    StatusChanged {
        id: String,
        status: FileStatus,
        error: Option<String>,
    },
    /// 摘要就绪（驱动 Processing → Completed）
    SummarySet { id: String, summary: String },
}

/// 文件条目
///
/// 一个被跟踪的文件及其上传/处理生命周期状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// 唯一标识，注册时分配，之后不变
    pub id: String,
    /// 底层文件
    pub file: UploadFile,
    /// 当前状态
    pub status: FileStatus,
    /// 错误信息，仅在 status == Error 时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 最终摘要，仅在 status == Completed 时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl FileEntry {
    /// 创建新的文件条目（初始状态 Pending）
    pub fn new(file: UploadFile) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file,
            status: FileStatus::Pending,
            error: None,
            summary: None,
        }
    }
}
