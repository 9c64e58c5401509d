//! # Upload File Summarize
//!
//! 一个把本地文件提交给 AI 摘要 Webhook 并跟踪其处理状态的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 文件条目、生命周期状态、状态变更事件
//! - `models/loaders/` - 从磁盘加载待上传文件
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文件
//! - `response_classifier` - 响应归类能力（确认 / 内联摘要 / 纯文本 / 无法识别）
//! - `FileValidator` - 本地校验能力
//! - `SummaryWriter` - 摘要落盘能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整上传流程
//! - `UploadCtx` - 上下文封装（file_id + file_name）
//! - `UploadFlow` - 流程编排（校验 → 上传 → 归类 → 状态机）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/file_registry` - 文件列表，状态机约束的唯一执行点
//! - `orchestrator/upload_manager` - 应用入口，条目操作和并发上传
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::WebhookClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{FileEntry, FileEvent, FileStatus, UploadFile};
pub use orchestrator::{App, FileRegistry, ProcessingStats};
pub use services::{classify, Classification};
pub use workflow::{UploadCtx, UploadFlow, UploadOutcome};
