//! 上传管理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，对外暴露文件列表的全部操作。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、创建文件列表和上传流程
//! 2. **条目操作**：添加 / 移除 / 重试 / 单个上传 / 批量上传
//! 3. **并发上传**："全部上传"时各文件作为独立挂起的请求并发执行，
//!    完成顺序不做任何保证，每个请求只更新自己 id 对应的条目
//! 4. **摘要落盘**：把完成的摘要写出到输出目录
//! 5. **全局统计**：汇总所有文件的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文件上传的细节
//! - **向下委托**：委托 UploadFlow 处理单个文件
//! - **无自动重试**：重试只能由用户显式发起

use crate::config::Config;
use crate::error::AppError;
use crate::models::file_entry::{FileStatus, UploadFile};
use crate::models::loaders::load_upload_files;
use crate::orchestrator::FileRegistry;
use crate::services::SummaryWriter;
use crate::utils::logging::{init_log_file, log_startup, print_final_stats, print_registry_state};
use crate::workflow::{UploadCtx, UploadFlow, UploadOutcome};
use anyhow::Result;
use futures::future::join_all;
use tracing::{info, warn};

/// 处理统计
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessingStats {
    /// 摘要已生成
    pub summarized: usize,
    /// 已受理，等待异步摘要（会一直停留在 Processing）
    pub awaiting: usize,
    /// 失败
    pub failed: usize,
    /// 本次发起上传的文件总数
    pub total: usize,
}

impl ProcessingStats {
    fn record(&mut self, outcome: UploadOutcome) {
        self.total += 1;
        match outcome {
            UploadOutcome::Summarized => self.summarized += 1,
            UploadOutcome::AwaitingSummary => self.awaiting += 1,
            UploadOutcome::Failed => self.failed += 1,
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    registry: FileRegistry,
    flow: UploadFlow,
    summary_writer: SummaryWriter,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        Ok(Self {
            registry: FileRegistry::new(config.max_files),
            flow: UploadFlow::new(&config),
            summary_writer: SummaryWriter::new(&config),
            config,
        })
    }

    /// 文件列表
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// 添加文件
    pub async fn add_file(&self, file: UploadFile) -> Result<String, AppError> {
        self.registry.add_file(file).await
    }

    /// 移除文件（任何状态）
    pub async fn remove_file(&self, id: &str) -> bool {
        self.registry.remove_file(id).await
    }

    /// 上传单个文件
    ///
    /// 只接受 Pending 状态的条目，其余状态记日志后忽略
    pub async fn upload_single_file(&self, id: &str) -> Option<UploadOutcome> {
        let pending = self.registry.files_with_status(FileStatus::Pending).await;

        let Some((file_id, index, file)) = pending.into_iter().find(|(fid, _, _)| fid.as_str() == id)
        else {
            warn!("⚠️ 条目不存在或不处于等待上传状态 (ID: {})", id);
            return None;
        };

        let ctx = UploadCtx::new(file_id, index, file.name.clone());
        Some(self.flow.run(&self.registry, &file, &ctx).await)
    }

    /// 上传所有等待中的文件
    ///
    /// 各文件的上传相互独立、并发执行，互不影响
    pub async fn upload_all_files(&self) -> ProcessingStats {
        let pending = self.registry.files_with_status(FileStatus::Pending).await;

        if pending.is_empty() {
            warn!("⚠️ 没有等待上传的文件");
            return ProcessingStats::default();
        }

        info!("🚀 开始上传 {} 个文件...", pending.len());
        self.run_batch(pending).await
    }

    /// 重试单个失败的文件
    ///
    /// 只接受 Error 状态的条目；重试会清除错误信息并重新进入上传流程
    pub async fn retry_upload(&self, id: &str) -> Option<UploadOutcome> {
        let failed = self.registry.files_with_status(FileStatus::Error).await;

        let Some((file_id, index, file)) = failed.into_iter().find(|(fid, _, _)| fid.as_str() == id)
        else {
            warn!("⚠️ 条目不存在或不处于失败状态，无法重试 (ID: {})", id);
            return None;
        };

        info!("🔄 重试上传: {}", file.name);
        let ctx = UploadCtx::new(file_id, index, file.name.clone());
        Some(self.flow.run(&self.registry, &file, &ctx).await)
    }

    /// 重试所有失败的文件
    pub async fn retry_all_files(&self) -> ProcessingStats {
        let failed = self.registry.files_with_status(FileStatus::Error).await;

        if failed.is_empty() {
            warn!("⚠️ 没有失败的文件需要重试");
            return ProcessingStats::default();
        }

        info!("🔄 重试 {} 个失败的文件...", failed.len());
        self.run_batch(failed).await
    }

    /// 并发执行一批上传
    async fn run_batch(&self, batch: Vec<(String, usize, UploadFile)>) -> ProcessingStats {
        let tasks = batch.into_iter().map(|(id, index, file)| {
            let ctx = UploadCtx::new(id, index, file.name.clone());
            let flow = &self.flow;
            let registry = &self.registry;
            async move { flow.run(registry, &file, &ctx).await }
        });

        let outcomes = join_all(tasks).await;

        let mut stats = ProcessingStats::default();
        for outcome in outcomes {
            stats.record(outcome);
        }
        stats
    }

    /// 运行应用主逻辑（批处理模式）
    ///
    /// 扫描待上传目录 → 添加 → 全部上传 → 摘要落盘 → 统计
    pub async fn run(&self) -> Result<()> {
        info!("\n📁 正在扫描待上传的文件...");
        let files = load_upload_files(&self.config.upload_folder).await?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待上传的 PDF/TXT 文件，程序结束");
            return Ok(());
        }

        for file in files {
            let name = file.name.clone();
            if let Err(e) = self.add_file(file).await {
                warn!("⚠️ 跳过文件 {}: {}", name, e);
            }
        }

        let stats = self.upload_all_files().await;

        // 展示每个文件的最终状态
        print_registry_state(&self.registry.snapshot().await);

        self.export_summaries().await?;

        print_final_stats(&stats, &self.config);

        Ok(())
    }

    /// 把所有完成的摘要写出到输出目录
    async fn export_summaries(&self) -> Result<()> {
        for entry in self.registry.snapshot().await {
            if entry.status != FileStatus::Completed {
                continue;
            }
            let Some(summary) = entry.summary.as_deref() else {
                continue;
            };

            let path = self.summary_writer.write(&entry.file.name, summary).await?;
            info!("💾 摘要已保存: {}", path.display());
        }
        Ok(())
    }
}
