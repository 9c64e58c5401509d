//! 文件上传流程 - 流程层
//!
//! 核心职责：定义"一个文件"的完整上传流程
//!
//! 流程顺序：
//! 1. 本地校验（可配置关闭）
//! 2. 上传 → Webhook
//! 3. 响应分类 → 驱动状态机
//!
//! 所有错误在本层转换为条目上的 Error 状态，绝不向上抛出

use tracing::{error, info, warn};

use crate::clients::WebhookClient;
use crate::config::Config;
use crate::error::AppError;
use crate::models::file_entry::{FileEvent, FileStatus, UploadFile};
use crate::orchestrator::FileRegistry;
use crate::services::response_classifier::{classify, Classification};
use crate::services::FileValidator;
use crate::utils::logging::truncate_text;
use crate::workflow::upload_ctx::UploadCtx;

/// 上传处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// 摘要已生成（响应内联携带）
    Summarized,
    /// 已受理，等待异步摘要
    AwaitingSummary,
    /// 上传失败（条目进入 Error 状态）
    Failed,
}

/// 文件上传流程
///
/// - 编排单个文件的完整上传流程
/// - 决定何时校验、何时上传、何时归类响应
/// - 不持有文件列表，状态变更全部以事件形式发给 FileRegistry
pub struct UploadFlow {
    validator: FileValidator,
    client: WebhookClient,
    client_side_validation: bool,
    verbose_logging: bool,
}

impl UploadFlow {
    /// 创建新的上传流程
    pub fn new(config: &Config) -> Self {
        Self {
            validator: FileValidator::new(config),
            client: WebhookClient::new(config),
            client_side_validation: config.client_side_validation,
            verbose_logging: config.verbose_logging,
        }
    }

    /// 执行一次上传尝试
    ///
    /// 条目当前状态必须允许进入 Uploading（Pending 或重试时的 Error）
    pub async fn run(
        &self,
        registry: &FileRegistry,
        file: &UploadFile,
        ctx: &UploadCtx,
    ) -> UploadOutcome {
        // ========== 流程 1: 本地校验 ==========
        if self.client_side_validation {
            if let Err(e) = self.validator.validate(file) {
                warn!("[文件 {}] ⚠️ 本地校验未通过: {}", ctx.file_index, e);
                let err = AppError::Validation(e);
                self.fail(registry, ctx, &err).await;
                return UploadOutcome::Failed;
            }

            if self.verbose_logging {
                info!("[文件 {}] ✓ 本地校验通过: {}", ctx.file_index, ctx.file_name);
            }
        }

        // ========== 流程 2: 上传 ==========
        registry
            .apply(FileEvent::StatusChanged {
                id: ctx.file_id.clone(),
                status: FileStatus::Uploading,
                error: None,
            })
            .await;

        info!("[文件 {}] 📤 正在上传 {} ...", ctx.file_index, ctx.file_name);

        let body = match self.client.upload(file, &ctx.file_id).await {
            Ok(body) => body,
            Err(e) => {
                error!("[文件 {}] ❌ 上传失败: {}", ctx.file_index, e);
                self.fail(registry, ctx, &e).await;
                return UploadOutcome::Failed;
            }
        };

        // ========== 流程 3: 响应分类，驱动状态机 ==========
        match classify(&body) {
            Classification::AsyncAcknowledged => {
                info!(
                    "[文件 {}] ✓ 上传成功，等待 AI 生成摘要...",
                    ctx.file_index
                );
                self.advance(registry, ctx, FileStatus::Uploaded).await;
                self.advance(registry, ctx, FileStatus::Processing).await;
                // 此后没有任何请求去拉取异步结果，条目会一直停留在
                // Processing——除非同一个响应就带了摘要，这是已知的行为缺口
                UploadOutcome::AwaitingSummary
            }
            Classification::InlineSummary(summary) | Classification::PlainText(summary) => {
                info!(
                    "[文件 {}] ✓ 摘要已生成: {}",
                    ctx.file_index,
                    truncate_text(&summary, 80)
                );
                self.advance(registry, ctx, FileStatus::Uploaded).await;
                self.advance(registry, ctx, FileStatus::Processing).await;
                registry
                    .apply(FileEvent::SummarySet {
                        id: ctx.file_id.clone(),
                        summary,
                    })
                    .await;
                UploadOutcome::Summarized
            }
            Classification::Unrecognized => {
                let err = AppError::unrecognized_response();
                error!(
                    "[文件 {}] ❌ 无法识别的响应 (长度: {})",
                    ctx.file_index,
                    body.len()
                );
                self.fail(registry, ctx, &err).await;
                UploadOutcome::Failed
            }
        }
    }

    /// 推进一步状态
    async fn advance(&self, registry: &FileRegistry, ctx: &UploadCtx, status: FileStatus) {
        registry
            .apply(FileEvent::StatusChanged {
                id: ctx.file_id.clone(),
                status,
                error: None,
            })
            .await;
    }

    /// 标记条目失败
    ///
    /// 条目上只放用户可见信息，技术细节进日志
    async fn fail(&self, registry: &FileRegistry, ctx: &UploadCtx, err: &AppError) {
        registry
            .apply(FileEvent::StatusChanged {
                id: ctx.file_id.clone(),
                status: FileStatus::Error,
                error: Some(err.user_message()),
            })
            .await;
    }
}
