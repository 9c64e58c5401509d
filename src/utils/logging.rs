use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use tracing::info;

use crate::config::Config;
use crate::models::file_entry::FileEntry;
use crate::orchestrator::upload_manager::ProcessingStats;

/// 初始化 tracing 日志
///
/// 日志级别通过 RUST_LOG 环境变量控制，默认 info
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n文件摘要处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 文件上传摘要模式");
    info!("📡 Webhook 地址: {}", config.webhook_url);
    info!("📁 最大文件数: {}", config.max_files);
    info!(
        "🛡️ 客户端本地校验: {}",
        if config.client_side_validation {
            "开启"
        } else {
            "关闭"
        }
    );
    info!("{}", "=".repeat(60));
}

/// 打印文件列表当前状态
///
/// # 参数
/// - `entries`: 文件条目快照
pub fn print_registry_state(entries: &[FileEntry]) {
    info!("\n{}", "─".repeat(60));
    for entry in entries {
        info!(
            "📄 {} ({}) - {} [{}%]",
            entry.file.name,
            format_file_size(entry.file.size),
            entry.status.description(),
            entry.status.progress_percent()
        );
        if let Some(error) = &entry.error {
            info!("   ⚠️ {}", error);
        }
        if let Some(summary) = &entry.summary {
            info!("   📝 {}", truncate_text(summary, 80));
        }
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &ProcessingStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 摘要已生成: {}/{}", stats.summarized, stats.total);
    if stats.awaiting > 0 {
        info!("⏳ 仍在处理中: {}", stats.awaiting);
    }
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 格式化文件大小用于展示
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 5), "abcde...");
        // 按字符截断，不能把多字节字符切坏
        assert_eq!(truncate_text("这是一段很长的摘要", 4), "这是一段...");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }
}
