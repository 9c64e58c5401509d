use crate::error::{AppError, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Webhook 上传地址
    pub webhook_url: String,
    /// 同时跟踪的文件数量上限
    pub max_files: usize,
    /// 单个文件大小上限（字节）
    pub max_file_size: u64,
    /// 是否在上传前做客户端本地校验
    pub client_side_validation: bool,
    /// 待上传文件存放目录
    pub upload_folder: String,
    /// 摘要输出目录
    pub summary_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: "https://n8n.shahmirzaman.dev/webhook/upload".to_string(),
            max_files: 3,
            max_file_size: 5 * 1024 * 1024,
            client_side_validation: true,
            upload_folder: "upload_files".to_string(),
            summary_folder: "summaries".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            webhook_url: std::env::var("WEBHOOK_URL").unwrap_or(default.webhook_url),
            max_files: std::env::var("MAX_FILES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_files),
            max_file_size: std::env::var("MAX_FILE_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_file_size),
            client_side_validation: std::env::var("CLIENT_SIDE_VALIDATION").ok().and_then(|v| v.parse().ok()).unwrap_or(default.client_side_validation),
            upload_folder: std::env::var("UPLOAD_FOLDER").unwrap_or(default.upload_folder),
            summary_folder: std::env::var("SUMMARY_FOLDER").unwrap_or(default.summary_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 从 TOML 配置文件加载
    ///
    /// 缺失的字段使用默认值填充
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(ConfigError::ReadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::Config(ConfigError::ParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(config)
    }

    /// 加载配置
    ///
    /// 优先级：CONFIG_FILE 指定的 TOML 文件 > 当前目录的 config.toml > 环境变量
    pub fn load() -> Self {
        let config_path =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if Path::new(&config_path).exists() {
            match Self::from_toml_file(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("⚠️ 配置文件加载失败，回退到环境变量: {}", e);
                }
            }
        }

        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_files, 3);
        assert_eq!(config.max_file_size, 5 * 1024 * 1024);
        assert!(config.client_side_validation);
        assert!(!config.webhook_url.is_empty());
    }

    #[test]
    fn test_from_toml_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "webhook_url = \"http://localhost:9999/upload\"\nclient_side_validation = false"
        )
        .unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.webhook_url, "http://localhost:9999/upload");
        assert!(!config.client_side_validation);
        // 缺失字段回落到默认值
        assert_eq!(config.max_files, 3);
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = Config::from_toml_file("does_not_exist.toml");
        assert!(result.is_err());
    }
}
