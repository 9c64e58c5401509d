/// Webhook 客户端
///
/// 封装所有与摘要 Webhook 的 HTTP 交互
use crate::config::Config;
use crate::error::{AppError, AppResult, TransportError};
use crate::models::file_entry::UploadFile;
use reqwest::multipart;
use tracing::debug;

/// Webhook 客户端
pub struct WebhookClient {
    http: reqwest::Client,
    webhook_url: String,
}

impl WebhookClient {
    /// 创建新的 Webhook 客户端
    ///
    /// Webhook 地址来自配置注入，不在代码里写死
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url: config.webhook_url.clone(),
        }
    }

    /// 上传单个文件
    ///
    /// # 参数
    /// - `file`: 待上传的文件
    /// - `file_id`: 文件条目 ID，随表单一起提交
    ///
    /// # 返回
    /// 2xx 时返回响应体文本，交给响应分类器处理；
    /// 非 2xx 状态码和网络错误映射为对应的错误类别
    pub async fn upload(&self, file: &UploadFile, file_id: &str) -> AppResult<String> {
        let form = self.build_upload_form(file, file_id)?;

        debug!("上传文件: {} (ID: {})", file.name, file_id);

        let response = self
            .http
            .post(&self.webhook_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        debug!("上传响应状态: {}", status);

        if !status.is_success() {
            return Err(AppError::http_status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            AppError::Transport(TransportError::BodyReadFailed {
                source: Box::new(e),
            })
        })?;

        debug!("原始响应体: {}", body);

        Ok(body)
    }

    /// 构建上传表单
    ///
    /// 表单字段：file（二进制）、fileName、fileType、fileId
    fn build_upload_form(&self, file: &UploadFile, file_id: &str) -> AppResult<multipart::Form> {
        let part = multipart::Part::bytes(file.content.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| AppError::Other(format!("无效的 MIME 类型: {}", e)))?;

        Ok(multipart::Form::new()
            .part("file", part)
            .text("fileName", file.name.clone())
            .text("fileType", file.mime_type.clone())
            .text("fileId", file_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpStatusError;
    use mockito::Server;

    fn build_client(url: String) -> WebhookClient {
        let config = Config {
            webhook_url: url,
            ..Config::default()
        };
        WebhookClient::new(&config)
    }

    fn sample_file() -> UploadFile {
        UploadFile::new("notes.txt", "text/plain", b"hello world".to_vec())
    }

    #[tokio::test]
    async fn test_upload_returns_body_on_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("File Uploaded")
            .create_async()
            .await;

        let client = build_client(server.url());
        let body = client.upload(&sample_file(), "id-1").await.unwrap();

        assert_eq!(body, "File Uploaded");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_maps_413_to_payload_too_large() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(413)
            .with_body("whatever the body says")
            .create_async()
            .await;

        let client = build_client(server.url());
        let err = client.upload(&sample_file(), "id-1").await.unwrap_err();

        assert!(matches!(
            err,
            AppError::HttpStatus(HttpStatusError::PayloadTooLarge)
        ));
        assert!(err.user_message().contains("文件过大"));
    }

    #[tokio::test]
    async fn test_upload_maps_503_to_service_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .create_async()
            .await;

        let client = build_client(server.url());
        let err = client.upload(&sample_file(), "id-1").await.unwrap_err();

        assert!(matches!(
            err,
            AppError::HttpStatus(HttpStatusError::ServiceUnavailable { status: 503 })
        ));
    }

    #[tokio::test]
    async fn test_upload_network_error_is_transport_error() {
        // 无人监听的端口
        let client = build_client("http://127.0.0.1:1/upload".to_string());
        let err = client.upload(&sample_file(), "id-1").await.unwrap_err();

        assert!(matches!(err, AppError::Transport(_)));
    }
}
