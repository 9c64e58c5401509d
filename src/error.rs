use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 本地校验错误（未发起网络请求）
    Validation(ValidationError),
    /// 网络传输错误
    Transport(TransportError),
    /// HTTP 状态码错误
    HttpStatus(HttpStatusError),
    /// 响应格式错误（无法识别 Webhook 的响应）
    ResponseFormat(ResponseFormatError),
    /// 文件操作错误
    File(FileError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "校验错误: {}", e),
            AppError::Transport(e) => write!(f, "传输错误: {}", e),
            AppError::HttpStatus(e) => write!(f, "HTTP错误: {}", e),
            AppError::ResponseFormat(e) => write!(f, "响应格式错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Validation(e) => Some(e),
            AppError::Transport(e) => Some(e),
            AppError::HttpStatus(e) => Some(e),
            AppError::ResponseFormat(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 本地校验错误
///
/// 在任何网络请求之前由客户端本地检查产生
#[derive(Debug)]
pub enum ValidationError {
    /// 文件超过大小限制
    FileTooLarge {
        size: u64,
        max_size: u64,
    },
    /// 文件内容为空
    EmptyFile {
        name: String,
    },
    /// 不支持的文件类型
    UnsupportedType {
        name: String,
        mime_type: String,
    },
    /// 可疑的文件名（包含 `<`、`>` 或 `..`）
    SuspiciousFileName {
        name: String,
    },
    /// 文件列表已满
    RegistryFull {
        max_files: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FileTooLarge { size, max_size } => {
                write!(f, "文件过大: {} 字节 (上限 {} 字节)", size, max_size)
            }
            ValidationError::EmptyFile { name } => write!(f, "文件内容为空: {}", name),
            ValidationError::UnsupportedType { name, mime_type } => {
                write!(f, "不支持的文件类型: {} (MIME: {})", name, mime_type)
            }
            ValidationError::SuspiciousFileName { name } => {
                write!(f, "可疑的文件名: {}", name)
            }
            ValidationError::RegistryFull { max_files } => {
                write!(f, "文件列表已满 (上限 {} 个)", max_files)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// 网络传输错误
#[derive(Debug)]
pub enum TransportError {
    /// 请求发送失败（连接失败、DNS 解析失败等）
    RequestFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求超时
    Timeout,
    /// 读取响应体失败
    BodyReadFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::RequestFailed { source } => {
                write!(f, "网络请求失败: {}", source)
            }
            TransportError::Timeout => write!(f, "请求超时"),
            TransportError::BodyReadFailed { source } => {
                write!(f, "读取响应体失败: {}", source)
            }
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::RequestFailed { source }
            | TransportError::BodyReadFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            TransportError::Timeout => None,
        }
    }
}

/// HTTP 状态码错误
///
/// 每个变体对应 Webhook 返回的一类非 2xx 状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatusError {
    /// 400 - 文件格式无效或已损坏
    BadRequest,
    /// 401 - 认证失败
    AuthFailed,
    /// 403 - 没有权限
    PermissionDenied,
    /// 404 - 上传服务不存在
    ServiceNotFound,
    /// 413 - 文件过大
    PayloadTooLarge,
    /// 415 - 不支持的媒体类型
    UnsupportedMediaType,
    /// 429 - 请求过于频繁
    RateLimited,
    /// 500 - 服务器内部错误
    ServerError,
    /// 502/503/504 - 服务暂时不可用
    ServiceUnavailable { status: u16 },
    /// 其他状态码
    Unexpected { status: u16 },
}

impl HttpStatusError {
    /// 按状态码映射错误类别
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => HttpStatusError::BadRequest,
            401 => HttpStatusError::AuthFailed,
            403 => HttpStatusError::PermissionDenied,
            404 => HttpStatusError::ServiceNotFound,
            413 => HttpStatusError::PayloadTooLarge,
            415 => HttpStatusError::UnsupportedMediaType,
            429 => HttpStatusError::RateLimited,
            500 => HttpStatusError::ServerError,
            502 | 503 | 504 => HttpStatusError::ServiceUnavailable { status },
            _ => HttpStatusError::Unexpected { status },
        }
    }
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpStatusError::BadRequest => write!(f, "400 文件格式无效"),
            HttpStatusError::AuthFailed => write!(f, "401 认证失败"),
            HttpStatusError::PermissionDenied => write!(f, "403 没有权限"),
            HttpStatusError::ServiceNotFound => write!(f, "404 服务不存在"),
            HttpStatusError::PayloadTooLarge => write!(f, "413 文件过大"),
            HttpStatusError::UnsupportedMediaType => write!(f, "415 不支持的媒体类型"),
            HttpStatusError::RateLimited => write!(f, "429 请求过于频繁"),
            HttpStatusError::ServerError => write!(f, "500 服务器错误"),
            HttpStatusError::ServiceUnavailable { status } => {
                write!(f, "{} 服务暂时不可用", status)
            }
            HttpStatusError::Unexpected { status } => write!(f, "意外的状态码 {}", status),
        }
    }
}

impl std::error::Error for HttpStatusError {}

/// 响应格式错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormatError {
    /// 响应体为空且无法归类
    UnrecognizedResponse,
}

impl fmt::Display for ResponseFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormatError::UnrecognizedResponse => {
                write!(f, "无法识别 Webhook 的响应")
            }
        }
    }
}

impl std::error::Error for ResponseFormatError {}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件读取失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 配置文件解析失败
    ParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFailed { path, source } => {
                write!(f, "读取配置文件失败 ({}): {}", path, source)
            }
            ConfigError::ParseFailed { path, source } => {
                write!(f, "解析配置文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadFailed { source, .. } | ConfigError::ParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Transport(TransportError::Timeout)
        } else {
            AppError::Transport(TransportError::RequestFailed {
                source: Box::new(err),
            })
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 用户可见消息 ==========

impl AppError {
    /// 生成展示在文件条目上的用户可见错误信息
    ///
    /// 每类错误固定一条提示语，避免把底层细节直接暴露给用户
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.user_message(),
            AppError::Transport(e) => e.user_message(),
            AppError::HttpStatus(e) => e.user_message(),
            AppError::ResponseFormat(_) => {
                "🤖 AI 服务返回了意外的响应，请重试或联系支持。".to_string()
            }
            AppError::File(e) => format!("📄 文件读取失败: {}。", e),
            AppError::Config(e) => format!("⚙️ 配置错误: {}。", e),
            AppError::Other(msg) => format!("🚨 上传失败: {}，请重试。", msg),
        }
    }
}

impl ValidationError {
    /// 校验错误的用户可见信息
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::FileTooLarge { .. } => {
                "📁 文件过大，请上传小于 5MB 的文件。".to_string()
            }
            ValidationError::EmptyFile { .. } => {
                "📄 文件内容为空，请上传有效的文档。".to_string()
            }
            ValidationError::UnsupportedType { .. } => {
                "📄 无效的文件类型，仅支持 PDF 和 TXT 文件。".to_string()
            }
            ValidationError::SuspiciousFileName { .. } => {
                "📄 文件名无效，请重命名后重试。".to_string()
            }
            ValidationError::RegistryFull { max_files } => {
                format!("📚 最多只能同时处理 {} 个文件。", max_files)
            }
        }
    }
}

impl TransportError {
    /// 传输错误的用户可见信息
    pub fn user_message(&self) -> String {
        match self {
            TransportError::RequestFailed { .. } | TransportError::BodyReadFailed { .. } => {
                "🌐 网络错误，请检查网络连接后重试。".to_string()
            }
            TransportError::Timeout => {
                "⏰ 请求超时，AI 服务可能正忙，请重试。".to_string()
            }
        }
    }
}

impl HttpStatusError {
    /// 状态码错误的用户可见信息
    pub fn user_message(&self) -> String {
        match self {
            HttpStatusError::BadRequest => {
                "❌ 文件格式无效或已损坏，请更换文件重试。".to_string()
            }
            HttpStatusError::AuthFailed => "🔒 认证失败，请稍后重试。".to_string(),
            HttpStatusError::PermissionDenied => "🚫 没有上传文件的权限。".to_string(),
            HttpStatusError::ServiceNotFound => {
                "🔍 上传服务不存在，请联系管理员。".to_string()
            }
            HttpStatusError::PayloadTooLarge => {
                "📁 文件过大，请上传更小的文件。".to_string()
            }
            HttpStatusError::UnsupportedMediaType => {
                "📄 不支持的文件类型，仅支持 PDF 和 TXT。".to_string()
            }
            HttpStatusError::RateLimited => {
                "⏰ 请求过于频繁，请稍等片刻后重试。".to_string()
            }
            HttpStatusError::ServerError => {
                "🔧 服务器错误，AI 服务暂时不可用。".to_string()
            }
            HttpStatusError::ServiceUnavailable { .. } => {
                "🌐 服务暂时不可用，请几分钟后重试。".to_string()
            }
            HttpStatusError::Unexpected { status } => {
                format!("🚨 上传失败 (HTTP {})，请重试。", status)
            }
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 HTTP 状态码错误
    pub fn http_status(status: u16) -> Self {
        AppError::HttpStatus(HttpStatusError::from_status(status))
    }

    /// 创建响应格式错误
    pub fn unrecognized_response() -> Self {
        AppError::ResponseFormat(ResponseFormatError::UnrecognizedResponse)
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert_eq!(HttpStatusError::from_status(400), HttpStatusError::BadRequest);
        assert_eq!(HttpStatusError::from_status(401), HttpStatusError::AuthFailed);
        assert_eq!(
            HttpStatusError::from_status(403),
            HttpStatusError::PermissionDenied
        );
        assert_eq!(
            HttpStatusError::from_status(404),
            HttpStatusError::ServiceNotFound
        );
        assert_eq!(
            HttpStatusError::from_status(413),
            HttpStatusError::PayloadTooLarge
        );
        assert_eq!(
            HttpStatusError::from_status(415),
            HttpStatusError::UnsupportedMediaType
        );
        assert_eq!(HttpStatusError::from_status(429), HttpStatusError::RateLimited);
        assert_eq!(HttpStatusError::from_status(500), HttpStatusError::ServerError);
        assert_eq!(
            HttpStatusError::from_status(503),
            HttpStatusError::ServiceUnavailable { status: 503 }
        );
        assert_eq!(
            HttpStatusError::from_status(418),
            HttpStatusError::Unexpected { status: 418 }
        );
    }

    #[test]
    fn test_413_user_message_is_file_too_large() {
        let err = AppError::http_status(413);
        assert!(err.user_message().contains("文件过大"));
    }

    #[test]
    fn test_user_message_never_empty() {
        let errors = vec![
            AppError::http_status(400),
            AppError::http_status(502),
            AppError::unrecognized_response(),
            AppError::Transport(TransportError::Timeout),
            AppError::Validation(ValidationError::EmptyFile {
                name: "a.txt".to_string(),
            }),
            AppError::Other("boom".to_string()),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}
