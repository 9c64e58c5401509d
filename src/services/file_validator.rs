//! 文件校验服务 - 业务能力层
//!
//! 只负责"本地校验"能力，在任何网络请求之前拦下明显无效的文件

use crate::config::Config;
use crate::error::ValidationError;
use crate::models::file_entry::UploadFile;

/// 允许的 MIME 类型
const ALLOWED_MIME_TYPES: [&str; 3] = ["application/pdf", "text/plain", "text/txt"];

/// 允许的文件扩展名
const ALLOWED_EXTENSIONS: [&str; 2] = [".pdf", ".txt"];

/// 文件校验服务
///
/// 职责：
/// - 校验单个文件的大小、类型、文件名
/// - 不关心文件列表和上传流程
pub struct FileValidator {
    max_file_size: u64,
}

impl FileValidator {
    /// 创建新的文件校验服务
    pub fn new(config: &Config) -> Self {
        Self {
            max_file_size: config.max_file_size,
        }
    }

    /// 校验文件
    ///
    /// 检查顺序：大小 → 非空 → 类型 → 文件名
    pub fn validate(&self, file: &UploadFile) -> Result<(), ValidationError> {
        if file.size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size: file.size,
                max_size: self.max_file_size,
            });
        }

        if file.size == 0 {
            return Err(ValidationError::EmptyFile {
                name: file.name.clone(),
            });
        }

        if !Self::is_allowed_type(&file.name, &file.mime_type) {
            return Err(ValidationError::UnsupportedType {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }

        if !Self::is_safe_name(&file.name) {
            return Err(ValidationError::SuspiciousFileName {
                name: file.name.clone(),
            });
        }

        Ok(())
    }

    /// 类型检查：MIME 类型或扩展名命中白名单即可
    pub fn is_allowed_type(name: &str, mime_type: &str) -> bool {
        if ALLOWED_MIME_TYPES.contains(&mime_type) {
            return true;
        }

        let lower = name.to_lowercase();
        match lower.rfind('.') {
            Some(pos) => ALLOWED_EXTENSIONS.contains(&&lower[pos..]),
            None => false,
        }
    }

    /// 文件名检查：不允许 `<`、`>`、`..`
    pub fn is_safe_name(name: &str) -> bool {
        !name.contains('<') && !name.contains('>') && !name.contains("..")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_validator() -> FileValidator {
        FileValidator::new(&Config::default())
    }

    #[test]
    fn test_valid_files_pass() {
        let validator = create_test_validator();
        let txt = UploadFile::new("notes.txt", "text/plain", b"hello".to_vec());
        let pdf = UploadFile::new("paper.pdf", "application/pdf", b"%PDF-1.4".to_vec());
        assert!(validator.validate(&txt).is_ok());
        assert!(validator.validate(&pdf).is_ok());
    }

    #[test]
    fn test_oversized_file_rejected() {
        let validator = create_test_validator();
        let file = UploadFile::new(
            "big.txt",
            "text/plain",
            vec![0u8; 5 * 1024 * 1024 + 1],
        );
        assert!(matches!(
            validator.validate(&file),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_empty_file_rejected() {
        let validator = create_test_validator();
        let file = UploadFile::new("empty.txt", "text/plain", Vec::new());
        assert!(matches!(
            validator.validate(&file),
            Err(ValidationError::EmptyFile { .. })
        ));
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let validator = create_test_validator();
        let file = UploadFile::new("a.docx", "application/msword", b"data".to_vec());
        assert!(matches!(
            validator.validate(&file),
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_extension_rescues_unknown_mime() {
        // MIME 未命中白名单，但扩展名是 .pdf
        assert!(FileValidator::is_allowed_type("a.pdf", "application/octet-stream"));
        assert!(FileValidator::is_allowed_type("A.PDF", ""));
        assert!(!FileValidator::is_allowed_type("noext", "application/octet-stream"));
    }

    #[test]
    fn test_suspicious_names_rejected() {
        let validator = create_test_validator();
        for name in ["a<b.txt", "a>b.txt", "../escape.txt", "a..b.txt"] {
            let file = UploadFile::new(name, "text/plain", b"data".to_vec());
            assert!(
                matches!(
                    validator.validate(&file),
                    Err(ValidationError::SuspiciousFileName { .. })
                ),
                "文件名 {} 应该被拒绝",
                name
            );
        }
    }
}
