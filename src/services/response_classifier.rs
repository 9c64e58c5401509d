//! 响应分类服务 - 业务能力层
//!
//! Webhook 的响应格式没有契约保证，实际观察到四种形态：
//! 纯文本确认 `file uploaded`、JSON 数组 `[{"text": "..."}]`、
//! 包含 `<iframe srcdoc="...">` 的 HTML 片段、任意纯文本。
//! 本模块把任意响应体归类为"已受理等待异步结果"或"内含最终摘要"，
//! 并从 HTML / JSON 包装中提取干净的摘要文本。

use regex::Regex;
use serde_json::Value;

/// 触发"已受理"分支的确认文本（不区分大小写）
///
/// 兼容性常量，不可修改
const ASYNC_ACK_TEXT: &str = "file uploaded";

/// 区分"短控制消息"与"内容载荷"的长度阈值
///
/// 兼容性常量，不可修改
const SUMMARY_LENGTH_THRESHOLD: usize = 100;

/// 响应分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 文件已受理，摘要将异步产生（本次响应不含摘要）
    AsyncAcknowledged,
    /// 响应中直接携带了最终摘要（JSON 数组或长文本）
    InlineSummary(String),
    /// 其他非空响应，整体视为摘要文本
    PlainText(String),
    /// 空响应，无法归类
    Unrecognized,
}

/// 对响应体进行分类
///
/// 纯函数：相同输入永远得到相同结果
///
/// # 参数
/// - `body`: 原始响应体文本
///
/// # 返回
/// 返回分类结果，摘要类分支已完成提取和反转义
pub fn classify(body: &str) -> Classification {
    let trimmed = body.trim();

    // 1. 上传确认（不区分大小写）
    if trimmed.to_lowercase() == ASYNC_ACK_TEXT {
        return Classification::AsyncAcknowledged;
    }

    // 2. 看起来是摘要：JSON 数组开头，或超过长度阈值
    if trimmed.starts_with('[') || body.chars().count() > SUMMARY_LENGTH_THRESHOLD {
        return Classification::InlineSummary(extract_summary(body));
    }

    // 3. 其他非空响应整体视为摘要文本
    if !trimmed.is_empty() {
        return Classification::PlainText(extract_from_plain_text(trimmed));
    }

    // 4. 空响应
    Classification::Unrecognized
}

/// 从疑似摘要的响应体中提取摘要文本
///
/// 提取优先级：iframe srcdoc > JSON 数组首元素的 text 字段 > 原文
fn extract_summary(body: &str) -> String {
    // HTML iframe 包装：提取 srcdoc 属性内容
    if body.contains("<iframe") && body.contains("srcdoc=") {
        return extract_srcdoc(body).unwrap_or_else(|| body.trim().to_string());
    }

    // JSON 摘要格式: [{"text": "summary..."}]
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(text) = value
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|first| first.get("text"))
            .and_then(|t| t.as_str())
        {
            return text.to_string();
        }
    }

    // JSON 解析失败或结构不符，原样返回
    body.trim().to_string()
}

/// 对短的纯文本响应做同样的 iframe 检查
fn extract_from_plain_text(trimmed: &str) -> String {
    if trimmed.contains("<iframe") && trimmed.contains("srcdoc=") {
        extract_srcdoc(trimmed).unwrap_or_else(|| trimmed.to_string())
    } else {
        trimmed.to_string()
    }
}

/// 提取 srcdoc 属性中的内容并反转义
///
/// 属性内容为空时返回 None，由调用方回落到原文
fn extract_srcdoc(body: &str) -> Option<String> {
    let re = Regex::new(r#"srcdoc="([^"]*?)""#).ok()?;
    let raw = re.captures(body)?.get(1)?.as_str();
    if raw.is_empty() {
        return None;
    }
    Some(unescape_html_entities(raw).trim().to_string())
}

/// 反转义 srcdoc 属性中的五种 HTML 实体
///
/// `&amp;` 必须最后替换，否则 `&amp;lt;` 这类嵌套转义会被二次反转义
fn unescape_html_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_uploaded_confirmation() {
        assert_eq!(classify("file uploaded"), Classification::AsyncAcknowledged);
        assert_eq!(classify("File Uploaded"), Classification::AsyncAcknowledged);
        assert_eq!(classify("FILE UPLOADED"), Classification::AsyncAcknowledged);
        assert_eq!(
            classify("  file uploaded  \n"),
            Classification::AsyncAcknowledged
        );
    }

    #[test]
    fn test_json_array_summary() {
        assert_eq!(
            classify(r#"[{"text":"Hello world"}]"#),
            Classification::InlineSummary("Hello world".to_string())
        );
    }

    #[test]
    fn test_json_array_without_text_field_falls_back_to_raw() {
        let body = r#"[{"content":"Hello"}]"#;
        assert_eq!(
            classify(body),
            Classification::InlineSummary(body.to_string())
        );
    }

    #[test]
    fn test_invalid_json_starting_with_bracket_falls_back_to_raw() {
        let body = "[not json at all";
        assert_eq!(
            classify(body),
            Classification::InlineSummary(body.to_string())
        );
    }

    #[test]
    fn test_long_text_is_inline_summary() {
        let body = "这份文档主要讨论了分布式系统中的一致性问题，".repeat(10);
        match classify(&body) {
            Classification::InlineSummary(text) => assert_eq!(text, body.trim()),
            other => panic!("期望 InlineSummary，实际 {:?}", other),
        }
    }

    #[test]
    fn test_threshold_boundary() {
        // 恰好 100 个字符：走 PlainText 分支
        let at_limit = "a".repeat(100);
        assert_eq!(
            classify(&at_limit),
            Classification::PlainText(at_limit.clone())
        );

        // 101 个字符：超过阈值，走 InlineSummary 分支
        let over_limit = "a".repeat(101);
        assert_eq!(
            classify(&over_limit),
            Classification::InlineSummary(over_limit.clone())
        );
    }

    #[test]
    fn test_threshold_counts_chars_not_bytes() {
        // 60 个汉字 = 180 字节但只有 60 个字符，不应触发阈值
        let body = "摘".repeat(60);
        assert_eq!(classify(&body), Classification::PlainText(body.clone()));
    }

    #[test]
    fn test_srcdoc_extraction() {
        let body = format!(
            r#"<html><body><iframe width="100%" srcdoc="Summary &amp; more"></iframe></body></html>{}"#,
            " ".repeat(100)
        );
        assert_eq!(
            classify(&body),
            Classification::InlineSummary("Summary & more".to_string())
        );
    }

    #[test]
    fn test_srcdoc_unescapes_all_five_entities() {
        let body = format!(
            r#"<iframe srcdoc="&quot;a&quot; &lt;b&gt; &#x27;c&#x27; d&#x2F;e &amp; f">{}"#,
            "x".repeat(100)
        );
        assert_eq!(
            classify(&body),
            Classification::InlineSummary("\"a\" <b> 'c' d/e & f".to_string())
        );
    }

    #[test]
    fn test_amp_unescaped_last() {
        // &amp;lt; 是"字面上的 &lt;"，只能反转义一层
        let body = format!(r#"<iframe srcdoc="a &amp;lt; b">{}"#, "x".repeat(100));
        assert_eq!(
            classify(&body),
            Classification::InlineSummary("a &lt; b".to_string())
        );
    }

    #[test]
    fn test_srcdoc_in_short_plain_text() {
        let body = r#"<iframe srcdoc="short summary">"#;
        assert_eq!(
            classify(body),
            Classification::PlainText("short summary".to_string())
        );
    }

    #[test]
    fn test_iframe_without_extractable_srcdoc_falls_back() {
        let body = format!(r#"<iframe srcdoc=broken>{}"#, "x".repeat(100));
        assert_eq!(
            classify(&body),
            Classification::InlineSummary(body.trim().to_string())
        );
    }

    #[test]
    fn test_empty_srcdoc_falls_back_to_raw() {
        let body = format!(r#"<iframe srcdoc="">{}"#, "x".repeat(100));
        assert_eq!(
            classify(&body),
            Classification::InlineSummary(body.trim().to_string())
        );
    }

    #[test]
    fn test_short_plain_text() {
        assert_eq!(
            classify("Done."),
            Classification::PlainText("Done.".to_string())
        );
    }

    #[test]
    fn test_empty_body_is_unrecognized() {
        assert_eq!(classify(""), Classification::Unrecognized);
        assert_eq!(classify("   \n\t  "), Classification::Unrecognized);
    }

    #[test]
    fn test_classify_is_pure() {
        let body = r#"[{"text":"stable"}]"#;
        assert_eq!(classify(body), classify(body));
    }
}
