//! Turns lookup responses into chat text.

use crate::domain::entities::{LinkInfo, MagnetLink, PreviewResult};

use super::size_formatter::format_file_size;

/// Host the lookup service embeds in screenshot URLs.
pub const LOOKUP_HOST: &str = "https://whatslink.info";

const UNKNOWN_NAME: &str = "未知";
const UNKNOWN_ERROR: &str = "未知错误";
const NO_RESPONSE: &str = "API无响应";

/// Builds preview text from lookup results.
#[derive(Debug, Clone)]
pub struct PreviewFormatter {
    base_url: String,
    max_screenshots: usize,
}

impl PreviewFormatter {
    /// Creates a formatter rewriting screenshot URLs onto `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, max_screenshots: usize) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_screenshots,
        }
    }

    /// Builds the info lines and screenshot list of a successful lookup.
    #[must_use]
    pub fn describe(&self, info: &LinkInfo) -> PreviewResult {
        let lines = vec![
            "🔍 解析结果：\r".to_string(),
            format!("📝 名称：{}\r", info.name.as_deref().unwrap_or(UNKNOWN_NAME)),
            format!("📦 类型：{}\r", info.file_type().label()),
            format!("📏 大小：{}\r", format_file_size(info.size_bytes())),
            format!("📚 包含文件：{}个", info.count_display()),
        ];

        let screenshot_urls = info
            .screenshot_urls(self.max_screenshots)
            .iter()
            .map(|url| self.rewrite_url(url))
            .filter(|url| !url.is_empty())
            .collect();

        PreviewResult {
            lines,
            screenshot_urls,
        }
    }

    /// Builds the single failure line for a link.
    ///
    /// `reason` is the service-provided message; `None` means the service
    /// never produced a usable response.
    #[must_use]
    pub fn failure(link: &MagnetLink, reason: Option<&str>) -> PreviewResult {
        let reason = reason.map_or(NO_RESPONSE, |r| {
            r.split("contact").next().unwrap_or_default().trim()
        });
        PreviewResult::text_only(vec![format!("⚠️ 解析失败 ({link}): {reason}")])
    }

    /// Builds the failure line for a response flagged as an error.
    #[must_use]
    pub fn service_failure(link: &MagnetLink, info: &LinkInfo) -> PreviewResult {
        Self::failure(link, Some(info.name.as_deref().unwrap_or(UNKNOWN_ERROR)))
    }

    /// Renders a result as plain text, listing screenshot links.
    #[must_use]
    pub fn format_text(result: &PreviewResult) -> String {
        let mut message = result.lines.join("\n");

        if !result.screenshot_urls.is_empty() {
            message.push_str("\n\n📸 预览截图链接：");
            for (i, url) in result.screenshot_urls.iter().enumerate() {
                message.push_str(&format!("\n- 截图 {}: {url}", i + 1));
            }
        }

        message
    }

    fn rewrite_url(&self, url: &str) -> String {
        url.replace(LOOKUP_HOST, &self.base_url)
    }
}

impl Default for PreviewFormatter {
    fn default() -> Self {
        Self::new(LOOKUP_HOST, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::InfoHash;
    use serde_json::json;

    fn link() -> MagnetLink {
        MagnetLink::new(InfoHash::new(&"a".repeat(40)).unwrap())
    }

    fn info() -> LinkInfo {
        serde_json::from_value(json!({
            "error": "",
            "file_type": "video",
            "name": "Big.Buck.Bunny",
            "size": 1_572_864,
            "count": 2,
            "screenshots": [
                { "screenshot": "https://whatslink.info/s/1.jpg" },
                { "screenshot": "https://whatslink.info/s/2.jpg" },
                { "screenshot": "https://whatslink.info/s/3.jpg" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_describe_lines() {
        let result = PreviewFormatter::new(LOOKUP_HOST, 3).describe(&info());
        assert_eq!(
            result.lines,
            vec![
                "🔍 解析结果：\r",
                "📝 名称：Big.Buck.Bunny\r",
                "📦 类型：🎥 视频\r",
                "📏 大小：1.50 MB\r",
                "📚 包含文件：2个",
            ]
        );
        assert_eq!(result.screenshot_urls.len(), 3);
    }

    #[test]
    fn test_describe_defaults_for_missing_fields() {
        let result = PreviewFormatter::default().describe(&LinkInfo::default());
        assert_eq!(result.lines[1], "📝 名称：未知\r");
        assert_eq!(result.lines[2], "📦 类型：❓ 其他\r");
        assert_eq!(result.lines[3], "📏 大小：0B\r");
        assert_eq!(result.lines[4], "📚 包含文件：0个");
        assert!(result.screenshot_urls.is_empty());
    }

    #[test]
    fn test_screenshot_limit_and_rewrite() {
        let result = PreviewFormatter::new("https://mirror.example/", 2).describe(&info());
        assert_eq!(
            result.screenshot_urls,
            vec!["https://mirror.example/s/1.jpg", "https://mirror.example/s/2.jpg"]
        );

        let none = PreviewFormatter::new(LOOKUP_HOST, 0).describe(&info());
        assert!(none.screenshot_urls.is_empty());
    }

    #[test]
    fn test_failure_lines() {
        let no_response = PreviewFormatter::failure(&link(), None);
        assert_eq!(
            no_response.lines,
            vec![format!("⚠️ 解析失败 ({}): API无响应", link())]
        );

        let flagged: LinkInfo = serde_json::from_value(json!({
            "error": "quota",
            "name": "Daily quota exceeded, contact admin@example.com"
        }))
        .unwrap();
        let failure = PreviewFormatter::service_failure(&link(), &flagged);
        assert_eq!(
            failure.lines,
            vec![format!("⚠️ 解析失败 ({}): Daily quota exceeded,", link())]
        );

        let unnamed: LinkInfo = serde_json::from_value(json!({ "error": "x" })).unwrap();
        assert!(PreviewFormatter::service_failure(&link(), &unnamed).lines[0].ends_with("未知错误"));
    }

    #[test]
    fn test_format_text_with_screenshots() {
        let result = PreviewResult {
            lines: vec!["a".to_string(), "b".to_string()],
            screenshot_urls: vec!["u1".to_string(), "u2".to_string()],
        };
        assert_eq!(
            PreviewFormatter::format_text(&result),
            "a\nb\n\n📸 预览截图链接：\n- 截图 1: u1\n- 截图 2: u2"
        );
    }

    #[test]
    fn test_format_text_without_screenshots() {
        let result = PreviewResult::text_only(vec!["only".to_string()]);
        assert_eq!(PreviewFormatter::format_text(&result), "only");
    }
}
