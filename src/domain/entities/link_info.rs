//! Torrent metadata returned by the lookup service.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::serde_utils::{coerce_i64, is_truthy};

/// Kind of content a torrent mostly contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum FileType {
    Folder,
    Video,
    Image,
    Text,
    Audio,
    Archive,
    Document,
    #[default]
    Unknown,
}

impl FileType {
    /// Parses a file type case-insensitively. Unrecognized input is `Unknown`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "folder" => Self::Folder,
            "video" => Self::Video,
            "image" => Self::Image,
            "text" => Self::Text,
            "audio" => Self::Audio,
            "archive" => Self::Archive,
            "document" => Self::Document,
            _ => Self::Unknown,
        }
    }

    /// Returns the label shown in chat.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Folder => "📁 文件夹",
            Self::Video => "🎥 视频",
            Self::Image => "🌄 图片",
            Self::Text => "📄 文本",
            Self::Audio => "🎵 音频",
            Self::Archive => "📦 压缩包",
            Self::Document => "📑 文档",
            Self::Unknown => "❓ 其他",
        }
    }
}

/// Response body of the link lookup API.
///
/// The service is loose about types, so the numeric and error fields are kept
/// as raw JSON and interpreted on access.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct LinkInfo {
    #[serde(default)]
    pub error: Value,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Value,
    #[serde(default)]
    pub count: Value,
    #[serde(default)]
    pub screenshots: Value,
}

impl LinkInfo {
    /// Returns true when the body carried none of the known fields, as with `{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.error.is_null()
            && self.kind.is_none()
            && self.file_type.is_none()
            && self.name.is_none()
            && self.size.is_null()
            && self.count.is_null()
            && self.screenshots.is_null()
    }

    /// Returns true when the service reported a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        is_truthy(&self.error)
    }

    /// Returns the parsed file type.
    #[must_use]
    pub fn file_type(&self) -> FileType {
        self.file_type
            .as_deref()
            .map_or(FileType::Unknown, FileType::parse)
    }

    /// Returns the total size in bytes, if it can be read as an integer.
    #[must_use]
    pub fn size_bytes(&self) -> Option<i64> {
        coerce_i64(&self.size)
    }

    /// Returns the file count as shown to users.
    #[must_use]
    pub fn count_display(&self) -> String {
        match &self.count {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => "0".to_string(),
        }
    }

    /// Returns screenshot URLs from the first `limit` entries.
    ///
    /// Entries that are not objects with a non-empty string `screenshot`
    /// field are skipped but still count against the limit.
    #[must_use]
    pub fn screenshot_urls(&self, limit: usize) -> Vec<String> {
        let Value::Array(entries) = &self.screenshots else {
            return Vec::new();
        };

        entries
            .iter()
            .take(limit)
            .filter_map(|entry| {
                let url = entry.get("screenshot").and_then(Value::as_str);
                if url.is_none() {
                    tracing::debug!("Skipping invalid screenshot entry");
                }
                url.filter(|u| !u.is_empty()).map(str::to_owned)
            })
            .collect()
    }
}
