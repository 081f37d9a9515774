//! Link preview use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::PreviewSettings;
use crate::application::services::PreviewFormatter;
use crate::application::services::text_splitter::{FORWARD_NODE_MAX_CHARS, split_by_length};
use crate::domain::entities::{ForwardNode, IncomingMessage, MagnetLink, PreviewResult, Reply};
use crate::domain::ports::{LinkLookupPort, ScreenshotPort};

const INFO_NODE_NAME: &str = "磁力预览信息";
const SCREENSHOT_NODE_NAME: &str = "预览截图";
const EMPTY_FORWARD_TEXT: &str = "⚠️ 未能生成有效的预览内容。";

/// Looks up links and assembles the reply.
#[derive(Clone)]
pub struct PreviewUseCase {
    lookup_port: Arc<dyn LinkLookupPort>,
    screenshot_port: Arc<dyn ScreenshotPort>,
    formatter: PreviewFormatter,
    output_as_link: bool,
    cover_mosaic_level: f32,
}

impl PreviewUseCase {
    /// Creates new preview use case.
    #[must_use]
    pub fn new(
        lookup_port: Arc<dyn LinkLookupPort>,
        screenshot_port: Arc<dyn ScreenshotPort>,
        settings: &PreviewSettings,
    ) -> Self {
        Self {
            lookup_port,
            screenshot_port,
            formatter: PreviewFormatter::new(
                settings.lookup_base_url.clone(),
                settings.max_screenshots,
            ),
            output_as_link: settings.output_as_link,
            cover_mosaic_level: settings.cover_mosaic_level,
        }
    }

    /// Previews `links` for `message`. Returns `None` when there is nothing
    /// to preview.
    pub async fn execute(&self, message: &IncomingMessage, links: &[MagnetLink]) -> Option<Reply> {
        let mut results = Vec::with_capacity(links.len());
        for link in links {
            results.push(self.resolve(link).await);
        }

        match results.as_slice() {
            [] => None,
            [single] if self.output_as_link || single.screenshot_urls.is_empty() => {
                Some(Reply::Plain(PreviewFormatter::format_text(single)))
            }
            _ => Some(self.build_forward(&message.self_id, &results).await),
        }
    }

    async fn resolve(&self, link: &MagnetLink) -> PreviewResult {
        info!(link = %link, "Resolving magnet link");

        match self.lookup_port.lookup(link).await {
            Ok(info) if info.is_empty() => {
                warn!(link = %link, "Lookup returned an empty body");
                PreviewFormatter::failure(link, None)
            }
            Ok(info) if info.is_error() => {
                warn!(link = %link, error = ?info.error, "Lookup service reported an error");
                PreviewFormatter::service_failure(link, &info)
            }
            Ok(info) => self.formatter.describe(&info),
            Err(e) => {
                warn!(link = %link, error = %e, "Lookup failed");
                PreviewFormatter::failure(link, None)
            }
        }
    }

    async fn build_forward(&self, sender_id: &str, results: &[PreviewResult]) -> Reply {
        let numbered = results.len() > 1;
        let mut nodes = Vec::new();

        for (i, result) in results.iter().enumerate() {
            let position = i + 1;
            let info_name = node_name(INFO_NODE_NAME, position, numbered);

            if self.output_as_link {
                let mut text = PreviewFormatter::format_text(result);
                if numbered {
                    text = format!("🔗 磁链预览 #{position}\n\n{text}");
                }

                for part in split_by_length(&text, FORWARD_NODE_MAX_CHARS) {
                    nodes.push(ForwardNode::text(sender_id, info_name.clone(), part));
                }
                continue;
            }

            let images = self
                .screenshot_port
                .download_all(&result.screenshot_urls)
                .await;

            let mut lines = result.lines.clone();
            if numbered {
                lines.insert(0, format!("🔗 磁链预览 #{position}"));
            }
            if !result.screenshot_urls.is_empty() {
                lines.push(format!(
                    "\n📸 预览截图 (成功 {}/{} 张):",
                    images.len(),
                    result.screenshot_urls.len()
                ));
            }

            for part in split_by_length(&lines.join("\n"), FORWARD_NODE_MAX_CHARS) {
                nodes.push(ForwardNode::text(sender_id, info_name.clone(), part));
            }

            let image_name = node_name(SCREENSHOT_NODE_NAME, position, numbered);
            for image in images {
                let image = if self.cover_mosaic_level > 0.0 {
                    self.screenshot_port
                        .apply_mosaic(image, self.cover_mosaic_level)
                        .await
                } else {
                    image
                };
                nodes.push(ForwardNode::image(sender_id, image_name.clone(), image));
            }
        }

        debug!(nodes = nodes.len(), "Built forward message");

        if nodes.is_empty() {
            return Reply::plain(EMPTY_FORWARD_TEXT);
        }

        Reply::Forward(nodes)
    }
}

fn node_name(base: &str, position: usize, numbered: bool) -> String {
    if numbered {
        format!("{base} ({position})")
    } else {
        base.to_string()
    }
}
