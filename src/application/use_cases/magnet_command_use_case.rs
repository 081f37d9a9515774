//! Explicit `磁链` command use case.

use std::sync::Arc;

use tracing::debug;

use crate::application::dto::{MagnetCommand, PreviewSettings};
use crate::application::services::{AccessPolicy, MagnetExtractor, ReferenceTextResolver};
use crate::domain::entities::{IncomingMessage, Reply};
use crate::domain::ports::BotApiPort;

use super::PreviewUseCase;

const USAGE_HINT: &str = "💡 请引用包含磁链的消息，或直接输入：磁链 magnet:?xt=...";

/// Handles the `磁链` / `磁力` command, including quoted messages.
#[derive(Clone)]
pub struct MagnetCommandUseCase {
    bot_api: Arc<dyn BotApiPort>,
    preview: PreviewUseCase,
    policy: AccessPolicy,
    max_magnet_count: usize,
}

impl MagnetCommandUseCase {
    /// Creates new command use case.
    #[must_use]
    pub fn new(
        bot_api: Arc<dyn BotApiPort>,
        preview: PreviewUseCase,
        settings: &PreviewSettings,
    ) -> Self {
        Self {
            bot_api,
            preview,
            policy: AccessPolicy::new(settings.group_whitelist.clone()),
            max_magnet_count: settings.max_magnet_count,
        }
    }

    /// Runs the command. Returns `None` when the chat is not allowed or there
    /// is nothing to send.
    pub async fn execute(&self, message: &IncomingMessage, command: &MagnetCommand) -> Option<Reply> {
        if !self.policy.is_allowed(message) {
            debug!(group_id = ?message.group_id, "Command ignored outside whitelist");
            return None;
        }

        let mut target_text = command.inline_text().unwrap_or_default().to_string();

        if let Some(reply_id) = message.reply_id.as_deref()
            && let Some(referenced) = ReferenceTextResolver::new(self.bot_api.as_ref())
                .resolve(reply_id)
                .await
            && !referenced.trim().is_empty()
        {
            target_text = referenced;
        }

        let all_links = MagnetExtractor::extract_all(&target_text);
        if all_links.is_empty() {
            return Some(Reply::plain(USAGE_HINT));
        }

        let links = match command.index() {
            Some(index) if index > 0 => match all_links.get(index - 1) {
                Some(link) => vec![link.clone()],
                None => {
                    return Some(Reply::Plain(format!(
                        "⚠️ 目标消息中只有 {} 条磁链，无法解析第 {index} 条。",
                        all_links.len()
                    )));
                }
            },
            _ => all_links.into_iter().take(self.max_magnet_count).collect(),
        };

        self.preview.execute(message, &links).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::fixtures::{group_message, private_message};
    use crate::domain::entities::{LinkInfo, MessageBody, MessagePart};
    use crate::domain::ports::mocks::{MockBotApi, MockLinkLookupPort, MockScreenshotPort};
    use serde_json::json;

    const HASH_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const HASH_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn named_lookup() -> MockLinkLookupPort {
        let mut lookup = MockLinkLookupPort::new();
        lookup.expect_lookup().returning(|link| {
            Ok(serde_json::from_value::<LinkInfo>(json!({
                "error": "",
                "name": link.hash().as_str(),
            }))
            .unwrap())
        });
        lookup
    }

    fn command_use_case(api: MockBotApi, settings: &PreviewSettings) -> MagnetCommandUseCase {
        let preview = PreviewUseCase::new(
            Arc::new(named_lookup()),
            Arc::new(MockScreenshotPort::new()),
            settings,
        );
        MagnetCommandUseCase::new(Arc::new(api), preview, settings)
    }

    fn run(text: &str) -> MagnetCommand {
        MagnetCommand::parse(text).unwrap()
    }

    #[tokio::test]
    async fn test_usage_hint_without_links() {
        let use_case = command_use_case(MockBotApi::new(), &PreviewSettings::default());
        let message = private_message("磁链");
        let reply = use_case.execute(&message, &run("磁链")).await.unwrap();
        assert_eq!(reply.as_plain(), Some(USAGE_HINT));
    }

    #[tokio::test]
    async fn test_inline_link() {
        let use_case = command_use_case(MockBotApi::new(), &PreviewSettings::default());
        let text = format!("磁链 {HASH_A}");
        let reply = use_case
            .execute(&private_message(&text), &run(&text))
            .await
            .unwrap();
        assert!(reply.as_plain().unwrap().contains(&HASH_A.to_uppercase()));
    }

    #[tokio::test]
    async fn test_whitelist_blocks_group() {
        let settings = PreviewSettings {
            group_whitelist: vec!["1".to_string()],
            ..PreviewSettings::default()
        };
        let use_case = command_use_case(MockBotApi::new(), &settings);
        let text = format!("磁链 {HASH_A}");
        assert!(
            use_case
                .execute(&group_message("2", &text), &run(&text))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_quoted_message_overrides_argument() {
        let api = MockBotApi::new().with_message(
            "77",
            MessageBody::Parts(vec![MessagePart::Text(format!("{HASH_A} {HASH_B}"))]),
        );
        let use_case = command_use_case(api, &PreviewSettings::default());
        let mut message = group_message("1", "磁链 2");
        message.reply_id = Some("77".to_string());

        let reply = use_case.execute(&message, &run("磁链 2")).await.unwrap();
        let text = reply.as_plain().unwrap();
        assert!(text.contains(&HASH_B.to_uppercase()));
        assert!(!text.contains(&HASH_A.to_uppercase()));
    }

    #[tokio::test]
    async fn test_blank_quote_keeps_argument() {
        let api = MockBotApi::new().with_message(
            "77",
            MessageBody::Parts(vec![
                MessagePart::Text("  ".to_string()),
                MessagePart::Other,
            ]),
        );
        let use_case = command_use_case(api, &PreviewSettings::default());
        let text = format!("磁链 {HASH_A}");
        let mut message = group_message("1", &text);
        message.reply_id = Some("77".to_string());

        let reply = use_case.execute(&message, &run(&text)).await.unwrap();
        assert!(reply.as_plain().unwrap().contains(&HASH_A.to_uppercase()));
    }

    #[tokio::test]
    async fn test_index_out_of_range() {
        let api = MockBotApi::new().with_message("77", MessageBody::Raw(HASH_A.to_string()));
        let use_case = command_use_case(api, &PreviewSettings::default());
        let mut message = group_message("1", "磁链 3");
        message.reply_id = Some("77".to_string());

        let reply = use_case.execute(&message, &run("磁链 3")).await.unwrap();
        assert_eq!(
            reply.as_plain(),
            Some("⚠️ 目标消息中只有 1 条磁链，无法解析第 3 条。")
        );
    }

    #[tokio::test]
    async fn test_unreachable_quote_falls_back_to_argument() {
        let use_case = command_use_case(MockBotApi::new(), &PreviewSettings::default());
        let text = format!("磁链 {HASH_A}");
        let mut message = private_message(&text);
        message.reply_id = Some("missing".to_string());

        let reply = use_case.execute(&message, &run(&text)).await.unwrap();
        assert!(reply.as_plain().unwrap().contains(&HASH_A.to_uppercase()));
    }

    #[tokio::test]
    async fn test_default_takes_first_n_links() {
        let settings = PreviewSettings {
            max_magnet_count: 2,
            ..PreviewSettings::default()
        };
        let use_case = command_use_case(MockBotApi::new(), &settings);
        let text = format!("磁链 {HASH_A} {HASH_B} {}", "c".repeat(40));

        let reply = use_case
            .execute(&private_message(&text), &run(&text))
            .await
            .unwrap();
        assert_eq!(reply.nodes().len(), 2);
    }
}
