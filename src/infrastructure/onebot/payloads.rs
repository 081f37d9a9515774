use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::constants::Action;
use crate::domain::entities::{ChatTarget, ForwardNode, NodeContent};
use crate::domain::serde_utils::id_string;

/// Outbound action call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    pub params: Value,
    pub echo: String,
}

impl ActionRequest {
    #[must_use]
    pub fn new(action: Action, params: Value, echo: impl Into<String>) -> Self {
        Self {
            action: action.as_str().to_string(),
            params,
            echo: echo.into(),
        }
    }

    #[must_use]
    pub fn get_msg(message_id: &str, echo: impl Into<String>) -> Self {
        Self::new(
            Action::GetMsg,
            json!({ "message_id": id_param(message_id) }),
            echo,
        )
    }

    #[must_use]
    pub fn get_forward_msg(forward_id: &str, echo: impl Into<String>) -> Self {
        Self::new(Action::GetForwardMsg, json!({ "id": forward_id }), echo)
    }

    #[must_use]
    pub fn send_text(target: &ChatTarget, text: &str, echo: impl Into<String>) -> Self {
        let mut params = target_params(target);
        params["message_type"] = json!(match target {
            ChatTarget::Group { .. } => "group",
            ChatTarget::Private { .. } => "private",
        });
        params["message"] = json!([Segment::text(text)]);
        Self::new(Action::SendMsg, params, echo)
    }

    #[must_use]
    pub fn send_forward(target: &ChatTarget, nodes: &[ForwardNode], echo: impl Into<String>) -> Self {
        let action = match target {
            ChatTarget::Group { .. } => Action::SendGroupForwardMsg,
            ChatTarget::Private { .. } => Action::SendPrivateForwardMsg,
        };
        let mut params = target_params(target);
        params["messages"] = Value::Array(
            nodes
                .iter()
                .map(|node| json!(Segment::node(node)))
                .collect(),
        );
        Self::new(action, params, echo)
    }
}

fn target_params(target: &ChatTarget) -> Value {
    match target {
        ChatTarget::Group { group_id } => json!({ "group_id": id_param(group_id) }),
        ChatTarget::Private { user_id } => json!({ "user_id": id_param(user_id) }),
    }
}

/// IDs go out as numbers when they look like numbers.
#[must_use]
pub fn id_param(id: &str) -> Value {
    id.parse::<i64>()
        .map_or_else(|_| Value::String(id.to_string()), Value::from)
}

/// Reply to an action call, matched to its request by `echo`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub retcode: i64,
    #[serde(default)]
    pub data: Value,
    #[serde(default, with = "id_string::option")]
    pub echo: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub wording: Option<String>,
}

impl ActionResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.retcode == 0 && self.status == "ok"
    }

    #[must_use]
    pub fn error_message(&self) -> String {
        self.wording
            .as_deref()
            .filter(|w| !w.is_empty())
            .or(self.message.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }
}

/// One message segment in array format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl Segment {
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self {
            kind: "text".to_string(),
            data: json!({ "text": text }),
        }
    }

    #[must_use]
    pub fn image(bytes: &[u8]) -> Self {
        Self {
            kind: "image".to_string(),
            data: json!({ "file": format!("base64://{}", BASE64.encode(bytes)) }),
        }
    }

    #[must_use]
    pub fn node(node: &ForwardNode) -> Self {
        let content = match &node.content {
            NodeContent::Text(text) => Self::text(text),
            NodeContent::Image(bytes) => Self::image(bytes),
        };
        Self {
            kind: "node".to_string(),
            data: json!({
                "user_id": node.sender_id,
                "nickname": node.name,
                "content": [content],
            }),
        }
    }

    /// Text of a `text` segment.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        (self.kind == "text")
            .then(|| self.data.get("text").and_then(Value::as_str))
            .flatten()
    }

    /// Target message of a `reply` segment.
    #[must_use]
    pub fn reply_id(&self) -> Option<String> {
        (self.kind == "reply")
            .then(|| self.data.get("id").and_then(value_to_id))
            .flatten()
    }

    /// ID of a `forward` segment.
    #[must_use]
    pub fn forward_id(&self) -> Option<String> {
        (self.kind == "forward")
            .then(|| self.data.get("id").and_then(value_to_id))
            .flatten()
    }
}

pub(crate) fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Inbound event envelope. Only the fields the bot reads are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub post_type: String,
    #[serde(default)]
    pub meta_event_type: Option<String>,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default, with = "id_string::option")]
    pub self_id: Option<String>,
    #[serde(default, with = "id_string::option")]
    pub message_id: Option<String>,
    #[serde(default, with = "id_string::option")]
    pub user_id: Option<String>,
    #[serde(default, with = "id_string::option")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub raw_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_id_param() {
        assert_eq!(id_param("123456"), json!(123_456));
        assert_eq!(id_param("abc-1"), json!("abc-1"));
    }

    #[test]
    fn test_send_text_to_group() {
        let target = ChatTarget::Group {
            group_id: "42".to_string(),
        };
        let request = ActionRequest::send_text(&target, "hello", "e1");

        assert_eq!(request.action, "send_msg");
        assert_eq!(request.echo, "e1");
        assert_eq!(
            request.params,
            json!({
                "group_id": 42,
                "message_type": "group",
                "message": [{ "type": "text", "data": { "text": "hello" } }]
            })
        );
    }

    #[test]
    fn test_send_forward_to_private_chat() {
        let target = ChatTarget::Private {
            user_id: "7".to_string(),
        };
        let nodes = vec![
            ForwardNode::text("10000", "🔗 磁链预览", "line"),
            ForwardNode::image("10000", "预览截图 (1)", Bytes::from_static(b"img")),
        ];
        let request = ActionRequest::send_forward(&target, &nodes, "e2");

        assert_eq!(request.action, "send_private_forward_msg");
        assert_eq!(request.params["user_id"], json!(7));

        let messages = request.params["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["type"], "node");
        assert_eq!(messages[0]["data"]["nickname"], "🔗 磁链预览");
        assert_eq!(messages[0]["data"]["user_id"], "10000");
        assert_eq!(messages[0]["data"]["content"][0]["data"]["text"], "line");
        assert_eq!(
            messages[1]["data"]["content"][0]["data"]["file"],
            "base64://aW1n"
        );
    }

    #[test]
    fn test_response_status() {
        let ok: ActionResponse =
            serde_json::from_value(json!({ "status": "ok", "retcode": 0, "data": null, "echo": "a" }))
                .unwrap();
        assert!(ok.is_ok());
        assert_eq!(ok.echo.as_deref(), Some("a"));

        let failed: ActionResponse = serde_json::from_value(json!({
            "status": "failed", "retcode": 1200, "message": "msg not found", "wording": "消息不存在"
        }))
        .unwrap();
        assert!(!failed.is_ok());
        assert_eq!(failed.error_message(), "消息不存在");

        let missing_status: ActionResponse =
            serde_json::from_value(json!({ "retcode": 0, "echo": "b" })).unwrap();
        assert!(!missing_status.is_ok());

        let queued: ActionResponse =
            serde_json::from_value(json!({ "status": "async", "retcode": 1 })).unwrap();
        assert!(!queued.is_ok());
    }

    #[test]
    fn test_segment_accessors() {
        let reply: Segment =
            serde_json::from_value(json!({ "type": "reply", "data": { "id": 991 } })).unwrap();
        assert_eq!(reply.reply_id().as_deref(), Some("991"));
        assert_eq!(reply.as_text(), None);

        let forward: Segment =
            serde_json::from_value(json!({ "type": "forward", "data": { "id": "fw1" } })).unwrap();
        assert_eq!(forward.forward_id().as_deref(), Some("fw1"));

        assert_eq!(Segment::text("hi").as_text(), Some("hi"));
    }
}
