use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use super::error::{OneBotError, OneBotResult};
use super::payloads::{ActionResponse, EventPayload, Segment};
use crate::domain::entities::{IncomingMessage, MessageBody, MessagePart};

#[allow(clippy::unwrap_used)]
static CQ_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[CQ:[^\]]*\]").unwrap());

#[allow(clippy::unwrap_used)]
static CQ_REPLY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[CQ:reply,(?:[^\]]*,)?id=(-?[0-9A-Za-z_]+)").unwrap());

/// A decoded WebSocket frame.
#[derive(Debug, Clone)]
pub enum Frame {
    Response(ActionResponse),
    Event(InboundEvent),
}

/// Events the client cares about.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Message(IncomingMessage),
    Lifecycle { self_id: Option<String> },
    Heartbeat,
    Ignored { post_type: String },
}

/// Decodes inbound frames and fetched message bodies.
pub struct EventParser;

impl EventParser {
    pub fn parse_frame(text: &str) -> OneBotResult<Frame> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| OneBotError::serialization(e.to_string()))?;

        if value.get("post_type").is_some() {
            let payload: EventPayload = serde_json::from_value(value)
                .map_err(|e| OneBotError::serialization(e.to_string()))?;
            return Ok(Frame::Event(Self::classify(payload)));
        }

        if value.get("echo").is_some() || value.get("retcode").is_some() {
            let response: ActionResponse = serde_json::from_value(value)
                .map_err(|e| OneBotError::serialization(e.to_string()))?;
            return Ok(Frame::Response(response));
        }

        Err(OneBotError::protocol("frame is neither an event nor a response"))
    }

    fn classify(payload: EventPayload) -> InboundEvent {
        match payload.post_type.as_str() {
            "message" => Self::to_incoming(payload).map_or_else(
                || InboundEvent::Ignored {
                    post_type: "message".to_string(),
                },
                InboundEvent::Message,
            ),
            "meta_event" => match payload.meta_event_type.as_deref() {
                Some("heartbeat") => InboundEvent::Heartbeat,
                Some("lifecycle") if payload.sub_type.as_deref() != Some("disable") => {
                    InboundEvent::Lifecycle {
                        self_id: payload.self_id,
                    }
                }
                _ => InboundEvent::Ignored {
                    post_type: payload.post_type,
                },
            },
            _ => InboundEvent::Ignored {
                post_type: payload.post_type,
            },
        }
    }

    fn to_incoming(payload: EventPayload) -> Option<IncomingMessage> {
        let message_id = payload.message_id?;
        let user_id = payload.user_id?;
        let group_id = match payload.message_type.as_deref() {
            Some("group") => Some(payload.group_id?),
            Some("private") => None,
            other => {
                trace!(message_type = ?other, "Unsupported message type");
                return None;
            }
        };

        let (text, reply_id) = match &payload.message {
            Value::Array(_) => {
                let segments = Self::segments(&payload.message);
                let text: String = segments.iter().filter_map(Segment::as_text).collect();
                let reply_id = segments.iter().find_map(Segment::reply_id);
                (text, reply_id)
            }
            Value::String(raw) => Self::parse_cq_string(raw),
            _ => payload
                .raw_message
                .as_deref()
                .map_or_else(|| (String::new(), None), Self::parse_cq_string),
        };

        Some(IncomingMessage {
            self_id: payload.self_id.unwrap_or_default(),
            message_id,
            user_id,
            group_id,
            text,
            reply_id,
        })
    }

    fn segments(value: &Value) -> Vec<Segment> {
        value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Splits a CQ-coded string into its plain text and quoted message ID.
    #[must_use]
    pub fn parse_cq_string(raw: &str) -> (String, Option<String>) {
        let reply_id = CQ_REPLY_REGEX
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        let text = unescape_cq(&CQ_CODE_REGEX.replace_all(raw, ""));
        (text, reply_id)
    }

    /// Reads the body of a `get_msg` result.
    #[must_use]
    pub fn parse_message_body(data: &Value) -> MessageBody {
        match data.get("message") {
            Some(Value::String(raw)) => MessageBody::Raw(raw.clone()),
            Some(message @ Value::Array(_)) => Self::body_from_segments(message),
            _ => MessageBody::Raw(
                data.get("raw_message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            ),
        }
    }

    /// Reads node bodies out of a `get_forward_msg` result.
    ///
    /// Implementations disagree on the shape: nodes may sit under
    /// `messages` or `message`, and carry their segments in `content`,
    /// `message`, or a nested `data.content`.
    #[must_use]
    pub fn parse_forward_nodes(data: &Value) -> Vec<MessageBody> {
        let nodes = match data {
            Value::Array(nodes) => Some(nodes),
            _ => data
                .get("messages")
                .or_else(|| data.get("message"))
                .and_then(Value::as_array),
        };

        nodes
            .map(|nodes| nodes.iter().filter_map(Self::node_body).collect())
            .unwrap_or_default()
    }

    fn node_body(node: &Value) -> Option<MessageBody> {
        let content = node
            .get("message")
            .or_else(|| node.get("content"))
            .or_else(|| node.get("data").and_then(|d| d.get("content")))?;

        match content {
            Value::String(raw) => Some(MessageBody::Raw(raw.clone())),
            Value::Array(_) => Some(Self::body_from_segments(content)),
            _ => None,
        }
    }

    fn body_from_segments(value: &Value) -> MessageBody {
        let parts = Self::segments(value)
            .into_iter()
            .map(|segment| {
                if let Some(text) = segment.as_text() {
                    MessagePart::Text(text.to_string())
                } else if let Some(id) = segment.forward_id() {
                    MessagePart::Forward { id }
                } else {
                    MessagePart::Other
                }
            })
            .collect();
        MessageBody::Parts(parts)
    }
}

fn unescape_cq(text: &str) -> String {
    text.replace("&#91;", "[")
        .replace("&#93;", "]")
        .replace("&#44;", ",")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(value: &Value) -> Frame {
        EventParser::parse_frame(&value.to_string()).unwrap()
    }

    #[test]
    fn test_parse_group_message_event() {
        let event = json!({
            "post_type": "message",
            "message_type": "group",
            "self_id": 10000,
            "message_id": -2147483000,
            "user_id": 20000,
            "group_id": 30000,
            "message": [
                { "type": "reply", "data": { "id": "555" } },
                { "type": "at", "data": { "qq": "10000" } },
                { "type": "text", "data": { "text": " /磁链 " } },
                { "type": "text", "data": { "text": "2" } }
            ],
            "raw_message": "[CQ:reply,id=555][CQ:at,qq=10000] /磁链 2"
        });

        let Frame::Event(InboundEvent::Message(message)) = frame(&event) else {
            panic!("expected message event");
        };
        assert_eq!(message.self_id, "10000");
        assert_eq!(message.message_id, "-2147483000");
        assert_eq!(message.group_id.as_deref(), Some("30000"));
        assert_eq!(message.text, " /磁链 2");
        assert_eq!(message.reply_id.as_deref(), Some("555"));
    }

    #[test]
    fn test_parse_private_string_message() {
        let event = json!({
            "post_type": "message",
            "message_type": "private",
            "self_id": "10000",
            "message_id": 7,
            "user_id": 20000,
            "message": "[CQ:reply,id=42]look &#91;here&#93; magnet:?xt=urn:btih:abc"
        });

        let Frame::Event(InboundEvent::Message(message)) = frame(&event) else {
            panic!("expected message event");
        };
        assert!(message.is_private());
        assert_eq!(message.text, "look [here] magnet:?xt=urn:btih:abc");
        assert_eq!(message.reply_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_group_message_without_group_id_is_ignored() {
        let event = json!({
            "post_type": "message",
            "message_type": "group",
            "message_id": 1,
            "user_id": 2,
            "message": []
        });
        assert!(matches!(frame(&event), Frame::Event(InboundEvent::Ignored { .. })));
    }

    #[test]
    fn test_parse_meta_events() {
        let lifecycle = json!({
            "post_type": "meta_event",
            "meta_event_type": "lifecycle",
            "sub_type": "connect",
            "self_id": 10000
        });
        assert!(matches!(
            frame(&lifecycle),
            Frame::Event(InboundEvent::Lifecycle { self_id: Some(ref id) }) if id == "10000"
        ));

        let heartbeat = json!({ "post_type": "meta_event", "meta_event_type": "heartbeat" });
        assert!(matches!(frame(&heartbeat), Frame::Event(InboundEvent::Heartbeat)));

        let notice = json!({ "post_type": "notice", "notice_type": "group_increase" });
        assert!(matches!(frame(&notice), Frame::Event(InboundEvent::Ignored { .. })));
    }

    #[test]
    fn test_parse_response_frame() {
        let response = json!({ "status": "ok", "retcode": 0, "data": { "message_id": 1 }, "echo": "abc" });
        let Frame::Response(response) = frame(&response) else {
            panic!("expected response");
        };
        assert_eq!(response.echo.as_deref(), Some("abc"));
        assert!(response.is_ok());
    }

    #[test]
    fn test_invalid_frames() {
        assert!(matches!(
            EventParser::parse_frame("not json"),
            Err(OneBotError::SerializationError { .. })
        ));
        assert!(matches!(
            EventParser::parse_frame("{\"foo\":1}"),
            Err(OneBotError::ProtocolError { .. })
        ));
    }

    #[test]
    fn test_parse_message_body() {
        let data = json!({
            "message": [
                { "type": "text", "data": { "text": "hash " } },
                { "type": "image", "data": { "file": "x.jpg" } },
                { "type": "forward", "data": { "id": "fw" } }
            ]
        });
        assert_eq!(
            EventParser::parse_message_body(&data),
            MessageBody::Parts(vec![
                MessagePart::Text("hash ".to_string()),
                MessagePart::Other,
                MessagePart::Forward { id: "fw".to_string() },
            ])
        );

        let raw = json!({ "message": "[CQ:face,id=1]hi" });
        assert_eq!(
            EventParser::parse_message_body(&raw),
            MessageBody::Raw("[CQ:face,id=1]hi".to_string())
        );
    }

    #[test]
    fn test_parse_forward_node_shapes() {
        let data = json!({
            "messages": [
                { "sender": { "user_id": 1 }, "content": [{ "type": "text", "data": { "text": "a" } }] },
                { "message": [{ "type": "text", "data": { "text": "b" } }] },
                { "type": "node", "data": { "content": [{ "type": "text", "data": { "text": "c" } }] } },
                { "content": "raw d" },
                { "sender": {} }
            ]
        });

        let bodies = EventParser::parse_forward_nodes(&data);
        let texts: Vec<Vec<&str>> = bodies.iter().map(MessageBody::texts).collect();
        assert_eq!(texts, vec![vec!["a"], vec!["b"], vec!["c"], vec!["raw d"]]);
    }

    #[test]
    fn test_forward_node_prefers_message_over_content() {
        let data = json!([{
            "message": [{ "type": "text", "data": { "text": "from message" } }],
            "content": [{ "type": "text", "data": { "text": "from content" } }]
        }]);

        let bodies = EventParser::parse_forward_nodes(&data);
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].texts(), vec!["from message"]);
    }
}
