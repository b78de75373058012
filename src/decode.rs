use serde_json::Value as JsonValue;

use crate::{
    Assistant, AssistantMode, Message, Payload, Result, SolomonError, ASSISTANT_BUILDER_NAME,
};

/// Flattens a message listing into [`Message`]s sorted by `created_at`.
///
/// Accepts either a bare array or an object with a `data` array.
pub(crate) fn decode_messages(payload: Payload) -> Result<Vec<Message>> {
    let value = match payload {
        Payload::Json(value) => value,
        Payload::Text(body) => {
            return Err(SolomonError::Decode(format!(
                "expected JSON message list, got text: {body}"
            )))
        }
    };

    let items = match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut object) => match object.remove("data") {
            Some(JsonValue::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let mut messages: Vec<Message> = items.iter().map(decode_message).collect();
    messages.sort_by_key(|message| message.created_at);
    Ok(messages)
}

fn decode_message(raw: &JsonValue) -> Message {
    let role = raw
        .get("role")
        .and_then(JsonValue::as_str)
        .filter(|role| !role.is_empty())
        .unwrap_or("unknown");
    let value = raw
        .pointer("/content/0/text/value")
        .and_then(JsonValue::as_str)
        .unwrap_or_default();
    let created_at = raw
        .get("created_at")
        .and_then(|value| value.as_i64().or_else(|| value.as_f64().map(|f| f as i64)))
        .unwrap_or(0);
    let assistant_id = raw
        .get("assistant_id")
        .and_then(JsonValue::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_owned);

    Message {
        role: role.to_owned(),
        value: value.to_owned(),
        created_at,
        assistant_id,
        assistant_name: None,
    }
}

pub(crate) fn filter_assistants(mode: AssistantMode, assistants: Vec<Assistant>) -> Vec<Assistant> {
    match mode {
        AssistantMode::Workforce => assistants,
        AssistantMode::Builder => assistants
            .into_iter()
            .filter(|assistant| assistant.name == ASSISTANT_BUILDER_NAME)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{decode, Assistant, AssistantMode, Payload, SolomonError};

    #[test]
    fn messages_from_data_envelope_are_sorted() {
        let payload = Payload::Json(json!({
            "data": [
                {
                    "role": "assistant",
                    "created_at": 20,
                    "assistant_id": "asst_1",
                    "content": [{ "type": "text", "text": { "value": "Hello!" } }]
                },
                {
                    "role": "user",
                    "created_at": 10,
                    "content": [{ "type": "text", "text": { "value": "Hi" } }]
                }
            ]
        }));

        let messages = decode::decode_messages(payload).expect("must decode");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].value, "Hi");
        assert_eq!(messages[1].assistant_id.as_deref(), Some("asst_1"));
        assert_eq!(messages[1].value, "Hello!");
    }

    #[test]
    fn messages_fill_defaults_for_missing_fields() {
        let payload = Payload::Json(json!([{ "content": [] }]));
        let messages = decode::decode_messages(payload).expect("must decode");

        assert_eq!(messages[0].role, "unknown");
        assert_eq!(messages[0].value, "");
        assert_eq!(messages[0].created_at, 0);
        assert_eq!(messages[0].assistant_id, None);
    }

    #[test]
    fn object_without_data_is_empty_listing() {
        let messages =
            decode::decode_messages(Payload::Json(json!({"status": "ok"}))).expect("must decode");
        assert!(messages.is_empty());
    }

    #[test]
    fn text_listing_is_decode_error() {
        let err = decode::decode_messages(Payload::Text("<html>".to_owned())).expect_err("must fail");
        assert!(matches!(err, SolomonError::Decode(_)));
    }

    #[test]
    fn builder_mode_keeps_only_builder_assistant() {
        let assistants = vec![
            Assistant {
                id: "a".to_owned(),
                name: "Researcher".to_owned(),
                metadata: None,
            },
            Assistant {
                id: "b".to_owned(),
                name: "Assistant Builder".to_owned(),
                metadata: None,
            },
        ];

        let builder = decode::filter_assistants(AssistantMode::Builder, assistants.clone());
        assert_eq!(builder.len(), 1);
        assert_eq!(builder[0].id, "b");
        assert_eq!(
            decode::filter_assistants(AssistantMode::Workforce, assistants).len(),
            2
        );
    }
}
