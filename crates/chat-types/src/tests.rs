#[cfg(test)]
mod tests {
    use crate::message::*;
    use crate::event::*;
    use crate::wire::*;
    use crate::config::*;
    use crate::error::*;
    use serde_json::json;

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_user() {
        let msg = Message::user("Plan my trip");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Plan my trip");
        assert!(msg.is_user());
    }

    #[test]
    fn test_message_assistant() {
        let msg = Message::assistant("Try Lekki in July");
        assert_eq!(msg.role, Role::Assistant);
        assert!(!msg.is_user());
    }

    #[test]
    fn test_message_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..50).map(|_| Message::user("x").id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_message_id_is_uuid() {
        let msg = Message::user("x");
        assert!(uuid::Uuid::parse_str(&msg.id).is_ok());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_message_json_shape() {
        let msg = Message::user("hi");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"], "hi");
        assert_eq!(value["id"], msg.id.as_str());
    }

    // ─── Wire Tests ──────────────────────────────────────────

    #[test]
    fn test_chat_request_body() {
        let req = ChatRequest::new("Plan my trip", "abc-123");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"message": "Plan my trip", "session_id": "abc-123"}));
    }

    #[test]
    fn test_reply_without_intent_is_unclassified() {
        let reply: ChatReply = serde_json::from_str(r#"{"response": "Try Lekki in July"}"#).unwrap();
        assert!(!reply.has_intent());
        assert_eq!(reply.into_content().unwrap(), ReplyContent::Unclassified);
    }

    #[test]
    fn test_reply_with_intent_is_answer() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"intent": "lodging", "response": "Try Lekki in July"}"#).unwrap();
        assert_eq!(
            reply.into_content().unwrap(),
            ReplyContent::Answer("Try Lekki in July".to_string())
        );
    }

    #[test]
    fn test_reply_falsy_intents() {
        for intent in [json!(null), json!(false), json!(0), json!("")] {
            let reply = ChatReply { intent: Some(intent.clone()), response: Some("r".into()) };
            assert!(!reply.has_intent(), "{} should not count as an intent", intent);
        }
    }

    #[test]
    fn test_reply_truthy_intents() {
        for intent in [json!(true), json!(1), json!("events"), json!({"name": "x"}), json!([])] {
            let reply = ChatReply { intent: Some(intent.clone()), response: Some("r".into()) };
            assert!(reply.has_intent(), "{} should count as an intent", intent);
        }
    }

    #[test]
    fn test_reply_intent_without_response_is_malformed() {
        let reply: ChatReply = serde_json::from_str(r#"{"intent": "events"}"#).unwrap();
        let err = reply.into_content().unwrap_err();
        assert!(matches!(err, ChatError::MalformedReply(_)));
        assert!(err.is_transport());
    }

    #[test]
    fn test_reply_ignores_unknown_fields() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"intent": "events", "response": "ok", "confidence": 0.9}"#).unwrap();
        assert!(reply.has_intent());
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "timestamp": "2025-01-01T00:00:00", "service": "Lagos Travel Guide"}"#,
        )
        .unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.service.as_deref(), Some("Lagos Travel Guide"));

        let down: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!down.is_healthy());
        assert!(down.timestamp.is_none());
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_event_tagged_serialization() {
        let event = ChatEvent::TurnStart { turn_id: 7 };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({"type": "TurnStart", "turn_id": 7}));
    }

    #[test]
    fn test_event_message_appended_carries_message() {
        let msg = Message::assistant("hello");
        let event = ChatEvent::MessageAppended { message: msg.clone() };
        let json = serde_json::to_string(&event).unwrap();
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ChatEvent::MessageAppended { message: msg });
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.storage_key, "travel_chat_session_id");
        assert_eq!(config.overlap, OverlapPolicy::Reject);
        assert_eq!(config.stale_replies, StaleReplyPolicy::Discard);
        assert_eq!(config.backend.request_timeout_ms, None);
        assert_eq!(config.error_text, DEFAULT_ERROR_TEXT);
        assert_ne!(config.fallback_text, config.error_text);
    }

    #[test]
    fn test_fallback_text_lists_capabilities() {
        for topic in ["Events", "Where to stay", "plan my trip", "Outfit"] {
            assert!(DEFAULT_FALLBACK_TEXT.contains(topic), "missing {}", topic);
        }
    }

    #[test]
    fn test_config_partial_json() {
        let config: ChatConfig = serde_json::from_str(
            r#"{"api_base": "https://api.example.com/", "overlap": "queue"}"#,
        )
        .unwrap();
        assert_eq!(config.overlap, OverlapPolicy::Queue);
        assert_eq!(config.backend.chat_path, "/chat");
        assert_eq!(config.backend.chat_url(), "https://api.example.com/chat");
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_config_flat_endpoint_fields() {
        let config: ChatConfig = serde_json::from_str(
            r#"{"api_base": "https://x", "health_path": "/status", "request_timeout_ms": 5000}"#,
        )
        .unwrap();
        assert_eq!(config.backend.chat_url(), "https://x/chat");
        assert_eq!(config.backend.health_url(), "https://x/status");
        assert_eq!(config.backend.request_timeout_ms, Some(5000));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["api_base"], "https://x");
        assert!(json.get("backend").is_none());
        let back: ChatConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_config_empty_object() {
        let config: ChatConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn test_backend_urls() {
        let backend = BackendConfig::default();
        assert_eq!(backend.chat_url(), "/chat");
        assert_eq!(backend.health_url(), "/health");

        let backend = BackendConfig {
            api_base: "http://localhost:5000".to_string(),
            chat_path: "chat".to_string(),
            ..BackendConfig::default()
        };
        assert_eq!(backend.chat_url(), "http://localhost:5000/chat");
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        assert_eq!(ChatError::Timeout(5000).to_string(), "Timeout after 5000ms");
        let e = ChatError::Http { status: 502, body: "bad gateway".to_string() };
        assert_eq!(e.to_string(), "HTTP 502: bad gateway");
    }

    #[test]
    fn test_error_transport_classification() {
        assert!(ChatError::Network("down".into()).is_transport());
        assert!(ChatError::Timeout(1).is_transport());
        assert!(ChatError::Http { status: 500, body: String::new() }.is_transport());
        assert!(!ChatError::Storage("quota".into()).is_transport());
        assert!(!ChatError::Config("bad".into()).is_transport());
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: ChatError = serde_json::from_str::<ChatReply>("{not json").unwrap_err().into();
        assert!(matches!(err, ChatError::Serialization(_)));
    }
}
