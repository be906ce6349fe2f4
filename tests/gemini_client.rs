#![cfg(feature = "gemini")]

use financial_ratio_analyst::llm::{ChatAssistant, Conversation, GeminiClient, Narrator, TextModel};
use financial_ratio_analyst::*;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-1.5-flash-latest:generateContent";

fn settings_with_key(key: &str) -> (Settings, tempfile::NamedTempFile) {
    let mut secrets = tempfile::NamedTempFile::new().unwrap();
    writeln!(secrets, "RATIO_ANALYST_WIREMOCK_KEY = \"{}\"", key).unwrap();

    let settings = Settings {
        secrets: SecretStore::new("RATIO_ANALYST_WIREMOCK_KEY").with_secrets_file(secrets.path()),
        ..Settings::default()
    };
    (settings, secrets)
}

fn text_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

fn table() -> AnalyzedTable {
    compute_ratios(&[
        LineItem::new("TỔNG CỘNG TÀI SẢN", 1000.0, 1200.0),
        LineItem::new("TÀI SẢN NGẮN HẠN", 400.0, 600.0),
        LineItem::new("NỢ NGẮN HẠN", 200.0, 300.0),
    ])
    .unwrap()
}

#[tokio::test]
async fn test_generate_sends_key_and_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(query_param("key", "test-key"))
        .and(body_string_contains("hello model"))
        .respond_with(text_reply("hello human"))
        .expect(1)
        .mount(&server)
        .await;

    let (settings, _secrets) = settings_with_key("test-key");
    let client = GeminiClient::new(&settings).with_base_url(server.uri());

    assert_eq!(client.generate("hello model").await.unwrap(), "hello human");
}

#[tokio::test]
async fn test_server_error_maps_to_external_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .mount(&server)
        .await;

    let (settings, _secrets) = settings_with_key("test-key");
    let client = GeminiClient::new(&settings).with_base_url(server.uri());

    match client.generate("anything").await {
        Err(AnalysisError::ExternalService(msg)) => {
            assert!(msg.contains("429"));
            assert!(msg.contains("RESOURCE_EXHAUSTED"));
        }
        other => panic!("expected ExternalService, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_key_maps_to_credential_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{ "reason": "API_KEY_INVALID" }]
            }
        })))
        .mount(&server)
        .await;

    let (settings, _secrets) = settings_with_key("bad-key");
    let client = GeminiClient::new(&settings).with_base_url(server.uri());

    assert!(matches!(
        client.generate("anything").await,
        Err(AnalysisError::Credential(_))
    ));
}

#[tokio::test]
async fn test_blocked_prompt_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let (settings, _secrets) = settings_with_key("test-key");
    let client = GeminiClient::new(&settings).with_base_url(server.uri());

    match client.generate("anything").await {
        Err(AnalysisError::ExternalService(msg)) => assert!(msg.contains("SAFETY")),
        other => panic!("expected ExternalService, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_key_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_reply("should not be called"))
        .expect(0)
        .mount(&server)
        .await;

    let settings = Settings {
        secrets: SecretStore::new("RATIO_ANALYST_WIREMOCK_UNSET_KEY"),
        ..Settings::default()
    };
    let client = GeminiClient::new(&settings).with_base_url(server.uri());

    let summary = Narrator::new(client.clone()).summarize(&table()).await;
    assert!(summary.starts_with("Error: no usable API key"));

    let mut conversation = Conversation::new();
    let err = ChatAssistant::new(client)
        .ask(&mut conversation, &table(), "Is liquidity healthy?")
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Credential(_)));
    assert_eq!(conversation.len(), 1);
}

#[tokio::test]
async fn test_narrator_and_chat_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_string_contains("User question"))
        .respond_with(text_reply("The current ratio is 2.00 in both years."))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(text_reply("Total assets grew 20%."))
        .mount(&server)
        .await;

    let (settings, _secrets) = settings_with_key("test-key");
    let client = GeminiClient::new(&settings).with_base_url(server.uri());
    let table = table();

    let summary = Narrator::new(client.clone()).summarize(&table).await;
    assert_eq!(summary, "Total assets grew 20%.");

    let mut conversation = Conversation::new();
    let reply = ChatAssistant::new(client)
        .ask(&mut conversation, &table, "Is liquidity healthy?")
        .await
        .unwrap();
    assert_eq!(reply.content, "The current ratio is 2.00 in both years.");
    assert_eq!(conversation.len(), 3);
}
