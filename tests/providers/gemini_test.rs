//! Gemini provider wire format and round-trip tests.

use std::time::Duration;

use serde_json::json;

use leadhunter::providers::gemini::{
    build_request, parse_response, to_gemini_schema, GeminiProvider, DEFAULT_GEMINI_URL,
};
use leadhunter::providers::{
    CompletionRequest, GroundingHint, LlmProvider, Message, ProviderError, StopReason,
};

use crate::http_response_test::serve_once;

#[test]
fn build_request_plain_prompt_has_no_generation_config() {
    let req = build_request(&CompletionRequest::prompt("hello"));
    let wire = serde_json::to_value(&req).expect("serializes");
    assert_eq!(wire["contents"][0]["role"], "user");
    assert_eq!(wire["contents"][0]["parts"][0]["text"], "hello");
    assert!(wire.get("generationConfig").is_none());
    assert!(wire.get("tools").is_none());
    assert!(wire.get("systemInstruction").is_none());
}

#[test]
fn build_request_maps_schema_and_mime_type() {
    let mut request = CompletionRequest::prompt("draft");
    request.response_schema = Some(json!({
        "type": "object",
        "properties": {"subject": {"type": "string"}},
        "required": ["subject"]
    }));
    request.max_tokens = Some(2048);

    let wire = serde_json::to_value(build_request(&request)).expect("serializes");
    let config = &wire["generationConfig"];
    assert_eq!(config["responseMimeType"], "application/json");
    assert_eq!(config["maxOutputTokens"], 2048);
    assert_eq!(config["responseSchema"]["type"], "OBJECT");
    assert_eq!(
        config["responseSchema"]["properties"]["subject"]["type"],
        "STRING"
    );
    assert_eq!(config["responseSchema"]["required"][0], "subject");
}

#[test]
fn build_request_maps_grounding_and_system() {
    let request = CompletionRequest {
        messages: vec![Message::user("find dentists")],
        system: Some("be precise".to_owned()),
        grounding: vec![GroundingHint::Maps, GroundingHint::Search],
        temperature: Some(0.3),
        ..CompletionRequest::default()
    };
    let wire = serde_json::to_value(build_request(&request)).expect("serializes");
    assert_eq!(wire["tools"], json!([{"googleMaps": {}}, {"googleSearch": {}}]));
    assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "be precise");
    let temperature = wire["generationConfig"]["temperature"]
        .as_f64()
        .expect("temperature is a number");
    assert!((temperature - 0.3).abs() < 1e-6);
}

#[test]
fn schema_conversion_leaves_property_names_alone() {
    let converted = to_gemini_schema(&json!({
        "type": "object",
        "properties": {"type": {"type": "string"}}
    }));
    assert_eq!(converted["properties"]["type"]["type"], "STRING");
}

#[test]
fn parse_response_joins_text_parts() {
    let body = json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "[{\"name\":"}, {"text": "\"A\"}]"}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 7},
        "modelVersion": "gemini-2.5-flash-001"
    });
    let resp = parse_response(&body.to_string(), "gemini-2.5-flash").expect("should parse");
    assert_eq!(resp.text, "[{\"name\":\"A\"}]");
    assert_eq!(resp.stop_reason, StopReason::EndTurn);
    assert_eq!(resp.usage.input_tokens, 12);
    assert_eq!(resp.usage.output_tokens, 7);
    assert_eq!(resp.model, "gemini-2.5-flash-001");
}

#[test]
fn parse_response_maps_finish_reasons() {
    let body = json!({
        "candidates": [{"content": {"parts": [{"text": "cut"}]}, "finishReason": "MAX_TOKENS"}]
    });
    let resp = parse_response(&body.to_string(), "m").expect("should parse");
    assert_eq!(resp.stop_reason, StopReason::MaxTokens);
    assert_eq!(resp.model, "m");
}

#[test]
fn parse_response_blocked_prompt_is_unavailable() {
    let body = json!({"promptFeedback": {"blockReason": "SAFETY"}});
    let result = parse_response(&body.to_string(), "m");
    assert!(matches!(result, Err(ProviderError::Unavailable(reason)) if reason.contains("SAFETY")));
}

#[test]
fn parse_response_invalid_json() {
    assert!(matches!(
        parse_response("not json", "m"),
        Err(ProviderError::Parse(_))
    ));
}

#[test]
fn endpoint_and_debug_hide_the_key() {
    let provider = GeminiProvider::new(
        "gemini/gemini-2.5-flash".to_owned(),
        "gemini-2.5-flash".to_owned(),
        "secret-key".to_owned(),
    );
    assert_eq!(provider.base_url, DEFAULT_GEMINI_URL);
    assert_eq!(
        provider.endpoint(),
        format!("{DEFAULT_GEMINI_URL}/models/gemini-2.5-flash:generateContent")
    );
    let debug = format!("{provider:?}");
    assert!(!debug.contains("secret-key"));
    assert_eq!(provider.model_id(), "gemini/gemini-2.5-flash");
}

#[tokio::test]
async fn complete_round_trips_over_http() {
    let body = json!({
        "candidates": [{"content": {"parts": [{"text": "ok"}]}, "finishReason": "STOP"}]
    })
    .to_string();
    let url = serve_once("200 OK", "application/json", &body).await;

    let provider = GeminiProvider::new(
        "gemini/gemini-2.5-flash".to_owned(),
        "gemini-2.5-flash".to_owned(),
        "test-key".to_owned(),
    )
    .with_base_url(url)
    .with_timeout(Duration::from_secs(5));

    let resp = provider
        .complete(CompletionRequest::prompt("hi"))
        .await
        .expect("local call should succeed");
    assert_eq!(resp.text, "ok");
}

#[tokio::test]
async fn complete_surfaces_quota_errors() {
    let url = serve_once(
        "429 Too Many Requests",
        "application/json",
        "{\"error\":{\"status\":\"RESOURCE_EXHAUSTED\"}}",
    )
    .await;

    let provider = GeminiProvider::new(
        "gemini/gemini-2.5-flash".to_owned(),
        "gemini-2.5-flash".to_owned(),
        "test-key".to_owned(),
    )
    .with_base_url(url);

    match provider.complete(CompletionRequest::prompt("hi")).await {
        Err(ProviderError::HttpStatus { status, body }) => {
            assert_eq!(status, 429);
            assert!(body.contains("RESOURCE_EXHAUSTED"));
        }
        other => panic!("expected quota error, got: {other:?}"),
    }
}
