//! Ollama provider wire format tests.

use serde_json::json;

use leadhunter::providers::ollama::{
    build_request, parse_response, OllamaProvider, DEFAULT_OLLAMA_URL,
};
use leadhunter::providers::{
    CompletionRequest, GroundingHint, LlmProvider, Message, Role, StopReason,
};

fn simple_request() -> CompletionRequest {
    CompletionRequest {
        messages: vec![Message::user("Hello")],
        system: Some("You are helpful.".to_owned()),
        max_tokens: Some(512),
        ..CompletionRequest::default()
    }
}

#[test]
fn build_request_injects_system_message() {
    let req = build_request("qwen3:8b", &simple_request());
    assert_eq!(req.model, "qwen3:8b");
    assert_eq!(req.messages.len(), 2); // system + user
    assert_eq!(req.messages[0].role, "system");
    assert_eq!(req.messages[0].content, "You are helpful.");
    assert_eq!(req.messages[1].role, "user");
    assert!(!req.stream);
}

#[test]
fn build_request_maps_roles() {
    let request = CompletionRequest {
        messages: vec![
            Message::user("usr"),
            Message {
                role: Role::Assistant,
                content: "ast".to_owned(),
            },
        ],
        ..CompletionRequest::default()
    };
    let req = build_request("model", &request);
    assert_eq!(req.messages[0].role, "user");
    assert_eq!(req.messages[1].role, "assistant");
    assert!(req.options.is_none());
}

#[test]
fn build_request_passes_schema_as_format() {
    let mut request = simple_request();
    let schema = json!({"type": "object", "required": ["subject"]});
    request.response_schema = Some(schema.clone());
    request.temperature = Some(0.3);

    let req = build_request("model", &request);
    assert_eq!(req.format, Some(schema));
    let opts = req.options.expect("options should exist");
    assert_eq!(opts.num_predict, Some(512));
    assert_eq!(opts.temperature, Some(0.3));
}

#[test]
fn parse_response_text_only() {
    let body = json!({
        "message": {"role": "assistant", "content": "Hello!"},
        "model": "qwen3:8b",
        "done_reason": "stop",
        "prompt_eval_count": 10,
        "eval_count": 5
    });
    let resp = parse_response(&body.to_string()).expect("should parse");
    assert_eq!(resp.text, "Hello!");
    assert_eq!(resp.stop_reason, StopReason::EndTurn);
    assert_eq!(resp.usage.input_tokens, 10);
    assert_eq!(resp.usage.output_tokens, 5);
}

#[test]
fn parse_response_length_is_max_tokens() {
    let body = json!({
        "message": {"role": "assistant", "content": "cut"},
        "model": "m",
        "done_reason": "length"
    });
    let resp = parse_response(&body.to_string()).expect("should parse");
    assert_eq!(resp.stop_reason, StopReason::MaxTokens);
    assert_eq!(resp.usage.input_tokens, 0);
}

#[test]
fn parse_response_invalid_json() {
    assert!(parse_response("not json").is_err());
}

#[test]
fn ollama_provider_defaults() {
    let provider = OllamaProvider::new("ollama/qwen3:8b".to_owned(), "qwen3:8b".to_owned());
    assert_eq!(provider.model, "qwen3:8b");
    assert_eq!(provider.base_url, DEFAULT_OLLAMA_URL);
    assert!(!provider.supports_grounding(GroundingHint::Maps));
}
