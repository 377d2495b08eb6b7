use super::*;

// ===== chat completions =====

#[test]
fn cc_parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "Hello!" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.content, vec![ContentBlock::Text { text: "Hello!".into() }]);
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn cc_parse_length_cutoff() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{ "message": { "content": "partial" }, "finish_reason": "length" }]
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.stop_reason, "max_tokens");
    assert_eq!(resp.input_tokens, 0);
}

#[test]
fn cc_parse_null_content_yields_no_blocks() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{ "message": { "content": null }, "finish_reason": "stop" }]
    })
    .to_string();
    assert!(parse_chat_completions_response(&json).unwrap().content.is_empty());
}

#[test]
fn cc_parse_missing_choices() {
    let json = serde_json::json!({ "model": "gpt-4o", "choices": [] }).to_string();
    assert!(matches!(parse_chat_completions_response(&json), Err(LlmError::ApiParse(_))));
}

#[test]
fn cc_messages_lead_with_system() {
    let messages = [Message::user("hi")];
    let built = build_chat_completions_messages("be brief", &messages);
    assert_eq!(
        built,
        vec![CcMessage { role: "system", content: "be brief" }, CcMessage { role: "user", content: "hi" }]
    );
}

#[test]
fn cc_messages_skip_blank_system() {
    let messages = [Message::user("hi")];
    assert_eq!(build_chat_completions_messages("  ", &messages).len(), 1);
}

// ===== responses API =====

#[test]
fn resp_parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output": [
            { "type": "reasoning", "summary": [] },
            { "type": "message", "content": [{ "type": "output_text", "text": "Done!" }] }
        ],
        "usage": { "input_tokens": 15, "output_tokens": 8 }
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.content, vec![ContentBlock::Text { text: "Done!".into() }]);
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 15);
}

#[test]
fn resp_parse_output_text_fallback() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output_text": "Fallback text",
        "usage": { "input_tokens": 5, "output_tokens": 3 }
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.text(), "Fallback text");
}

#[test]
fn resp_parse_incomplete_marks_max_tokens() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output": [],
        "incomplete_details": { "reason": "max_output_tokens" }
    })
    .to_string();
    assert_eq!(parse_responses_response(&json).unwrap().stop_reason, "max_tokens");
}

#[test]
fn resp_input_wraps_text() {
    let messages = [Message::user("hi")];
    let json = serde_json::to_value(build_responses_input(&messages)).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{ "type": "message", "role": "user", "content": [{ "type": "input_text", "text": "hi" }] }])
    );
}
