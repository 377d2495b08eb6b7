use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_to_anthropic() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[("LLM_API_KEY_ENV", "TEST_KEY"), ("TEST_KEY", "secret")])).unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::Anthropic);
    assert_eq!(cfg.model, "claude-sonnet-4-5-20250929");
    assert_eq!(cfg.openai_mode, OpenAiApiMode::Responses);
    assert_eq!(cfg.openai_base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(cfg.timeouts, LlmTimeouts::default());
    assert_eq!(cfg.api_key, "secret");
}

#[test]
fn parses_openai_overrides() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[
        ("LLM_PROVIDER", "openai"),
        ("LLM_API_KEY_ENV", "OPENAI_API_KEY"),
        ("OPENAI_API_KEY", "sk-test"),
        ("LLM_OPENAI_MODE", "chat_completions"),
        ("LLM_OPENAI_BASE_URL", "https://example.test/v1/"),
        ("LLM_REQUEST_TIMEOUT_SECS", "42"),
        ("LLM_CONNECT_TIMEOUT_SECS", "7"),
    ]))
    .unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::OpenAi);
    assert_eq!(cfg.model, "gpt-4o");
    assert_eq!(cfg.openai_mode, OpenAiApiMode::ChatCompletions);
    assert_eq!(cfg.openai_base_url, "https://example.test/v1");
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn explicit_model_wins() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[
        ("LLM_API_KEY_ENV", "K"),
        ("K", "v"),
        ("LLM_MODEL", "claude-haiku"),
    ]))
    .unwrap();
    assert_eq!(cfg.model, "claude-haiku");
}

#[test]
fn unknown_provider_errors() {
    let err = LlmConfig::from_lookup(lookup_from(&[
        ("LLM_PROVIDER", "bad"),
        ("LLM_API_KEY_ENV", "TEST_KEY"),
        ("TEST_KEY", "secret"),
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("unknown LLM_PROVIDER"));
}

#[test]
fn bad_openai_mode_errors() {
    let err = LlmConfig::from_lookup(lookup_from(&[
        ("LLM_API_KEY_ENV", "TEST_KEY"),
        ("TEST_KEY", "secret"),
        ("LLM_OPENAI_MODE", "streaming"),
    ]))
    .unwrap_err();
    assert!(matches!(err, LlmError::ConfigParse(_)));
}

#[test]
fn missing_key_env_names_the_pointer_var() {
    let err = LlmConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "LLM_API_KEY_ENV"));
}

#[test]
fn missing_or_blank_key_names_the_key_var() {
    let err = LlmConfig::from_lookup(lookup_from(&[("LLM_API_KEY_ENV", "ANTHROPIC_API_KEY")])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "ANTHROPIC_API_KEY"));

    let err = LlmConfig::from_lookup(lookup_from(&[("LLM_API_KEY_ENV", "K"), ("K", "  ")])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "K"));
}

#[test]
fn malformed_timeouts_fall_back_to_defaults() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[
        ("LLM_API_KEY_ENV", "K"),
        ("K", "v"),
        ("LLM_REQUEST_TIMEOUT_SECS", "soon"),
        ("LLM_CONNECT_TIMEOUT_SECS", "-1"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts, LlmTimeouts::default());
}

#[test]
fn parse_or_falls_back_on_garbage() {
    assert_eq!(parse_or::<u32>(Some("2048".into()), 1024), 2048);
    assert_eq!(parse_or::<u32>(Some(" 64 ".into()), 1024), 64);
    assert_eq!(parse_or::<u32>(Some("lots".into()), 1024), 1024);
    assert_eq!(parse_or::<u32>(None, 1024), 1024);
}

#[test]
fn env_parse_unset_key_uses_default() {
    assert_eq!(env_parse::<u64>("JAMBOARD_TEST_KEY_THAT_IS_NEVER_SET", 7), 7);
    assert_eq!(env_var("JAMBOARD_TEST_KEY_THAT_IS_NEVER_SET"), None);
}
