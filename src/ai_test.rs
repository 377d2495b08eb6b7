use std::sync::Mutex;

use uuid::Uuid;

use super::*;
use crate::consts::DEFAULT_REPORT_TOPIC;
use crate::doc::{ObjectRef, StickyColor};
use crate::engine::{Event, ReportState};
use crate::llm::types::{ChatResponse, ContentBlock};

// =========================================================================
// MockLlm
// =========================================================================

struct MockLlm {
    responses: Mutex<Vec<Result<ChatResponse, LlmError>>>,
    prompts: Mutex<Vec<(String, Vec<Message>)>>,
    /// When set, the mock edits this board mid-request.
    board: Option<SharedBoard>,
    /// Reset the report instead of posting chat while the request is out.
    reset_mid_request: bool,
}

impl MockLlm {
    fn new(responses: Vec<Result<ChatResponse, LlmError>>) -> Self {
        Self { responses: Mutex::new(responses), prompts: Mutex::new(Vec::new()), board: None, reset_mid_request: false }
    }

    fn replying(text: &str) -> Self {
        Self::new(vec![Ok(reply(text))])
    }

    fn failing(err: LlmError) -> Self {
        Self::new(vec![Err(err)])
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> (String, Vec<Message>) {
        self.prompts.lock().unwrap().last().cloned().unwrap()
    }
}

fn reply(text: &str) -> ChatResponse {
    ChatResponse {
        content: vec![ContentBlock::Text { text: text.into() }],
        model: "mock".into(),
        stop_reason: "end_turn".into(),
        input_tokens: 0,
        output_tokens: 0,
    }
}

#[async_trait::async_trait]
impl LlmChat for MockLlm {
    async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        assert_eq!(max_tokens, ai_max_tokens());
        self.prompts.lock().unwrap().push((system.to_string(), messages.to_vec()));
        if let Some(board) = &self.board {
            let mut core = board.write().await;
            if self.reset_mid_request {
                core.reset_report();
            } else {
                core.apply(Event::SendMessage { text: "typed while waiting".into(), at_ms: 0 });
            }
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() { Ok(reply("done")) } else { responses.remove(0) }
    }
}

fn sticky(content: &str, votes: u32, author: &str) -> StickyNote {
    StickyNote {
        id: Uuid::new_v4(),
        x: 0.0,
        y: 0.0,
        content: content.into(),
        color: StickyColor::Yellow,
        author_id: author.into(),
        votes,
    }
}

fn message(author: &str, content: &str) -> ChatMessage {
    ChatMessage { id: Uuid::new_v4(), author_id: author.into(), content: content.into(), timestamp: 0, reactions: vec![] }
}

// =========================================================================
// helpers
// =========================================================================

#[test]
fn first_line_skips_blank_and_quotes() {
    assert_eq!(first_line("\n\n  \"What's your spirit animal?\"  \nextra"), Some("What's your spirit animal?".into()));
    assert_eq!(first_line("  \n\t"), None);
}

#[test]
fn error_codes() {
    assert_eq!(AiError::EmptyResponse.error_code(), "E_EMPTY_RESPONSE");
    let err = AiError::from(LlmError::ApiResponse { status: 500, body: String::new() });
    assert_eq!(err.error_code(), "E_LLM_ERROR");
    assert!(err.retryable());
    assert!(!AiError::from(LlmError::MissingApiKey { var: "K".into() }).retryable());
}

// =========================================================================
// build_report_prompt
// =========================================================================

#[test]
fn report_prompt_ranks_stickies_by_votes() {
    let stickies = [sticky("low", 1, "me"), sticky("high", 9, "u1"), sticky("mid", 4, "u2")];
    let prompt = build_report_prompt("Retro", &stickies, &[]);
    assert!(prompt.starts_with("Session topic: Retro"));
    let high = prompt.find("\"high\"").unwrap();
    let mid = prompt.find("\"mid\"").unwrap();
    let low = prompt.find("\"low\"").unwrap();
    assert!(high < mid && mid < low);
    assert!(prompt.contains("(9 votes, by Guest Panda)"));
    assert!(prompt.contains("(1 vote, by Me)"));
}

#[test]
fn report_prompt_resolves_chat_authors_and_skips_system_lines() {
    let messages = [message("u2", "ship it"), message("system", "🧊 Breaking the ice..."), message("ghost", "boo")];
    let prompt = build_report_prompt("Retro", &[], &messages);
    assert!(prompt.contains("Guest Llama: ship it"));
    assert!(prompt.contains("Unknown: boo"));
    assert!(!prompt.contains("Breaking the ice"));
    assert!(prompt.contains("(none)"));
}

// =========================================================================
// requests
// =========================================================================

#[tokio::test]
async fn icebreaker_returns_first_line() {
    let llm = MockLlm::replying("What's your spirit animal?\n");
    let text = request_icebreaker(&llm).await.unwrap();
    assert_eq!(text, "What's your spirit animal?");
    let (system, messages) = llm.last_prompt();
    assert!(system.contains("facilitator"));
    assert!(messages[0].content.contains("icebreaker question"));
}

#[tokio::test]
async fn icebreaker_blank_reply_is_empty_response() {
    let llm = MockLlm::replying("   ");
    assert!(matches!(request_icebreaker(&llm).await, Err(AiError::EmptyResponse)));
}

#[tokio::test]
async fn report_asks_for_all_sections() {
    let llm = MockLlm::replying("## Session Highlights\nGreat jam.");
    let text = request_session_report(&llm, "Retro", &[sticky("idea", 2, "me")], &[]).await.unwrap();
    assert_eq!(text, "## Session Highlights\nGreat jam.");
    let (system, messages) = llm.last_prompt();
    for section in ["Session Highlights", "Top Ideas (by votes)", "Action Items", "Team Mood"] {
        assert!(system.contains(section), "missing section {section}");
    }
    assert!(messages[0].content.contains("\"idea\""));
}

#[tokio::test]
async fn report_propagates_llm_error() {
    let llm = MockLlm::failing(LlmError::ApiRequest("timed out".into()));
    let err = request_session_report(&llm, "Retro", &[], &[]).await.unwrap_err();
    assert!(matches!(err, AiError::Llm(LlmError::ApiRequest(_))));
}

// =========================================================================
// board drivers
// =========================================================================

#[tokio::test]
async fn run_icebreaker_rewrites_placeholder_in_place() {
    let board = shared(BoardCore::new());
    let llm = MockLlm::replying("What's your spirit animal?");
    let actions = run_icebreaker(&board, &llm).await;

    let core = board.read().await;
    let msgs = core.doc.messages().as_slice();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].content, "🧊 Icebreaker: What's your spirit animal?");
    assert!(msgs[0].is_system());
    assert_eq!(actions, vec![Action::MessagePosted(msgs[0].id), Action::MessageUpdated(msgs[0].id)]);
}

#[tokio::test]
async fn run_icebreaker_failure_is_visible() {
    let board = shared(BoardCore::new());
    let llm = MockLlm::failing(LlmError::ApiResponse { status: 503, body: "overloaded".into() });
    run_icebreaker(&board, &llm).await;

    let core = board.read().await;
    let content = &core.doc.messages().as_slice()[0].content;
    assert!(content.starts_with("🧊 Icebreaker unavailable: "));
    assert!(content.contains("503"));
}

#[tokio::test]
async fn run_icebreaker_releases_lock_while_waiting() {
    let board = shared(BoardCore::new());
    let mut llm = MockLlm::replying("Favorite snack?");
    llm.board = Some(Arc::clone(&board));
    run_icebreaker(&board, &llm).await;

    let core = board.read().await;
    let msgs = core.doc.messages().as_slice();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].content, "🧊 Icebreaker: Favorite snack?");
    assert_eq!(msgs[1].content, "typed while waiting");
}

#[tokio::test]
async fn run_report_caches_first_success() {
    let board = shared(BoardCore::with_welcome_content());
    let llm = MockLlm::new(vec![Ok(reply("first")), Ok(reply("second"))]);

    assert_eq!(run_report(&board, &llm, DEFAULT_REPORT_TOPIC).await, vec![Action::ReportChanged]);
    board.write().await.close_report();
    assert!(run_report(&board, &llm, DEFAULT_REPORT_TOPIC).await.is_empty());

    assert_eq!(llm.calls(), 1);
    let core = board.read().await;
    assert_eq!(core.ui.report, ReportState::Ready("first".into()));
    assert!(core.ui.report_open);
}

#[tokio::test]
async fn run_report_prompt_uses_board_snapshot() {
    let board = shared(BoardCore::with_welcome_content());
    let llm = MockLlm::replying("ok");
    run_report(&board, &llm, DEFAULT_REPORT_TOPIC).await;

    let (_, messages) = llm.last_prompt();
    let prompt = &messages[0].content;
    assert!(prompt.contains(&format!("Session topic: {DEFAULT_REPORT_TOPIC}")));
    assert!(prompt.find("Welcome to JamBoard AI!").unwrap() < prompt.find("Try dragging me around").unwrap());
}

#[tokio::test]
async fn run_report_failure_then_retry() {
    let board = shared(BoardCore::new());
    let llm = MockLlm::new(vec![Err(LlmError::ApiRequest("connection reset".into())), Ok(reply("recovered"))]);

    run_report(&board, &llm, "Retro").await;
    assert!(matches!(&board.read().await.ui.report, ReportState::Failed(msg) if msg.contains("connection reset")));

    run_report(&board, &llm, "Retro").await;
    assert_eq!(board.read().await.ui.report, ReportState::Ready("recovered".into()));
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn run_report_board_stays_usable_while_loading() {
    let board = shared(BoardCore::with_welcome_content());
    let mut llm = MockLlm::replying("summary");
    llm.board = Some(Arc::clone(&board));
    run_report(&board, &llm, "Retro").await;

    let core = board.read().await;
    assert_eq!(core.doc.messages().len(), 1);
    assert_eq!(core.ui.report, ReportState::Ready("summary".into()));
}

#[tokio::test]
async fn run_report_result_dropped_when_reset_mid_request() {
    let board = shared(BoardCore::new());
    let mut llm = MockLlm::new(vec![Ok(reply("outdated")), Ok(reply("current"))]);
    llm.board = Some(Arc::clone(&board));
    llm.reset_mid_request = true;

    assert!(run_report(&board, &llm, "Retro").await.is_empty());
    assert_eq!(board.read().await.ui.report, ReportState::Empty);

    llm.board = None;
    run_report(&board, &llm, "Retro").await;
    assert_eq!(board.read().await.ui.report, ReportState::Ready("current".into()));
}

#[tokio::test]
async fn reset_report_regenerates() {
    let board = shared(BoardCore::new());
    let llm = MockLlm::new(vec![Ok(reply("v1")), Ok(reply("v2"))]);
    run_report(&board, &llm, "Retro").await;
    board.write().await.reset_report();
    run_report(&board, &llm, "Retro").await;
    assert_eq!(board.read().await.ui.report, ReportState::Ready("v2".into()));
}

#[tokio::test]
async fn vote_during_report_does_not_leak_into_snapshot() {
    let board = shared(BoardCore::new());
    board.write().await.apply(Event::SetTool(crate::input::Tool::Sticky));
    board.write().await.apply(Event::PointerDown { point: crate::geom::Point::new(100.0, 100.0), target: None });
    let id = board.read().await.doc.stickies().as_slice()[0].id;

    let request = board.write().await.open_report("Retro").unwrap();
    board.write().await.apply(Event::Vote { id });
    assert_eq!(request.stickies[0].votes, 0);
    assert_eq!(board.read().await.doc.sticky(&id).unwrap().votes, 1);
    assert!(board.read().await.doc.contains(ObjectRef::sticky(id)));
}
