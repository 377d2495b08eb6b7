//! AI adapter: icebreaker questions and session reports over [`LlmChat`].
//!
//! DESIGN
//! ======
//! The request functions are pure prompt-in, text-out calls: they build a
//! prompt, send one chat request, and return the reply as opaque display
//! text. The `run_*` drivers glue them to a [`SharedBoard`]: take the write
//! lock for the synchronous "begin" step, drop it across the LLM await so
//! pointer events keep flowing, then take it again to apply the result.

#[cfg(test)]
#[path = "ai_test.rs"]
mod ai_test;

use std::cmp::Reverse;
use std::sync::{Arc, OnceLock};

use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::doc::{ChatMessage, StickyNote, lookup_user};
use crate::engine::{Action, BoardCore};
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::config::env_parse;
use crate::llm::types::{LlmError, Message};

const DEFAULT_AI_MAX_TOKENS: u32 = 1024;

const ICEBREAKER_SYSTEM: &str = "You are a playful facilitator warming up a team before a brainstorming session.";
const ICEBREAKER_PROMPT: &str =
    "Write one short, fun icebreaker question for the team. Reply with the question only, on a single line.";

const REPORT_SYSTEM: &str = "You are a facilitator writing the wrap-up report for a team brainstorming session. \
Use these sections in order, each as a markdown heading: Session Highlights, Top Ideas (by votes), \
Action Items, Team Mood. Keep it concise and upbeat.";

/// Token ceiling for every AI request. `AI_MAX_TOKENS`, read once.
pub fn ai_max_tokens() -> u32 {
    static VALUE: OnceLock<u32> = OnceLock::new();
    *VALUE.get_or_init(|| env_parse("AI_MAX_TOKENS", DEFAULT_AI_MAX_TOKENS))
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("empty response from model")]
    EmptyResponse,
}

impl ErrorCode for AiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Llm(_) => "E_LLM_ERROR",
            Self::EmptyResponse => "E_EMPTY_RESPONSE",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
            Self::EmptyResponse => true,
        }
    }
}

/// The board as shared between the event loop and in-flight AI requests.
pub type SharedBoard = Arc<RwLock<BoardCore>>;

/// Wrap a board for use with the async drivers.
#[must_use]
pub fn shared(core: BoardCore) -> SharedBoard {
    Arc::new(RwLock::new(core))
}

// =============================================================================
// PROMPTS
// =============================================================================

/// User prompt for the session report: topic, stickies ranked by votes, and
/// the human chat transcript.
#[must_use]
pub fn build_report_prompt(topic: &str, stickies: &[StickyNote], messages: &[ChatMessage]) -> String {
    let mut ranked: Vec<&StickyNote> = stickies.iter().collect();
    ranked.sort_by_key(|s| Reverse(s.votes));

    let mut out = format!("Session topic: {topic}\n\nSticky notes (most voted first):\n");
    if ranked.is_empty() {
        out.push_str("(none)\n");
    }
    for s in ranked {
        let author = lookup_user(&s.author_id).name;
        let plural = if s.votes == 1 { "" } else { "s" };
        out.push_str(&format!("- \"{}\" ({} vote{plural}, by {author})\n", s.content.trim(), s.votes));
    }

    out.push_str("\nChat transcript:\n");
    let human: Vec<&ChatMessage> = messages.iter().filter(|m| !m.is_system()).collect();
    if human.is_empty() {
        out.push_str("(none)\n");
    }
    for m in human {
        out.push_str(&format!("{}: {}\n", lookup_user(&m.author_id).name, m.content.trim()));
    }
    out
}

/// First non-blank line of a reply, trimmed of whitespace and wrapping quotes.
fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(|line| line.trim().trim_matches('"').trim())
        .find(|line| !line.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Ask the model for one short icebreaker question.
///
/// # Errors
///
/// Returns [`AiError::Llm`] if the request fails and
/// [`AiError::EmptyResponse`] if the reply has no text.
pub async fn request_icebreaker(llm: &dyn LlmChat) -> Result<String, AiError> {
    let messages = [Message::user(ICEBREAKER_PROMPT)];
    let response = llm.chat(ai_max_tokens(), ICEBREAKER_SYSTEM, &messages).await?;
    info!(
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "ai: icebreaker generated"
    );
    first_line(&response.text()).ok_or(AiError::EmptyResponse)
}

/// Ask the model for a multi-section session summary. The reply is
/// returned as-is for display.
///
/// # Errors
///
/// Returns [`AiError::Llm`] if the request fails and
/// [`AiError::EmptyResponse`] if the reply has no text.
pub async fn request_session_report(
    llm: &dyn LlmChat,
    topic: &str,
    stickies: &[StickyNote],
    messages: &[ChatMessage],
) -> Result<String, AiError> {
    let prompt = build_report_prompt(topic, stickies, messages);
    info!(topic, stickies = stickies.len(), messages = messages.len(), "ai: report requested");
    let response = llm.chat(ai_max_tokens(), REPORT_SYSTEM, &[Message::user(prompt)]).await?;
    info!(
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        stop_reason = %response.stop_reason,
        "ai: report generated"
    );
    let text = response.text().trim().to_string();
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

// =============================================================================
// BOARD DRIVERS
// =============================================================================

fn now_ms() -> i64 {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(millis).unwrap_or(i64::MAX)
}

/// Post the icebreaker placeholder, request a question, and rewrite the
/// placeholder with the result. Returns every action applied to the board.
pub async fn run_icebreaker(board: &SharedBoard, llm: &dyn LlmChat) -> Vec<Action> {
    let id = board.write().await.begin_icebreaker(now_ms());
    let mut actions = vec![Action::MessagePosted(id)];

    let result = request_icebreaker(llm).await;
    if let Err(e) = &result {
        warn!(error = %e, code = e.error_code(), retryable = e.retryable(), "ai: icebreaker failed");
    }

    actions.extend(board.write().await.finish_icebreaker(&id, &result));
    actions
}

/// Open the report and, unless a report is cached or already loading, run
/// the request and store its outcome. Returns the actions applied after the
/// request completed; empty when no request was needed.
pub async fn run_report(board: &SharedBoard, llm: &dyn LlmChat, topic: &str) -> Vec<Action> {
    let request = board.write().await.open_report(topic);
    let Some(request) = request else {
        return Vec::new();
    };

    let result = request_session_report(llm, &request.topic, &request.stickies, &request.messages).await;
    if let Err(e) = &result {
        warn!(error = %e, code = e.error_code(), retryable = e.retryable(), "ai: report failed");
    }

    board.write().await.finish_report(request.generation, result)
}
