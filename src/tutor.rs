use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::runtime::AppEvent;

/// Turns of history sent along with each message
pub const CONTEXT_TURNS: usize = 10;

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("could not reach the tutor: {0}")]
    Http(#[from] reqwest::Error),
    #[error("tutor answered with HTTP {0}")]
    HttpStatus(u16),
    #[error("tutor error: {0}")]
    Backend(String),
    #[error("tutor sent an empty reply")]
    EmptyReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    history: &'a [ChatTurn],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatResponse {
    Reply { reply: String },
    Error { error: String },
}

impl ChatResponse {
    fn into_result(self) -> Result<String, TutorError> {
        match self {
            ChatResponse::Reply { reply } if reply.trim().is_empty() => Err(TutorError::EmptyReply),
            ChatResponse::Reply { reply } => Ok(reply.trim().to_string()),
            ChatResponse::Error { error } => Err(TutorError::Backend(error)),
        }
    }
}

/// Client for the chat endpoint: one request, one reply, no retry
#[derive(Debug, Clone)]
pub struct TutorClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl TutorClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TutorError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("hsk-deck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn send(&self, message: &str, history: &[ChatTurn]) -> Result<String, TutorError> {
        let res = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message, history })
            .send()?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return match serde_json::from_str::<ChatResponse>(&body) {
                Ok(ChatResponse::Error { error }) => Err(TutorError::Backend(error)),
                _ => Err(TutorError::HttpStatus(status.as_u16())),
            };
        }

        res.json::<ChatResponse>()?.into_result()
    }
}

/// Ask the tutor on a worker thread and post the outcome back into the event loop
pub fn spawn_request(
    client: Arc<TutorClient>,
    message: String,
    history: Vec<ChatTurn>,
    tx: Sender<AppEvent>,
) {
    std::thread::spawn(move || {
        let result = client.send(&message, &history);
        if let Err(e) = &result {
            warn!(error = %e, endpoint = client.endpoint(), "tutor request failed");
        }
        let _ = tx.send(AppEvent::TutorReply(result));
    });
}

/// Chat transcript plus the input line and request state of the tutor view.
/// At most one request is outstanding at a time.
#[derive(Debug, Default)]
pub struct TutorChat {
    turns: Vec<ChatTurn>,
    input: String,
    pending: bool,
    last_error: Option<String>,
}

impl TutorChat {
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// The most recent turns, oldest first
    pub fn context(&self) -> Vec<ChatTurn> {
        let skip = self.turns.len().saturating_sub(CONTEXT_TURNS);
        self.turns[skip..].to_vec()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Take the typed message for sending, together with the prior context.
    /// `None` while a request is pending or when the input is blank.
    pub fn submit(&mut self) -> Option<(String, Vec<ChatTurn>)> {
        if self.pending || self.input.trim().is_empty() {
            return None;
        }
        let message = std::mem::take(&mut self.input).trim().to_string();
        let history = self.context();

        self.turns.push(ChatTurn {
            role: Role::User,
            content: message.clone(),
        });
        self.pending = true;
        self.last_error = None;
        info!(turns = self.turns.len(), "tutor message sent");
        Some((message, history))
    }

    pub fn receive(&mut self, result: Result<String, TutorError>) {
        self.pending = false;
        match result {
            Ok(reply) => self.turns.push(ChatTurn {
                role: Role::Assistant,
                content: reply,
            }),
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_request_shape() {
        let history = vec![ChatTurn {
            role: Role::Assistant,
            content: "你好!".into(),
        }];
        let json = serde_json::to_value(ChatRequest {
            message: "什么意思?",
            history: &history,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "什么意思?",
                "history": [{ "role": "assistant", "content": "你好!" }]
            })
        );
    }

    #[test]
    fn test_response_variants() {
        let ok: ChatResponse = serde_json::from_str(r#"{"reply":" 好的 "}"#).unwrap();
        assert_eq!(ok.into_result().unwrap(), "好的");

        let err: ChatResponse = serde_json::from_str(r#"{"error":"quota"}"#).unwrap();
        assert_matches!(err.into_result(), Err(TutorError::Backend(msg)) if msg == "quota");

        let empty: ChatResponse = serde_json::from_str(r#"{"reply":""}"#).unwrap();
        assert_matches!(empty.into_result(), Err(TutorError::EmptyReply));
    }

    #[test]
    fn test_context_is_capped() {
        let mut chat = TutorChat::default();
        for i in 0..8 {
            chat.input = format!("message {i}");
            chat.submit().unwrap();
            chat.receive(Ok(format!("reply {i}")));
        }
        assert_eq!(chat.turns().len(), 16);

        let context = chat.context();
        assert_eq!(context.len(), CONTEXT_TURNS);
        assert_eq!(context[0].content, "message 3");
        assert_eq!(context[9].content, "reply 7");
    }

    #[test]
    fn test_single_outstanding_request() {
        let mut chat = TutorChat::default();
        assert!(chat.submit().is_none());

        for c in "hi".chars() {
            chat.push_char(c);
        }
        let (message, history) = chat.submit().unwrap();
        assert_eq!(message, "hi");
        assert!(history.is_empty());
        assert!(chat.is_pending());

        chat.input = "again".into();
        assert!(chat.submit().is_none());

        chat.receive(Err(TutorError::HttpStatus(502)));
        assert!(!chat.is_pending());
        assert_eq!(chat.last_error(), Some("tutor answered with HTTP 502"));
        assert!(chat.submit().is_some());
        assert!(chat.last_error().is_none());
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        let client = TutorClient::new("http://127.0.0.1:9/chat").unwrap();
        assert_matches!(client.send("hi", &[]), Err(TutorError::Http(_)));
    }
}
