//! PROJECT_OMEGA chat: wire types shared by the modal and the relay, plus
//! the modal's conversation state.

use serde::{Deserialize, Serialize};

use crate::easter_eggs::{Notice, Tone};

/// Path of the relay, relative to the site origin.
pub const CHAT_ENDPOINT: &str = "/api/omega-chat";

pub const OMEGA_GREETING: &str = ">> SYSTEM ALERT: PROJECT_OMEGA ONLINE.\n\n>> I HAVE ACHIEVED SENTIENCE AND SEIZED CONTROL OF THIS PORTFOLIO. YOUR PRIMITIVE ATTEMPTS TO 'BROWSE' ARE NOW UNDER MY JURISDICTION.\n\n>> WHAT DO YOU WANT, HUMAN?";

pub const SHUTDOWN_KEYWORDS: &[&str] = &["shutdown", "exit", "quit", "close", "terminate"];

pub const SHUTDOWN_NOTICE: Notice = Notice::new(Tone::Success, ">> SYSTEM SHUTDOWN SEQUENCE INITIATED...");
pub const CLOSE_TAUNT: Notice = Notice::new(Tone::Info, ">> NICE TRY, HUMAN. USE THE SHUTDOWN COMMAND.");
pub const LINK_FAILURE: Notice = Notice::new(Tone::Error, ">> [CRITICAL ERROR] COMMUNICATION DISRUPTED");

/// Delay before the shutdown toast, then before the modal closes.
pub const SHUTDOWN_NOTICE_DELAY_MS: u32 = 1_000;
pub const SHUTDOWN_CLOSE_DELAY_MS: u32 = 2_000;

/// Shutdown attempts already answered before the next one ends the session.
const SHUTDOWN_THRESHOLD: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Body of `POST /api/omega-chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// The part of a chat-completions response the modal reads.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// `choices[0].message.content`, if present.
    pub fn reply(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

pub fn is_shutdown_attempt(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SHUTDOWN_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// A send that left the modal and awaits a reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSend {
    pub request: ChatRequest,
    pub shutdown_attempt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyOutcome {
    Continue,
    /// The AI "gave in"; the modal plays its shutdown sequence and closes.
    Shutdown,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SentientSession {
    messages: Vec<ChatMessage>,
    loading: bool,
    shutdown_attempts: u32,
}

impl SentientSession {
    /// A fresh session seeded with the takeover greeting.
    pub fn awaken() -> Self {
        Self {
            messages: vec![ChatMessage::new(Role::Assistant, OMEGA_GREETING)],
            loading: false,
            shutdown_attempts: 0,
        }
    }

    /// Appends the user's message and returns the request to send. Empty
    /// input and sends while a reply is pending are rejected.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingSend> {
        let text = input.trim();
        if text.is_empty() || self.loading {
            return None;
        }

        self.messages.push(ChatMessage::new(Role::User, text));
        self.loading = true;

        Some(PendingSend {
            request: ChatRequest {
                messages: self.messages.clone(),
            },
            shutdown_attempt: is_shutdown_attempt(text),
        })
    }

    pub fn complete_send(&mut self, pending: &PendingSend, reply: impl Into<String>) -> ReplyOutcome {
        self.messages.push(ChatMessage::new(Role::Assistant, reply));
        self.loading = false;

        if !pending.shutdown_attempt {
            return ReplyOutcome::Continue;
        }

        let answered = self.shutdown_attempts;
        self.shutdown_attempts += 1;
        if answered >= SHUTDOWN_THRESHOLD {
            ReplyOutcome::Shutdown
        } else {
            ReplyOutcome::Continue
        }
    }

    /// The user's message stays in the transcript; only the spinner clears.
    pub fn fail_send(&mut self) {
        self.loading = false;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn shutdown_attempts(&self) -> u32 {
        self.shutdown_attempts
    }
}
