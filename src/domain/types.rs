//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use chrono::{DateTime, Local};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Message,
    /// Sent once by the platform when a session handshake completes.
    Greeting,
    Other,
}

/// One inbound unit from the real-time stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub channel_id: String,
    pub text: String,
    pub has_subtype: bool,
}

impl Event {
    pub fn message(channel_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Message,
            channel_id: channel_id.into(),
            text: text.into(),
            has_subtype: false,
        }
    }

    pub fn greeting() -> Self {
        Self {
            kind: EventKind::Greeting,
            channel_id: String::new(),
            text: String::new(),
            has_subtype: false,
        }
    }

    /// Plain user messages only: edits, joins, bot echoes etc. carry a subtype.
    pub fn is_plain_message(&self) -> bool {
        self.kind == EventKind::Message && !self.has_subtype
    }
}

/// A leading mention split off a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMention {
    pub addressed_identity: String,
    pub remainder: String,
}

/// What gets posted back. `text == None` means "send the fallback".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: Option<String>,
    pub channel_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Init,
    Connecting,
    Connected,
    Backoff,
    ShuttingDown,
    Terminated,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Init => "init",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Backoff => "backoff",
            ConnectionState::ShuttingDown => "shutting_down",
            ConnectionState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Snapshot taken each time the supervisor enters a new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ConnectionState,
    pub bot_identity: Option<String>,
}

/// The single live session. `bot_identity` is only set while connected.
#[derive(Debug)]
pub struct Session {
    pub bot_identity: Option<String>,
    pub state: ConnectionState,
    pub connected_at: Option<DateTime<Local>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            bot_identity: None,
            state: ConnectionState::Init,
            connected_at: None,
        }
    }
}

impl Session {
    pub fn establish(&mut self, identity: String) {
        self.bot_identity = Some(identity);
        self.connected_at = Some(Local::now());
    }

    /// Drops the identity; it must be resolved again on the next connect.
    /// Returns how long the session was up, in seconds.
    pub fn invalidate(&mut self) -> Option<i64> {
        self.bot_identity = None;
        self.connected_at
            .take()
            .map(|since| (Local::now() - since).num_seconds())
    }

    pub fn is_addressed(&self, identity: &str) -> bool {
        self.bot_identity.as_deref() == Some(identity)
    }
}
