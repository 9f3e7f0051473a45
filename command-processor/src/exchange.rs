/// Conversation records
///
/// An [`Exchange`] is one user/assistant round-trip. Both entries are built
/// from a single intent, so a logged pair can never disagree about it.

use crate::intent::Intent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        })
    }
}

/// One side of an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub role: Role,
    pub text: String,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
}

/// User/assistant pair sharing one resolved intent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    user: Entry,
    assistant: Entry,
}

impl Exchange {
    pub fn new(utterance: impl Into<String>, response: impl Into<String>, intent: Intent) -> Self {
        let timestamp = Utc::now();

        Self {
            user: Entry {
                role: Role::User,
                text: utterance.into(),
                intent,
                timestamp,
            },
            assistant: Entry {
                role: Role::Assistant,
                text: response.into(),
                intent,
                timestamp,
            },
        }
    }

    pub fn user(&self) -> &Entry {
        &self.user
    }

    pub fn assistant(&self) -> &Entry {
        &self.assistant
    }

    pub fn intent(&self) -> Intent {
        self.assistant.intent
    }

    /// Response text
    pub fn response(&self) -> &str {
        &self.assistant.text
    }

    /// Both entries in log order: user first, then assistant
    pub fn entries(&self) -> [&Entry; 2] {
        [&self.user, &self.assistant]
    }
}

/// Human-readable diagnostic event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}
