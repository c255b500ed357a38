//! Platform identifiers and the response value handed to a transport

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotPlatform {
    /// Interactive terminal session
    #[default]
    Cli,

    /// Telegram markdown output
    Telegram,
}

impl fmt::Display for BotPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotPlatform::Cli => write!(f, "cli"),
            BotPlatform::Telegram => write!(f, "telegram"),
        }
    }
}

impl FromStr for BotPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cli" => Ok(BotPlatform::Cli),
            "telegram" | "tg" => Ok(BotPlatform::Telegram),
            other => Err(format!("unknown platform '{other}', expected cli or telegram")),
        }
    }
}

/// Bot response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotResponse {
    /// Response content
    pub content: String,

    /// Response type
    pub response_type: ResponseType,

    /// Buttons offered to the user, in display order
    pub actions: Vec<SuggestedAction>,
}

/// Type of bot response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    /// Plain text
    Text,

    /// Markdown
    Formatted,

    /// Error message
    Error,
}

/// Suggested action for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    /// Button label
    pub label: String,

    /// Callback token, slash command or URL
    pub action: String,

    pub action_type: ActionType,
}

/// Type of action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    /// Sent back to the bot as input when chosen
    Command,

    /// External link
    Link,
}

impl BotResponse {
    fn new(content: impl Into<String>, response_type: ResponseType) -> Self {
        Self {
            content: content.into(),
            response_type,
            actions: Vec::new(),
        }
    }

    /// Create a simple text response
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(content, ResponseType::Text)
    }

    /// Create a formatted response
    pub fn formatted(content: impl Into<String>) -> Self {
        Self::new(content, ResponseType::Formatted)
    }

    /// Create an error response
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(content, ResponseType::Error)
    }

    /// Response that shows nothing, used for ignored input
    pub fn empty() -> Self {
        Self::text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.actions.is_empty()
    }

    /// Add a suggested action
    pub fn with_action(mut self, label: impl Into<String>, action: impl Into<String>) -> Self {
        self.actions.push(SuggestedAction {
            label: label.into(),
            action: action.into(),
            action_type: ActionType::Command,
        });
        self
    }

    /// Add an external link
    pub fn with_link(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.actions.push(SuggestedAction {
            label: label.into(),
            action: url.into(),
            action_type: ActionType::Link,
        });
        self
    }

    /// Find the action carrying `token`
    pub fn action(&self, token: &str) -> Option<&SuggestedAction> {
        self.actions.iter().find(|a| a.action == token)
    }
}
