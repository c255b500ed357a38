//! Bot platform interfaces
//!
//! Platform-agnostic responses and the formatters that produce them

pub mod formatter;
pub mod response;
pub mod tokens;

pub use formatter::{CliFormatter, Formatter, FormatterFactory, TelegramFormatter};
pub use response::{ActionType, BotPlatform, BotResponse, ResponseType, SuggestedAction};
