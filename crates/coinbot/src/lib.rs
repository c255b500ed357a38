//! Crypto market chat bot
//!
//! This crate implements the core of a chat bot that browses cryptocurrency
//! market data from the CoinLore API:
//!
//! - A per-user navigation state machine (idle, browsing a ranked coin
//!   list, viewing a coin, awaiting a search query)
//! - A duplicate-free, insertion ordered favorites list per user
//! - Global market statistics and top exchanges
//! - Platform formatters producing text plus selectable actions
//!
//! # Architecture
//!
//! Input flows through [`bot::CoinBot`], which parses it into a
//! [`bot::Command`], routes it to a [`navigation::Event`] under the user's
//! session lock, and lets the [`navigation::Navigator`] apply it. The
//! resulting [`navigation::Outcome`] is rendered by an
//! [`interface::Formatter`]. Market data comes from any
//! [`api::MarketData`] implementation, by default [`api::CoinloreClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use coinbot::{BotConfig, CoinBot};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = CoinBot::new(BotConfig::from_env()?)?;
//!
//!     let response = bot.handle_input("42", "/top").await;
//!     println!("{}", response.content);
//!     for action in &response.actions {
//!         println!("[{}] {}", action.action, action.label);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod interface;
pub mod navigation;
pub mod session;

#[cfg(test)]
pub mod test_support;

pub use api::{ApiError, CoinRecord, CoinloreClient, ExchangeRecord, GlobalStats, MarketData};
pub use bot::{CoinBot, Command};
pub use config::BotConfig;
pub use error::{BotError, Result};
pub use interface::{BotPlatform, BotResponse, Formatter};
pub use navigation::{Event, NavState, Navigator, Outcome, Transition, ViewIntent};
pub use session::{AddOutcome, ClearOutcome, FavoritesStore, RemoveOutcome, SessionRegistry};
