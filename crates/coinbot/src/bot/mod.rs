//! Coin bot dispatcher
//!
//! Turns raw user input into navigation events and renders the outcome.
//!
//! # Example
//!
//! ```rust,ignore
//! use coinbot::bot::CoinBot;
//! use coinbot::config::BotConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = CoinBot::new(BotConfig::from_env()?)?;
//!     let response = bot.handle_input("42", "/top").await;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

pub mod commands;

use crate::api::{CoinloreClient, MarketData};
use crate::config::BotConfig;
use crate::error::Result;
use crate::interface::{BotResponse, Formatter, FormatterFactory};
use crate::navigation::{Navigator, NavigatorLimits, Transition};
use crate::session::{FavoritesStore, SessionRegistry};
use std::sync::Arc;
use tracing::{debug, warn};

pub use commands::Command;

/// Dispatcher shared by all users
pub struct CoinBot {
    config: BotConfig,
    navigator: Navigator,
    formatter: Box<dyn Formatter>,
}

impl CoinBot {
    /// Create a bot backed by the CoinLore HTTP client
    pub fn new(config: BotConfig) -> Result<Self> {
        config.validate()?;
        let market = Arc::new(CoinloreClient::new(&config)?);
        Ok(Self::with_market(config, market))
    }

    /// Create a bot with a custom market data source
    pub fn with_market(config: BotConfig, market: Arc<dyn MarketData>) -> Self {
        let navigator = Navigator::new(market, Arc::new(SessionRegistry::new()))
            .with_limits(NavigatorLimits::from(&config));
        let formatter = FormatterFactory::create(config.platform);

        Self {
            config,
            navigator,
            formatter,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn favorites(&self) -> FavoritesStore {
        self.navigator.favorites()
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    /// Handle one line of user input and render the result
    ///
    /// Input that cannot be parsed renders as an error hint. Input that has
    /// no meaning in the current state renders as an empty response.
    pub async fn handle_input(&self, user_id: &str, input: &str) -> BotResponse {
        match Command::parse(input) {
            Ok(command) => {
                let transition = self.execute_command(user_id, command).await;
                self.formatter.render(&transition.outcome)
            }
            Err(e) => {
                warn!(user_id, input, error = %e, "rejected input");
                BotResponse::error(self.formatter.format_error(&e.to_string()))
                    .with_action("ℹ️ Help", "/help")
            }
        }
    }

    /// Route a parsed command under the user's session lock
    pub async fn execute_command(&self, user_id: &str, command: Command) -> Transition {
        debug!(user_id, command = command.description(), "dispatching");
        self.navigator
            .handle_routed(user_id, |state| command.events(state))
            .await
    }
}
