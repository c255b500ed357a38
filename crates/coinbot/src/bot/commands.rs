//! Command parsing for the coin bot
//!
//! Input is one of: a slash command, a main menu label, an action token
//! produced by a previous response, or free text.

use crate::error::{BotError, Result};
use crate::interface::tokens;
use crate::navigation::{Event, NavState};

/// Parsed user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reset the session to the main menu
    Start,
    /// Show help
    Help,
    /// Global market statistics
    Global,
    /// Browse the ranked coin list
    Top,
    /// Start a coin search
    Search,
    /// Top exchanges by volume
    Exchanges,
    /// Show favorites
    Favorites,
    /// Abort the pending search
    Cancel,
    /// `coin_<id>` token
    SelectCoin { coin_id: String },
    /// `next_coins` token
    NextPage,
    /// `prev_coins` token
    PrevPage,
    /// `add_fav_<id>` token
    AddFavorite { coin_id: String },
    /// `rm_fav_<id>` token
    RemoveFavorite { coin_id: String },
    /// `clear_favorites` token
    ClearFavorites,
    /// `back_to_menu` token
    BackToMenu,
    /// Exit the bot
    Exit,
    /// Anything else, used as a search query
    Text { text: String },
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(BotError::CommandError("Empty input".to_string()));
        }

        if let Some(rest) = input.strip_prefix('/') {
            return Self::parse_slash(rest);
        }

        if let Some(command) = Self::parse_menu_label(input) {
            return Ok(command);
        }

        if let Some(command) = Self::parse_token(input) {
            return Ok(command);
        }

        Ok(Command::Text {
            text: input.to_string(),
        })
    }

    fn parse_slash(rest: &str) -> Result<Self> {
        let cmd = rest
            .split_whitespace()
            .next()
            .ok_or_else(|| BotError::CommandError("Empty command".to_string()))?
            .to_lowercase();

        match cmd.as_str() {
            "start" | "menu" => Ok(Command::Start),
            "help" | "h" | "?" => Ok(Command::Help),
            "global" | "g" => Ok(Command::Global),
            "top" | "t" => Ok(Command::Top),
            "search" | "s" => Ok(Command::Search),
            "exchanges" | "ex" => Ok(Command::Exchanges),
            "favorites" | "fav" | "favourites" => Ok(Command::Favorites),
            "cancel" | "c" => Ok(Command::Cancel),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(BotError::CommandError(format!("Unknown command: /{cmd}"))),
        }
    }

    fn parse_menu_label(input: &str) -> Option<Self> {
        let command = match input {
            tokens::MENU_GLOBAL => Command::Global,
            tokens::MENU_TOP => Command::Top,
            tokens::MENU_SEARCH => Command::Search,
            tokens::MENU_EXCHANGES => Command::Exchanges,
            tokens::MENU_FAVORITES => Command::Favorites,
            tokens::MENU_HELP => Command::Help,
            tokens::MENU_CANCEL => Command::Cancel,
            _ => return None,
        };
        Some(command)
    }

    fn parse_token(input: &str) -> Option<Self> {
        let command = match input {
            tokens::NEXT_COINS => Command::NextPage,
            tokens::PREV_COINS => Command::PrevPage,
            tokens::CLEAR_FAVORITES => Command::ClearFavorites,
            tokens::BACK_TO_MENU => Command::BackToMenu,
            _ => {
                let id_after = |prefix: &str| {
                    input
                        .strip_prefix(prefix)
                        .filter(|id| !id.is_empty() && !id.contains(char::is_whitespace))
                        .map(str::to_string)
                };

                if let Some(coin_id) = id_after(tokens::COIN_PREFIX) {
                    Command::SelectCoin { coin_id }
                } else if let Some(coin_id) = id_after(tokens::ADD_FAV_PREFIX) {
                    Command::AddFavorite { coin_id }
                } else if let Some(coin_id) = id_after(tokens::RM_FAV_PREFIX) {
                    Command::RemoveFavorite { coin_id }
                } else {
                    return None;
                }
            }
        };
        Some(command)
    }

    /// Map to a navigation event given the current state
    ///
    /// `None` means the input has no meaning in `state` and is absorbed.
    /// While a search query is awaited, tokens that only make sense in a
    /// list or detail view are searched for as typed.
    pub fn route(&self, state: &NavState) -> Option<Event> {
        if *state == NavState::AwaitingSearchQuery {
            if let Some(query) = self.query_text() {
                return Some(Event::SubmitQuery(query));
            }
        }

        let event = match self {
            Command::Start => Event::Restart,
            Command::Help => Event::Help,
            Command::Global => Event::ShowGlobalStats,
            Command::Top => Event::OpenBrowse,
            Command::Search => Event::OpenSearch,
            Command::Exchanges => Event::ShowExchanges,
            Command::Favorites => Event::ShowFavorites,
            Command::Cancel => Event::Cancel,
            Command::SelectCoin { coin_id } => Event::SelectCoin(coin_id.clone()),
            Command::NextPage => Event::NextPage,
            Command::PrevPage => Event::PrevPage,
            Command::AddFavorite { coin_id } | Command::RemoveFavorite { coin_id } => {
                match state {
                    NavState::ViewingDetail(viewing) if viewing == coin_id => {
                        Event::ToggleFavorite
                    }
                    _ => return None,
                }
            }
            Command::ClearFavorites => Event::ClearFavorites,
            Command::BackToMenu => Event::Back,
            Command::Text { .. } | Command::Exit => return None,
        };
        Some(event)
    }

    /// Events to apply in order for this command in `state`
    ///
    /// Main menu entries work from every state: outside the main menu they
    /// restart the session first.
    pub fn events(&self, state: &NavState) -> Vec<Event> {
        match self {
            Command::Top | Command::Search if *state != NavState::Idle => {
                let mut events = vec![Event::Restart];
                events.extend(self.route(&NavState::Idle));
                events
            }
            _ => self.route(state).into_iter().collect(),
        }
    }

    /// Input that is taken as a search query while one is awaited
    ///
    /// Coin selection and clearing favorites stay actions, since the
    /// favorites view offers them in every state.
    fn query_text(&self) -> Option<String> {
        match self {
            Command::Text { text } => Some(text.clone()),
            Command::NextPage => Some(tokens::NEXT_COINS.to_string()),
            Command::PrevPage => Some(tokens::PREV_COINS.to_string()),
            Command::BackToMenu => Some(tokens::BACK_TO_MENU.to_string()),
            Command::AddFavorite { coin_id } => Some(tokens::add_favorite(coin_id)),
            Command::RemoveFavorite { coin_id } => Some(tokens::remove_favorite(coin_id)),
            _ => None,
        }
    }

    /// Get a short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Restart the bot",
            Command::Help => "Show help",
            Command::Global => "Global market statistics",
            Command::Top => "Browse top cryptocurrencies",
            Command::Search => "Search for a coin",
            Command::Exchanges => "Top exchanges",
            Command::Favorites => "Show favorites",
            Command::Cancel => "Cancel search",
            Command::SelectCoin { .. } => "Coin details",
            Command::NextPage => "Next page",
            Command::PrevPage => "Previous page",
            Command::AddFavorite { .. } => "Add to favorites",
            Command::RemoveFavorite { .. } => "Remove from favorites",
            Command::ClearFavorites => "Clear favorites",
            Command::BackToMenu => "Back to menu",
            Command::Exit => "Exit the bot",
            Command::Text { .. } => "Free text",
        }
    }
}
