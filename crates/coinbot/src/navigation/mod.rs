//! Per-user navigation state machine
//!
//! Inbound events move a session between four screens:
//!
//! ```text
//!            open_browse              select_coin
//!   Idle ──────────────▶ BrowsingList(p) ──────────▶ ViewingDetail(id)
//!    │ ▲                  │  ▲ next/prev                │ toggle_favorite
//!    │ │ submit/cancel    └──┘                          │ (stays)
//!    ▼ │                                                │
//!   AwaitingSearchQuery          ◀──── back ────────────┘ (to Idle)
//! ```
//!
//! `restart` returns to `Idle` and `select_coin` opens a coin from anywhere.
//! Fetch failures and empty results leave the state where it was. Every
//! result is an [`Outcome`] value; nothing here returns an error.

pub mod machine;

pub use machine::{Navigator, NavigatorLimits, Transition};

use crate::api::{CoinRecord, ExchangeRecord, GlobalStats};
use crate::session::{AddOutcome, RemoveOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which screen a session is on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavState {
    #[default]
    Idle,
    AwaitingSearchQuery,
    /// Zero-based page of the ranked coin list
    BrowsingList(u32),
    ViewingDetail(String),
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavState::Idle => write!(f, "idle"),
            NavState::AwaitingSearchQuery => write!(f, "awaiting_search_query"),
            NavState::BrowsingList(page) => write!(f, "browsing_list({page})"),
            NavState::ViewingDetail(coin_id) => write!(f, "viewing_detail({coin_id})"),
        }
    }
}

/// User intent after routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Restart,
    OpenBrowse,
    NextPage,
    PrevPage,
    SelectCoin(String),
    OpenSearch,
    SubmitQuery(String),
    Cancel,
    ToggleFavorite,
    Back,
    ShowGlobalStats,
    ShowExchanges,
    ShowFavorites,
    ClearFavorites,
    Help,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Restart => "restart",
            Event::OpenBrowse => "open_browse",
            Event::NextPage => "next_page",
            Event::PrevPage => "prev_page",
            Event::SelectCoin(_) => "select_coin",
            Event::OpenSearch => "open_search",
            Event::SubmitQuery(_) => "submit_query",
            Event::Cancel => "cancel",
            Event::ToggleFavorite => "toggle_favorite",
            Event::Back => "back",
            Event::ShowGlobalStats => "show_global_stats",
            Event::ShowExchanges => "show_exchanges",
            Event::ShowFavorites => "show_favorites",
            Event::ClearFavorites => "clear_favorites",
            Event::Help => "help",
        }
    }
}

/// What a favorite toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FavoriteChange {
    Added(AddOutcome),
    Removed(RemoveOutcome),
}

/// Data a formatter needs to render a successful transition
#[derive(Debug, Clone, PartialEq)]
pub enum ViewIntent {
    Welcome,
    CoinPage {
        page: u32,
        coins: Vec<CoinRecord>,
    },
    CoinDetail {
        coin: CoinRecord,
        is_favorite: bool,
    },
    SearchPrompt,
    SearchResults {
        query: String,
        matches: Vec<CoinRecord>,
    },
    SearchCancelled,
    FavoriteToggled {
        coin_id: String,
        change: FavoriteChange,
    },
    DetailClosed,
    GlobalStats(GlobalStats),
    Exchanges(Vec<ExchangeRecord>),
    /// Favorite coins sorted by market cap, empty when there are none
    Favorites(Vec<CoinRecord>),
    FavoritesCleared,
    Help {
        overview: Option<GlobalStats>,
    },
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The event was applied and produced a view
    Rendered(ViewIntent),
    /// `prev_page` on page zero
    AtFirstPage,
    /// The requested page has no coins
    EmptyPage { page: u32 },
    /// The search ran but nothing matched
    NoMatches { query: String },
    /// Upstream returned no exchanges
    NoExchanges,
    /// The coin id does not exist upstream
    NotFound { coin_id: String },
    /// Upstream unreachable or malformed, re-issue the event to retry
    FetchFailed { reason: String },
    /// The event is not valid in the current state and was ignored
    InvalidTransition { state: NavState, event: &'static str },
}

impl Outcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Outcome::Rendered(_))
    }

    /// True for failures the user can fix by trying again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Outcome::FetchFailed { .. })
    }

    pub fn view(&self) -> Option<&ViewIntent> {
        match self {
            Outcome::Rendered(view) => Some(view),
            _ => None,
        }
    }
}
