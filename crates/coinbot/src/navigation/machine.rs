//! Transition logic
//!
//! The session lock is taken once per event and held across the market data
//! call, so a second event for the same user waits for the first one.

use super::{Event, FavoriteChange, NavState, Outcome, ViewIntent};
use crate::api::MarketData;
use crate::config::BotConfig;
use crate::session::{Favorites, FavoritesStore, Session, SessionRegistry};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sizes used when fetching and presenting lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorLimits {
    pub page_size: u32,
    pub search_pool_size: u32,
    pub search_result_limit: usize,
    pub exchange_limit: usize,
}

impl Default for NavigatorLimits {
    fn default() -> Self {
        Self::from(&BotConfig::default())
    }
}

impl From<&BotConfig> for NavigatorLimits {
    fn from(config: &BotConfig) -> Self {
        Self {
            page_size: config.page_size,
            search_pool_size: config.search_pool_size,
            search_result_limit: config.search_result_limit,
            exchange_limit: config.exchange_limit,
        }
    }
}

/// State after an event together with what happened
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: NavState,
    pub outcome: Outcome,
}

/// The navigation state machine shared by all users
pub struct Navigator {
    market: Arc<dyn MarketData>,
    sessions: Arc<SessionRegistry>,
    limits: NavigatorLimits,
}

impl Navigator {
    pub fn new(market: Arc<dyn MarketData>, sessions: Arc<SessionRegistry>) -> Self {
        Self {
            market,
            sessions,
            limits: NavigatorLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: NavigatorLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Keyed favorites access sharing this navigator's sessions
    pub fn favorites(&self) -> FavoritesStore {
        FavoritesStore::new(Arc::clone(&self.sessions))
    }

    /// Apply `event` to the session of `user_id`
    pub async fn handle(&self, user_id: &str, event: Event) -> Transition {
        self.handle_routed(user_id, move |_| vec![event]).await
    }

    /// Pick events from the current state, then apply them in order
    ///
    /// `route` runs under the session lock and every event is applied
    /// before the lock is released, so the sequence cannot interleave with
    /// another event for the same user. The sequence stops at the first
    /// outcome that is not a rendered view, and the last outcome is
    /// returned. An empty sequence is reported as an invalid transition
    /// named `unrouted`.
    pub async fn handle_routed<F>(&self, user_id: &str, route: F) -> Transition
    where
        F: FnOnce(&NavState) -> Vec<Event>,
    {
        let mut session = self.sessions.lock(user_id).await;
        let before = session.nav_state.clone();

        let mut outcome = Outcome::InvalidTransition {
            state: before.clone(),
            event: "unrouted",
        };
        let events = route(&before);
        if events.is_empty() {
            debug!(user_id, state = %before, "input not routable in current state");
        }

        for event in events {
            let name = event.name();
            let from = session.nav_state.clone();
            outcome = self.apply(&mut session, event).await;
            match &outcome {
                Outcome::InvalidTransition { .. } => {
                    debug!(user_id, state = %from, event = name, "ignored event");
                }
                _ => info!(
                    user_id,
                    event = name,
                    %from,
                    to = %session.nav_state,
                    "handled event"
                ),
            }
            if !outcome.is_rendered() {
                break;
            }
        }

        Transition {
            state: session.nav_state.clone(),
            outcome,
        }
    }

    async fn apply(&self, session: &mut Session, event: Event) -> Outcome {
        let state = session.nav_state.clone();

        match (state, event) {
            (_, Event::Restart) => {
                session.nav_state = NavState::Idle;
                Outcome::Rendered(ViewIntent::Welcome)
            }
            (_, Event::ShowGlobalStats) => self.global_stats().await,
            (_, Event::ShowExchanges) => self.exchanges().await,
            (_, Event::ShowFavorites) => self.favorite_coins(&session.favorites).await,
            (_, Event::ClearFavorites) => {
                session.favorites.clear();
                Outcome::Rendered(ViewIntent::FavoritesCleared)
            }
            (_, Event::Help) => self.help().await,

            (NavState::Idle, Event::OpenBrowse) => self.show_page(session, 0).await,
            (NavState::BrowsingList(page), Event::NextPage) => match page.checked_add(1) {
                Some(next) => self.show_page(session, next).await,
                None => Outcome::EmptyPage { page },
            },
            (NavState::BrowsingList(page), Event::PrevPage) if page > 0 => {
                self.show_page(session, page - 1).await
            }
            (NavState::BrowsingList(_), Event::PrevPage) => Outcome::AtFirstPage,

            (_, Event::SelectCoin(coin_id)) => self.show_detail(session, coin_id).await,

            (NavState::Idle, Event::OpenSearch) => {
                session.nav_state = NavState::AwaitingSearchQuery;
                Outcome::Rendered(ViewIntent::SearchPrompt)
            }
            (NavState::AwaitingSearchQuery, Event::SubmitQuery(query)) => {
                self.search(session, query).await
            }
            (NavState::AwaitingSearchQuery, Event::Cancel) => {
                session.nav_state = NavState::Idle;
                Outcome::Rendered(ViewIntent::SearchCancelled)
            }

            (NavState::ViewingDetail(coin_id), Event::ToggleFavorite) => {
                let change = if session.favorites.contains(&coin_id) {
                    FavoriteChange::Removed(session.favorites.remove(&coin_id))
                } else {
                    FavoriteChange::Added(session.favorites.add(coin_id.clone()))
                };
                info!(user_id = %session.user_id, %coin_id, ?change, "toggled favorite");
                Outcome::Rendered(ViewIntent::FavoriteToggled { coin_id, change })
            }
            (NavState::ViewingDetail(_), Event::Back) => {
                session.nav_state = NavState::Idle;
                Outcome::Rendered(ViewIntent::DetailClosed)
            }

            (state, event) => Outcome::InvalidTransition {
                state,
                event: event.name(),
            },
        }
    }

    async fn show_page(&self, session: &mut Session, page: u32) -> Outcome {
        let limit = self.limits.page_size;
        let Some(offset) = page.checked_mul(limit) else {
            return Outcome::EmptyPage { page };
        };

        match self.market.fetch_tickers(offset, limit).await {
            Ok(coins) if coins.is_empty() => {
                debug!(page, offset, "page has no coins");
                Outcome::EmptyPage { page }
            }
            Ok(mut coins) => {
                coins.truncate(limit as usize);
                session.nav_state = NavState::BrowsingList(page);
                Outcome::Rendered(ViewIntent::CoinPage { page, coins })
            }
            Err(e) => {
                warn!(page, error = %e, "failed to fetch coin page");
                Outcome::FetchFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn show_detail(&self, session: &mut Session, coin_id: String) -> Outcome {
        match self.market.fetch_ticker(&coin_id).await {
            Ok(Some(coin)) => {
                let is_favorite = session.favorites.contains(&coin_id);
                session.nav_state = NavState::ViewingDetail(coin_id);
                Outcome::Rendered(ViewIntent::CoinDetail { coin, is_favorite })
            }
            Ok(None) => Outcome::NotFound { coin_id },
            Err(e) => {
                warn!(%coin_id, error = %e, "failed to fetch coin detail");
                Outcome::FetchFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn search(&self, session: &mut Session, query: String) -> Outcome {
        let query = query.trim().to_string();
        if query.is_empty() {
            return Outcome::InvalidTransition {
                state: NavState::AwaitingSearchQuery,
                event: "submit_query",
            };
        }

        let coins = match self
            .market
            .fetch_tickers(0, self.limits.search_pool_size)
            .await
        {
            Ok(coins) => coins,
            Err(e) => {
                warn!(%query, error = %e, "search fetch failed");
                return Outcome::FetchFailed {
                    reason: e.to_string(),
                };
            }
        };

        let needle = query.to_lowercase();
        let matches: Vec<_> = coins
            .into_iter()
            .filter(|coin| coin.matches(&needle))
            .take(self.limits.search_result_limit)
            .collect();

        session.nav_state = NavState::Idle;
        debug!(%query, count = matches.len(), "search finished");

        if matches.is_empty() {
            Outcome::NoMatches { query }
        } else {
            Outcome::Rendered(ViewIntent::SearchResults { query, matches })
        }
    }

    async fn global_stats(&self) -> Outcome {
        match self.market.fetch_global_stats().await {
            Ok(stats) => Outcome::Rendered(ViewIntent::GlobalStats(stats)),
            Err(e) => {
                warn!(error = %e, "failed to fetch global stats");
                Outcome::FetchFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn exchanges(&self) -> Outcome {
        match self.market.fetch_exchanges().await {
            Ok(exchanges) if exchanges.is_empty() => Outcome::NoExchanges,
            Ok(mut exchanges) => {
                exchanges.sort_by(|a, b| b.volume_usd.total_cmp(&a.volume_usd));
                exchanges.truncate(self.limits.exchange_limit);
                Outcome::Rendered(ViewIntent::Exchanges(exchanges))
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch exchanges");
                Outcome::FetchFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn favorite_coins(&self, favorites: &Favorites) -> Outcome {
        if favorites.is_empty() {
            return Outcome::Rendered(ViewIntent::Favorites(Vec::new()));
        }

        let results = join_all(
            favorites
                .list()
                .iter()
                .map(|coin_id| self.market.fetch_ticker(coin_id)),
        )
        .await;

        let mut coins = Vec::with_capacity(results.len());
        let mut last_error = None;
        for (coin_id, result) in favorites.list().iter().zip(results) {
            match result {
                Ok(Some(coin)) => coins.push(coin),
                Ok(None) => debug!(%coin_id, "favorite no longer listed upstream"),
                Err(e) => {
                    warn!(%coin_id, error = %e, "failed to fetch favorite");
                    last_error = Some(e);
                }
            }
        }

        if let (true, Some(e)) = (coins.is_empty(), last_error) {
            return Outcome::FetchFailed {
                reason: e.to_string(),
            };
        }

        coins.sort_by(|a, b| b.market_cap_usd.total_cmp(&a.market_cap_usd));
        Outcome::Rendered(ViewIntent::Favorites(coins))
    }

    async fn help(&self) -> Outcome {
        let overview = match self.market.fetch_global_stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                debug!(error = %e, "help rendered without market overview");
                None
            }
        };
        Outcome::Rendered(ViewIntent::Help { overview })
    }
}
