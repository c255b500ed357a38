//! Callback tokens and main menu labels
//!
//! Tokens are what a chosen action sends back as input. The command parser
//! and the formatters both build on these constants.

pub const NEXT_COINS: &str = "next_coins";
pub const PREV_COINS: &str = "prev_coins";
pub const BACK_TO_MENU: &str = "back_to_menu";
pub const CLEAR_FAVORITES: &str = "clear_favorites";

pub const COIN_PREFIX: &str = "coin_";
pub const ADD_FAV_PREFIX: &str = "add_fav_";
pub const RM_FAV_PREFIX: &str = "rm_fav_";

pub const MENU_GLOBAL: &str = "🌐 Global Stats";
pub const MENU_TOP: &str = "💹 Top Cryptos";
pub const MENU_SEARCH: &str = "🔍 Search Coin";
pub const MENU_EXCHANGES: &str = "📊 Exchanges";
pub const MENU_FAVORITES: &str = "⭐ Favorites";
pub const MENU_HELP: &str = "ℹ️ Help";
pub const MENU_CANCEL: &str = "🔙 Cancel";

/// Main menu entries as (label, slash command)
pub const MAIN_MENU: [(&str, &str); 6] = [
    (MENU_GLOBAL, "/global"),
    (MENU_TOP, "/top"),
    (MENU_SEARCH, "/search"),
    (MENU_EXCHANGES, "/exchanges"),
    (MENU_FAVORITES, "/favorites"),
    (MENU_HELP, "/help"),
];

pub fn coin(coin_id: &str) -> String {
    format!("{COIN_PREFIX}{coin_id}")
}

pub fn add_favorite(coin_id: &str) -> String {
    format!("{ADD_FAV_PREFIX}{coin_id}")
}

pub fn remove_favorite(coin_id: &str) -> String {
    format!("{RM_FAV_PREFIX}{coin_id}")
}

/// CoinLore page of a coin, falling back to the lowercased name
pub fn coin_url(slug: &str, name: &str) -> String {
    let slug = if slug.is_empty() {
        name.to_lowercase().replace(' ', "-")
    } else {
        slug.to_string()
    };
    format!("https://www.coinlore.com/coin/{slug}")
}
