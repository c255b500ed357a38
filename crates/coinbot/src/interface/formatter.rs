//! Response formatting
//!
//! A [`Formatter`] supplies the platform markup primitives. The provided
//! [`Formatter::render`] turns any navigation [`Outcome`] into a
//! [`BotResponse`] with the same layout and actions on every platform.

use super::response::{BotPlatform, BotResponse};
use super::tokens;
use crate::api::{CoinRecord, ExchangeRecord, GlobalStats};
use crate::navigation::{FavoriteChange, Outcome, ViewIntent};
use crate::session::{AddOutcome, RemoveOutcome};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;

pub trait Formatter: Send + Sync {
    fn platform(&self) -> BotPlatform;

    /// Emphasize a short piece of text
    fn bold(&self, text: &str) -> String;

    fn format_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String;

    fn format_error(&self, error: &str) -> String;

    /// Wrap rendered content in the response type of the platform
    fn response(&self, content: String) -> BotResponse;

    fn format_help(&self, overview: Option<&GlobalStats>) -> String {
        let mut text = format!("ℹ️ {}\n\n", self.bold("Crypto Assistant Bot Help"));

        if let Some(stats) = overview {
            text.push_str("📊 Current Market Overview:\n");
            text.push_str(&format!("• Total Cryptocurrencies: {}\n", stats.active_currencies));
            text.push_str(&format!("• Active Markets: {}\n", stats.active_markets));
            text.push_str(&format!(
                "• Total Market Cap: ${}\n",
                group_thousands(stats.total_market_cap_usd)
            ));
            text.push_str(&format!(
                "• 24h Trading Volume: ${}\n\n",
                group_thousands(stats.total_volume_usd)
            ));
        }

        text.push_str(&format!("{}\n\n", self.bold("Available Features:")));
        for (label, description) in [
            (tokens::MENU_GLOBAL, "Overall market cap, volume and BTC dominance"),
            (tokens::MENU_TOP, "Browse coins by market cap, ten per page"),
            (tokens::MENU_SEARCH, "Find a coin by name or symbol"),
            (tokens::MENU_EXCHANGES, "Top exchanges ranked by trading volume"),
            (tokens::MENU_FAVORITES, "Coins you saved for quick monitoring"),
        ] {
            text.push_str(&format!("{} - {description}\n", self.bold(label)));
        }

        text.push_str(&format!("\n{}\n", self.bold("Commands:")));
        text.push_str(
            "/start - Restart the bot\n\
             /help - Show this help message\n\
             /global - Show global statistics\n\
             /top - Show top cryptocurrencies\n\
             /search - Search for a coin\n\
             /exchanges - Show top exchanges\n\
             /favorites - Show your favorites\n\
             /cancel - Cancel the current search\n\n",
        );
        text.push_str(&format!(
            "{}\nAll cryptocurrency data is provided by CoinLore API",
            self.bold("Data Source:")
        ));
        text
    }

    /// Render the result of one navigation event
    ///
    /// Ignored events render as [`BotResponse::empty`].
    fn render(&self, outcome: &Outcome) -> BotResponse {
        match outcome {
            Outcome::Rendered(view) => render_view(self, view),
            Outcome::AtFirstPage => BotResponse::text("You're already on the first page.")
                .with_action("Next ➡️", tokens::NEXT_COINS),
            Outcome::EmptyPage { page } => {
                let response = BotResponse::text(format!(
                    "No more coins to show on page {}.",
                    u64::from(*page) + 1
                ));
                if *page > 0 {
                    response.with_action("⬅️ Previous", tokens::PREV_COINS)
                } else {
                    response
                }
            }
            Outcome::NoMatches { query } => BotResponse::text(format!(
                "No results found for '{query}'. Please try a different search term."
            ))
            .with_action(tokens::MENU_SEARCH, "/search"),
            Outcome::NoExchanges => BotResponse::text("No exchange data is available right now."),
            Outcome::NotFound { coin_id } => {
                BotResponse::text(format!("Could not find a coin with id {coin_id}."))
            }
            Outcome::FetchFailed { .. } => BotResponse::error(self.format_error(
                "Sorry, couldn't fetch cryptocurrency data. Please try again later.",
            )),
            Outcome::InvalidTransition { .. } => BotResponse::empty(),
        }
    }
}

fn with_main_menu(mut response: BotResponse) -> BotResponse {
    for (label, command) in tokens::MAIN_MENU {
        response = response.with_action(label, command);
    }
    response
}

fn with_coin_actions(mut response: BotResponse, coins: &[CoinRecord]) -> BotResponse {
    for coin in coins {
        response = response.with_action(
            format!("{} ({})", coin.name, coin.symbol),
            tokens::coin(&coin.id),
        );
    }
    response
}

fn render_view<F: Formatter + ?Sized>(f: &F, view: &ViewIntent) -> BotResponse {
    match view {
        ViewIntent::Welcome => with_main_menu(f.response(
            "👋 Welcome!\n\n\
             I'm your Crypto Assistant Bot. I can help you track cryptocurrency prices, \
             view market statistics, and monitor your favorite coins.\n\n\
             Use the buttons below to navigate:"
                .to_string(),
        )),
        ViewIntent::CoinPage { page, coins } => {
            let mut content = format!(
                "💹 {} (Page {})\n\n",
                f.bold("Top Cryptocurrencies"),
                u64::from(*page) + 1
            );
            content.push_str(&coin_table(f, coins));

            let mut response = f.response(content);
            for coin in coins {
                response = response.with_action(
                    format!(
                        "{} {} ({}): ${:.2} ({:.2}%)",
                        change_emoji(coin.change_24h),
                        coin.name,
                        coin.symbol,
                        coin.price_usd,
                        coin.change_24h
                    ),
                    tokens::coin(&coin.id),
                );
            }
            response
                .with_action("⬅️ Previous", tokens::PREV_COINS)
                .with_action("Next ➡️", tokens::NEXT_COINS)
        }
        ViewIntent::CoinDetail { coin, is_favorite } => {
            let toggle = if *is_favorite {
                ("⭐ Remove from Favorites", tokens::remove_favorite(&coin.id))
            } else {
                ("⭐ Add to Favorites", tokens::add_favorite(&coin.id))
            };
            f.response(coin_detail(f, coin))
                .with_action(toggle.0, toggle.1)
                .with_link(
                    "🔍 View on CoinLore",
                    tokens::coin_url(&coin.slug, &coin.name),
                )
                .with_action("🔙 Back", tokens::BACK_TO_MENU)
        }
        ViewIntent::SearchPrompt => BotResponse::text(
            "Please enter the name or symbol of the cryptocurrency you want to search for:",
        )
        .with_action(tokens::MENU_CANCEL, "/cancel"),
        ViewIntent::SearchResults { query, matches } => {
            let mut content = format!("🔍 {} for '{query}'\n\n", f.bold("Search Results"));
            for coin in matches {
                content.push_str(&format!(
                    "{}\nPrice: {}\nRank: {}\n\n",
                    f.bold(&format!("{} ({})", coin.name, coin.symbol)),
                    format_price(coin.price_usd),
                    coin.rank
                ));
            }
            with_coin_actions(f.response(content.trim_end().to_string()), matches)
        }
        ViewIntent::SearchCancelled => with_main_menu(BotResponse::text(
            "Search canceled. What would you like to do next?",
        )),
        ViewIntent::FavoriteToggled { coin_id, change } => {
            let (message, toggle) = match change {
                FavoriteChange::Added(AddOutcome::Added) => (
                    "⭐ Added to favorites!",
                    ("⭐ Remove from Favorites", tokens::remove_favorite(coin_id)),
                ),
                FavoriteChange::Added(AddOutcome::AlreadyPresent) => (
                    "This coin is already in your favorites!",
                    ("⭐ Remove from Favorites", tokens::remove_favorite(coin_id)),
                ),
                FavoriteChange::Removed(RemoveOutcome::Removed) => (
                    "Removed from favorites!",
                    ("⭐ Add to Favorites", tokens::add_favorite(coin_id)),
                ),
                FavoriteChange::Removed(RemoveOutcome::NotPresent) => (
                    "This coin is not in your favorites!",
                    ("⭐ Add to Favorites", tokens::add_favorite(coin_id)),
                ),
            };
            BotResponse::text(message)
                .with_action(toggle.0, toggle.1)
                .with_action("🔙 Back", tokens::BACK_TO_MENU)
        }
        ViewIntent::DetailClosed => with_main_menu(BotResponse::text("Returning to main menu")),
        ViewIntent::GlobalStats(stats) => f.response(global_stats(f, stats)),
        ViewIntent::Exchanges(exchanges) => {
            let mut content = format!("📊 {}\n\n", f.bold("Top Exchanges by Volume"));
            content.push_str(&exchange_table(f, exchanges));
            f.response(content)
        }
        ViewIntent::Favorites(coins) if coins.is_empty() => BotResponse::text(format!(
            "⭐ You don't have any favorite cryptocurrencies yet.\n\n\
             To add favorites, search for a coin using the '{}' button \
             or view top cryptocurrencies, then select 'Add to Favorites'.",
            tokens::MENU_SEARCH
        ))
        .with_action(tokens::MENU_SEARCH, "/search")
        .with_action(tokens::MENU_TOP, "/top"),
        ViewIntent::Favorites(coins) => {
            let mut content = format!("⭐ {}\n\n", f.bold("Your Favorite Cryptocurrencies"));
            content.push_str(&coin_table(f, coins));
            with_coin_actions(f.response(content), coins)
                .with_action("🗑️ Clear All Favorites", tokens::CLEAR_FAVORITES)
        }
        ViewIntent::FavoritesCleared => BotResponse::text("All favorites cleared!")
            .with_action(tokens::MENU_TOP, "/top"),
        ViewIntent::Help { overview } => {
            with_main_menu(f.response(f.format_help(overview.as_ref())))
        }
    }
}

fn coin_table<F: Formatter + ?Sized>(f: &F, coins: &[CoinRecord]) -> String {
    let rows: Vec<Vec<String>> = coins
        .iter()
        .map(|coin| {
            vec![
                coin.rank.to_string(),
                format!("{} ({})", coin.name, coin.symbol),
                format_price(coin.price_usd),
                format!("{:+.2}%", coin.change_24h),
            ]
        })
        .collect();
    f.format_table(&["#", "Coin", "Price", "24h"], &rows)
}

fn exchange_table<F: Formatter + ?Sized>(f: &F, exchanges: &[ExchangeRecord]) -> String {
    let rows: Vec<Vec<String>> = exchanges
        .iter()
        .enumerate()
        .map(|(i, exchange)| {
            vec![
                (i + 1).to_string(),
                exchange.name.clone(),
                format!("${}", format_large_number(exchange.volume_usd)),
                exchange.pairs.to_string(),
            ]
        })
        .collect();
    f.format_table(&["#", "Exchange", "24h Volume", "Pairs"], &rows)
}

fn coin_detail<F: Formatter + ?Sized>(f: &F, coin: &CoinRecord) -> String {
    let last_updated = coin.last_updated.map_or_else(
        || "N/A".to_string(),
        |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
    );

    format!(
        "{}  Rank #{}\n\n\
         {} {} / {:.8} BTC\n\
         {} ${}\n\
         {} ${}\n\n\
         {} {}\n\
         {} {}\n\
         {} {}\n\n\
         {} {last_updated}",
        f.bold(&format!("{} ({})", coin.name, coin.symbol)),
        coin.rank,
        f.bold("Price:"),
        format_price(coin.price_usd),
        coin.price_btc,
        f.bold("Market Cap:"),
        group_thousands(coin.market_cap_usd),
        f.bold("24h Volume:"),
        group_thousands(coin.volume_24h_usd),
        f.bold("Change 1h:"),
        format_change(coin.change_1h),
        f.bold("Change 24h:"),
        format_change(coin.change_24h),
        f.bold("Change 7d:"),
        format_change(coin.change_7d),
        f.bold("Last Updated:"),
    )
}

fn global_stats<F: Formatter + ?Sized>(f: &F, stats: &GlobalStats) -> String {
    format!(
        "🌐 {}\n\n\
         💰 {} ${} USD\n\
         💵 {} ${} USD\n\n\
         ₿ {} {:.2}%\n\
         Ξ {} {:.2}%\n\
         📈 {} {}\n\n\
         🪙 {} {}\n\
         🏛️ {} {}",
        f.bold("Global Cryptocurrency Statistics"),
        f.bold("Total Market Cap:"),
        format_large_number(stats.total_market_cap_usd),
        f.bold("Total Volume (24h):"),
        format_large_number(stats.total_volume_usd),
        f.bold("BTC Dominance:"),
        stats.btc_dominance,
        f.bold("ETH Dominance:"),
        stats.eth_dominance,
        f.bold("Market Cap Change (24h):"),
        format_change(stats.market_cap_change_24h),
        f.bold("Active Cryptocurrencies:"),
        stats.active_currencies,
        f.bold("Active Markets:"),
        stats.active_markets,
    )
}

/// Format a number with a K, M or B suffix
pub fn format_large_number(num: f64) -> String {
    if num >= 1_000_000_000.0 {
        format!("{:.2}B", num / 1_000_000_000.0)
    } else if num >= 1_000_000.0 {
        format!("{:.2}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.2}K", num / 1_000.0)
    } else {
        format!("{num:.2}")
    }
}

/// Round to an integer and group digits with commas
pub fn group_thousands(value: f64) -> String {
    let digits = (value.abs().round() as u64).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits != "0" {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Dollar price, six decimals below one dollar
pub fn format_price(price: f64) -> String {
    if price < 1.0 {
        return format!("${price:.6}");
    }
    let cents = (price * 100.0).round() as u64;
    format!("${}.{:02}", group_thousands((cents / 100) as f64), cents % 100)
}

fn change_emoji(change: f64) -> &'static str {
    if change > 0.0 {
        "🟢"
    } else if change < 0.0 {
        "🔴"
    } else {
        "⚪"
    }
}

fn format_change(change: f64) -> String {
    format!("{} {change:.2}%", change_emoji(change))
}

/// Plain text with box-drawn tables
pub struct CliFormatter;

impl Formatter for CliFormatter {
    fn platform(&self) -> BotPlatform {
        BotPlatform::Cli
    }

    fn bold(&self, text: &str) -> String {
        text.to_string()
    }

    fn format_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(headers.to_vec());
        for row in rows {
            table.add_row(row.clone());
        }
        table.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ Error: {error}")
    }

    fn response(&self, content: String) -> BotResponse {
        BotResponse::text(content)
    }
}

/// Telegram flavoured Markdown
pub struct TelegramFormatter;

impl TelegramFormatter {
    fn escape(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for ch in text.chars() {
            if matches!(ch, '*' | '_' | '`' | '[') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped
    }
}

impl Formatter for TelegramFormatter {
    fn platform(&self) -> BotPlatform {
        BotPlatform::Telegram
    }

    fn bold(&self, text: &str) -> String {
        format!("*{}*", Self::escape(text))
    }

    fn format_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut output = String::from("```\n");
        output.push_str(&headers.join(" | "));
        output.push('\n');
        for row in rows {
            output.push_str(&row.join(" | "));
            output.push('\n');
        }
        output.push_str("```");
        output
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ *Error:* {}", Self::escape(error))
    }

    fn response(&self, content: String) -> BotResponse {
        BotResponse::formatted(content)
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(platform: BotPlatform) -> Box<dyn Formatter> {
        match platform {
            BotPlatform::Cli => Box::new(CliFormatter),
            BotPlatform::Telegram => Box::new(TelegramFormatter),
        }
    }
}
