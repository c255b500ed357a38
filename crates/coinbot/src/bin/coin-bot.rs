//! Coin Bot CLI
//!
//! An interactive terminal session against the live CoinLore API.
//!
//! # Usage
//!
//! ```bash
//! # Optional overrides
//! export COINLORE_API_BASE="https://api.coinlore.net"
//! export COINBOT_REQUEST_TIMEOUT_SECS=10
//!
//! cargo run --bin coin-bot -p coinbot -- --user alice
//! ```
//!
//! Type a command, a menu label or one of the `[token]`s printed under a
//! response to choose that action.

use clap::Parser;
use coinbot::interface::{ActionType, BotPlatform, BotResponse, ResponseType};
use coinbot::{BotConfig, CoinBot, Command};
use coinbot_utils::{LogFormat, init_tracing_with};
use std::io::{self, BufRead, Write};
use tracing::info;

/// Interactive cryptocurrency market bot
#[derive(Debug, Parser)]
#[command(name = "coin-bot", version, about)]
struct Args {
    /// Session user id
    #[arg(short, long, default_value = "local")]
    user: String,

    /// Output flavour (cli or telegram)
    #[arg(short, long)]
    platform: Option<BotPlatform>,

    /// Log output format (pretty or json)
    #[arg(long, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// CoinLore API base URL
    #[arg(long)]
    api_base: Option<String>,
}

fn print_banner() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║                  Crypto Assistant Bot                        ║
║                                                              ║
║  Commands:                                                   ║
║    /start      - Main menu                                   ║
║    /top        - Top cryptocurrencies                        ║
║    /search     - Search for a coin                           ║
║    /global     - Global market statistics                    ║
║    /exchanges  - Top exchanges                               ║
║    /favorites  - Your favorites                              ║
║    /help       - Show help                                   ║
║    /exit       - Exit                                        ║
║                                                              ║
║  Type a [token] shown under a response to press that button  ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
}

fn print_response(response: &BotResponse) {
    if response.is_empty() {
        return;
    }

    match response.response_type {
        ResponseType::Error => eprintln!("{}", response.content),
        ResponseType::Text | ResponseType::Formatted => println!("{}", response.content),
    }

    if !response.actions.is_empty() {
        println!();
        for action in &response.actions {
            match action.action_type {
                ActionType::Command => println!("  [{}] {}", action.action, action.label),
                ActionType::Link => println!("  {} <{}>", action.label, action.action),
            }
        }
    }
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing_with(args.log_format, "warn,coinbot=info");

    let mut builder = BotConfig::builder().with_env();
    if let Some(url) = args.api_base {
        builder = builder.api_base_url(url);
    }
    if let Some(platform) = args.platform {
        builder = builder.platform(platform);
    }
    let config = builder.build()?;

    print_banner();
    println!("Configuration:");
    println!("  API Base: {}", config.api_base_url);
    println!("  Platform: {}", config.platform);
    println!("  User: {}", args.user);
    println!();

    let bot = CoinBot::new(config)?;
    info!(user_id = %args.user, "session started");

    print_response(&bot.handle_input(&args.user, "/start").await);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if matches!(Command::parse(input), Ok(Command::Exit)) {
            println!("Goodbye!");
            break;
        }

        print_response(&bot.handle_input(&args.user, input).await);
    }

    Ok(())
}
