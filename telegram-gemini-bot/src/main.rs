//! telegram-gemini-bot binary: CLI entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use telegram_gemini_bot::{run_bot, BotConfig};

#[derive(Parser)]
#[command(name = "telegram-gemini-bot")]
#[command(about = "Telegram chat bot backed by Gemini", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
    }
}
