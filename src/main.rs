use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use order_bot::bot::{schema, Command};
use order_bot::config::{BotConfig, LogFormat};
use order_bot::dialogue::OrderDialogueState;
use order_bot::localization::init_localization;
use order_bot::order_store::OrderStore;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;

    // Initialize logging
    init_tracing(config.log_format);

    info!("Starting Order Telegram Bot");

    init_localization();

    info!(
        orders_file = %config.orders_file.display(),
        admin_configured = config.admin_id.is_some(),
        "Configuration loaded"
    );
    if config.admin_id.is_none() {
        warn!("ADMIN_ID is not set, order notifications and listing are disabled");
    }

    let store = Arc::new(OrderStore::new(config.orders_file.clone()));

    // Initialize the bot
    let bot = Bot::new(config.bot_token.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![
            InMemStorage::<OrderDialogueState>::new(),
            store,
            Arc::new(config)
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
