use anyhow::{Context, Result};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use order_cards::bot;
use order_cards::bot_config::BotConfig;
use order_cards::db;
use order_cards::dialogue::CardsDialogueState;
use order_cards::localization::init_localization;
use order_cards::record_extractor::RecordExtractor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Order Cards Telegram Bot");

    let config = BotConfig::from_env()?;
    init_localization().context("Failed to load message bundles")?;

    let extractor = RecordExtractor::with_config(config.extractor.clone())
        .context("ORDER_INDEX_PATTERN is not a valid regex")?;

    info!("Connecting to database");
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    // Initialize database schema
    db::init_database_schema(&pool).await?;

    let bot = Bot::new(config.telegram_token.clone());

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<CardsDialogueState>, CardsDialogueState>()
                .endpoint(bot::message_handler),
        )
        .branch(
            Update::filter_callback_query()
                .enter_dialogue::<CallbackQuery, InMemStorage<CardsDialogueState>, CardsDialogueState>()
                .endpoint(bot::callback_handler),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            InMemStorage::<CardsDialogueState>::new(),
            Arc::new(pool),
            Arc::new(config),
            Arc::new(extractor)
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
