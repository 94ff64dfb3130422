//! Dream diary Telegram bot
//!
//! (c) Softlandia 2026

use dream_diary_bot::bot;
use dream_diary_bot::bot::State;
use dream_diary_bot::config::BotConfig;
use dream_diary_bot::core::services::MyDreamService;
use dream_diary_bot::infrastructure::database::DatabaseConnection;
use dream_diary_bot::infrastructure::repositories::{DbDreamRepository, DbUserRepository};

use di::{Injectable, ServiceCollection};
use log::info;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tokio::runtime::{Builder, Runtime};

fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt::init();

    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(run())
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let provider = ServiceCollection::new()
        .add(BotConfig::singleton())
        .add(DatabaseConnection::singleton())
        .add(DbUserRepository::scoped())
        .add(DbDreamRepository::scoped())
        .add(MyDreamService::scoped())
        .build_provider()
        .unwrap();

    let connection = provider.get_required::<DatabaseConnection>();
    sqlx::migrate!().run(&**connection).await?;
    info!("Database ready");

    let bot = Bot::from_env();

    info!("Starting dream diary bot...");
    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![InMemStorage::<State>::new(), provider])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    info!("Shutting down...");

    Ok(())
}
