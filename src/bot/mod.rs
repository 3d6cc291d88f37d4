pub mod callbacks;
pub mod commands;
pub mod constants;
pub mod controller;
pub mod handlers;
pub mod keyboards;
pub mod messenger;
pub mod pagination;
pub mod views;

use std::sync::Arc;

use teloxide::dispatching::{ UpdateFilterExt, UpdateHandler };
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::config::Config;
use crate::error::Result;
use crate::services::{ GmgnHoldingsClient, ScrapeProxy, UserStore };
use crate::session::SessionStore;
use controller::{ ControllerSettings, ConversationController };
use messenger::TelegramMessenger;

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let message_handler = Update::filter_message().endpoint(handlers::handle_message);

    let callback_handler = Update::filter_callback_query().endpoint(handlers::handle_callback);

    dptree::entry().branch(message_handler).branch(callback_handler)
}

/// Runs long polling until the process is interrupted.
///
/// Fails early when the token is rejected, so the caller can retry.
pub async fn run_bot(config: Arc<Config>, users: Arc<dyn UserStore>) -> Result<()> {
    tracing::info!("Starting Telegram bot...");

    let bot = Bot::new(&config.telegram_bot_token);

    let me = bot.get_me().await?;
    tracing::info!("Authorized as @{}", me.username());

    // Set bot commands for slash menu
    if let Err(e) = bot.set_my_commands(commands::Command::bot_commands()).await {
        tracing::warn!("Failed to set bot commands: {}", e);
    } else {
        tracing::info!("Bot commands registered successfully");
    }

    let proxy = ScrapeProxy::new(&config.zenrows_api_url, &config.zenrows_api_key, config.proxy_timeout)?;
    let holdings = Arc::new(GmgnHoldingsClient::new(proxy, &config.gmgn_api_url, &config.wallet_chain));

    let controller = Arc::new(
        ConversationController::new(
            SessionStore::new(),
            users,
            holdings,
            Arc::new(TelegramMessenger::new(bot.clone())),
            ControllerSettings::from(config.as_ref())
        )
    );

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![controller])
        .enable_ctrlc_handler()
        .build()
        .dispatch().await;

    Ok(())
}
