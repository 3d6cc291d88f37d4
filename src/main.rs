use std::sync::Arc;

use anyhow::Context;
use migration::{ Migrator, MigratorTrait };
use pnl_bot::db::UserRepository;
use pnl_bot::{ AppError, Config };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "pnl_bot=info,teloxide=info".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env().map_err(|e| AppError::Config(e.to_string())) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Restart on any startup or polling failure
    loop {
        match start(config.clone()).await {
            Ok(()) => {
                tracing::info!("Bot stopped");
                break;
            }
            Err(e) => {
                tracing::error!("Bot crashed: {:#}", e);
                tracing::info!("Restarting in {}s", config.restart_delay.as_secs());
                tokio::time::sleep(config.restart_delay).await;
            }
        }
    }
}

async fn start(config: Arc<Config>) -> anyhow::Result<()> {
    let db = sea_orm::Database
        ::connect(&config.database_url).await
        .context("Failed to connect to database")?;

    tracing::info!("Database connected successfully");

    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    tracing::info!("Migrations completed successfully");

    let users = Arc::new(UserRepository::new(db));

    pnl_bot::bot::run_bot(config, users).await?;

    Ok(())
}
