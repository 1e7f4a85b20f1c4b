use std::env;

use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tally_bot::{
    bot, config,
    errors::{Error, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Read startup configuration
    let token = env::var("TELEGRAM_TOKEN").map_err(|_| Error::Config {
        message: "TELEGRAM_TOKEN is not set".to_string(),
    })?;
    let admin_ids = config::admins::admin_ids();
    if admin_ids.is_empty() {
        info!("No admin allow-list configured; /clear is open to everyone");
    }

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established"))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Run the bot
    bot::run_bot(token, db, admin_ids).await
}
