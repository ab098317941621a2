use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use transit_admin::config::{database, settings};
use transit_admin::core::accounts;
use transit_admin::errors::Result;
use transit_admin::web::{self, AppState};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received.");
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    // 3. Load settings
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Critical error loading settings: {}", e))?;
    info!("Settings loaded.");

    // 4. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Seed roles, shifts and staff accounts
    let state = AppState::new(db, settings);
    accounts::seed(&state.db, &state.settings, &state.hasher)
        .await
        .inspect(|()| info!("Seed data ensured."))
        .inspect_err(|e| error!("Failed to seed accounts: {}", e))?;

    // 6. Serve
    let bind = state.settings.server.bind.clone();
    let listener = TcpListener::bind(&bind).await?;
    info!("Listening on {}", bind);
    axum::serve(listener, web::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
