pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod membership;
pub mod server;
pub mod telegram;
pub mod types;

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::net::TcpListener;

use config::Config;
use dispatcher::Handler;
use error::Result;
use server::AppState;
use telegram::{TelegramApi, TelegramClient};

/// Run the Telegram bot and the HTTP API until a termination signal arrives.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Arc::new(Config::from_env()?);

    debug!("Initializing Telegram client");
    let client = TelegramClient::new(&config.telegram_token);
    let bot = client.bot().clone();
    let api: Arc<dyn TelegramApi> = Arc::new(client);

    let handler = Arc::new(Handler::new(Arc::clone(&api), Arc::clone(&config)).await?);
    handler.register_commands().await;

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Telegram bot HTTP server running on port {}", config.port);

    let mut dispatcher = dispatcher::build(bot, Arc::clone(&handler));
    let stop = dispatcher.shutdown_token();
    let polling = dispatcher.dispatch();
    tokio::pin!(polling);

    info!("Telegram bot is running...");
    info!("Monitoring group: {}", handler.config().group_id);

    let state = AppState::new(api, config.group_id.clone());
    let served = tokio::select! {
        result = server::serve(listener, state) => result,
        () = &mut polling => {
            warn!("Polling for updates stopped unexpectedly");
            return Ok(());
        }
        () = shutdown_signal() => {
            info!("Shutdown signal received, shutting down...");
            Ok(())
        }
    };

    // The HTTP listener is simply dropped; polling stops after the replies
    // already in flight are sent.
    match stop.shutdown() {
        Ok(_) => polling.await,
        Err(_) => debug!("Polling had not started yet"),
    }
    info!("Stopped polling for updates");

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
