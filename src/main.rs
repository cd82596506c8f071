#[tokio::main]
async fn main() -> groupgate::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("groupgate=info"),
    )
    .init();
    log::info!("Starting groupgate Telegram bot");

    match groupgate::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {}", e);
            Err(e)
        }
    }
}
