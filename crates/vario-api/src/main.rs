use vario_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    vario_api::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (staging, storage backend, routes)
    let (_state, router) = vario_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    vario_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
