use sdxlgen::{logger, BedrockClient, Config, ImageService};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    logger::init_with_config(logger::LoggerConfig::for_service(&config))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);
    logger::log_config_info(&config);

    // One client for the lifetime of the process, shared by every request.
    log::info!("🔄 Creating Bedrock client...");
    let client = BedrockClient::new(&config.bedrock).await?;
    let service = ImageService::from_config(Arc::new(client.into_image()), &config);

    sdxlgen::server::run(&config, service).await?;

    log::info!("👋 Server stopped");
    Ok(())
}
