use log::error;

use namaste_foodie::{web, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;
    if let Err(e) = web::serve(&config).await {
        error!("Server stopped: {}", e);
        return Err(e.into());
    }

    Ok(())
}
