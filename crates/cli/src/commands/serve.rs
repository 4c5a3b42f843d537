//! `sevahealth serve` — Start the HTTP gateway.

use sevahealth_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.server.port = port;
    }

    println!("🩺 SevaHealth Gateway");
    println!("   Listening: {}:{}", config.server.host, config.server.port);
    println!("   Model:     {}", config.model.model);

    sevahealth_gateway::start(config).await?;

    Ok(())
}
