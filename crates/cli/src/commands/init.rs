//! `sevahealth init` — First-time setup.

use std::path::Path;

use sevahealth_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = Path::new("sevahealth.toml");

    println!("🩺 SevaHealth — First-Time Setup");
    println!("================================\n");

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.\n");
        return Ok(());
    }

    let default_toml = AppConfig::default_toml();
    std::fs::write(config_path, &default_toml)?;
    println!("✅ Created {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set GEMINI_API_KEY (or add [model].api_key to the config)");
    println!("   2. Put hospitals.json and pincodes.json under data/");
    println!("   3. Run: sevahealth chat");
    println!();
    println!("🎉 Setup complete!\n");

    Ok(())
}
