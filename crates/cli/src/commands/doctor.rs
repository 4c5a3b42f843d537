//! `sevahealth doctor` — Diagnose configuration and datasets.

use std::path::Path;

use sevahealth_agent::primer;
use sevahealth_config::AppConfig;
use sevahealth_index::DocumentIndex;
use sevahealth_tools::HospitalDirectory;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 SevaHealth Doctor — System Diagnostics");
    println!("=========================================\n");

    let mut issues = 0;

    // Config
    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!();
            println!("  ⚠️  1 issue found. Fix the config before the other checks can run.");
            return Ok(());
        }
    };

    // API key
    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key — set GEMINI_API_KEY or model.api_key");
        issues += 1;
    }

    // Hospital datasets
    match HospitalDirectory::load(&config.data.hospitals_path, &config.data.pincodes_path) {
        Ok(directory) => {
            println!("  ✅ Hospital datasets loaded ({} hospitals)", directory.len());
        }
        Err(e) => {
            println!("  ❌ Hospital datasets unreadable: {e}");
            issues += 1;
        }
    }

    // Document index
    match &config.data.index_path {
        Some(path) if Path::new(path).exists() => match DocumentIndex::load_from(Path::new(path)) {
            Ok(index) => println!("  ✅ Document index loaded ({} chunks)", index.len()),
            Err(e) => {
                println!("  ❌ Document index unreadable: {e}");
                issues += 1;
            }
        },
        Some(path) => {
            println!("  ⚠️  Document index not found at {path} — run `sevahealth index`");
            issues += 1;
        }
        None => {
            println!("  ⚠️  No document index configured — document search will return nothing");
            issues += 1;
        }
    }

    // System primer
    match primer::load(&config.agent) {
        Ok(text) => println!("  ✅ System primer loaded ({} chars)", text.len()),
        Err(e) => {
            println!("  ❌ System primer unreadable: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
