//! `sevahealth chat` — Interactive or single-message chat mode.

use std::path::Path;
use std::sync::Arc;

use sevahealth_agent::{DEFAULT_CAPACITY, SessionStore, TurnOptions, TurnRunner, primer};
use sevahealth_config::AppConfig;
use sevahealth_core::event::TurnEvent;
use sevahealth_core::message::Role;
use sevahealth_index::DocumentIndex;
use sevahealth_tools::HospitalDirectory;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early so the user gets a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GEMINI_API_KEY  (recommended)");
        eprintln!("    GOOGLE_API_KEY");
        eprintln!();
        eprintln!("  Or add it to sevahealth.toml:");
        eprintln!("    [model]");
        eprintln!("    api_key = \"...\"");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = sevahealth_providers::build_from_config(&config)?;

    let directory = Arc::new(HospitalDirectory::load(
        &config.data.hospitals_path,
        &config.data.pincodes_path,
    )?);
    let hospitals = directory.len();

    let index = match &config.data.index_path {
        Some(path) if Path::new(path).exists() => DocumentIndex::load_from(Path::new(path))?,
        _ => DocumentIndex::new(&config.model.embed_model),
    };
    let chunks = index.len();

    let registry = Arc::new(sevahealth_tools::build_registry(
        directory,
        Arc::new(index),
        Arc::clone(&provider),
    ));

    let sessions = SessionStore::new(primer::load(&config.agent)?, DEFAULT_CAPACITY);
    let runner = TurnRunner::new(provider, registry, TurnOptions::from_config(&config));

    let entry = sessions.get_or_create("cli").await;
    let mut state = entry.lock().await;

    if let Some(msg) = message {
        // Single message mode: print only the final answer
        let (tx, mut rx) = mpsc::channel(128);
        let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });

        eprint!("  Thinking...");
        let result = runner.run(&mut state, &msg, &tx).await;
        drop(tx);
        let _ = drain.await;
        eprint!("\r              \r");

        let produced = result?;
        if let Some(answer) = produced.iter().rev().find(|m| m.role == Role::Assistant) {
            println!("{}", answer.content);
        }
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        SevaHealth — Interactive Chat         ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:     {}", config.model.model);
    println!("  Tools:     find_hospitals, search_documents");
    println!("  Hospitals: {hospitals} records");
    println!("  Documents: {chunks} indexed chunks");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            prompt()?;
            continue;
        }
        if ["quit", "exit", "q"].contains(&input.to_lowercase().as_str()) {
            break;
        }

        let (tx, mut rx) = mpsc::channel(128);
        let printer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                print_event(&event);
            }
        });

        // A failed turn already put its error on the event stream; the
        // history so far is kept for the next input either way.
        let _ = runner.run(&mut state, input, &tx).await;
        drop(tx);
        let _ = printer.await;

        prompt()?;
    }

    println!();
    println!("  Take care! 🙏");
    println!();

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("  You > ");
    std::io::stdout().flush()
}

fn print_event(event: &TurnEvent) {
    match event {
        TurnEvent::ModelResponse { message } => {
            if !message.content.is_empty() {
                println!();
                for line in message.content.lines() {
                    println!("  Assistant > {line}");
                }
                println!();
            }
            for call in &message.tool_calls {
                println!("  [calling {}]", call.name);
            }
        }
        TurnEvent::ToolResult { message } => {
            let mut snippet: String = message.content.chars().take(120).collect();
            if snippet.len() < message.content.len() {
                snippet.push('…');
            }
            println!("  [tool returned: {snippet}]");
        }
        TurnEvent::Error { message } => {
            eprintln!("  [Error] {message}");
        }
    }
}
