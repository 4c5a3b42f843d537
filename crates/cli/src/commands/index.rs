//! `sevahealth index` — Build the document search index.

use std::path::{Path, PathBuf};

use sevahealth_config::AppConfig;
use sevahealth_index::DocumentIndex;

pub async fn run(
    docs: Option<String>,
    out: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let docs_dir = docs
        .or_else(|| config.data.docs_dir.clone())
        .ok_or("No documents directory: pass --docs or set data.docs_dir in sevahealth.toml")?;
    let out_path = out
        .or_else(|| config.data.index_path.clone())
        .unwrap_or_else(|| "data/index.json".into());

    if !config.has_api_key() {
        return Err("No API key configured; embeddings need GEMINI_API_KEY".into());
    }
    let provider = sevahealth_providers::build_from_config(&config)?;

    let mut sources: Vec<PathBuf> = std::fs::read_dir(&docs_dir)
        .map_err(|e| format!("Failed to read {docs_dir}: {e}"))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("txt") | Some("md")
            )
        })
        .collect();
    sources.sort();

    if sources.is_empty() {
        return Err(format!("No .txt or .md documents found in {docs_dir}").into());
    }

    println!("🗂️  Indexing {} documents from {docs_dir}", sources.len());

    let mut index = DocumentIndex::new(&config.model.embed_model);
    for path in &sources {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;

        let added = index.add_document(provider.as_ref(), &name, &text).await?;
        println!("   {name}: {added} chunks");
    }

    index.save_to(Path::new(&out_path))?;
    println!();
    println!("   {} chunks written to {out_path}", index.len());

    Ok(())
}
