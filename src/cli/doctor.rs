//! CLI `doctor` command: check configuration and model files, then try a load.

use anyhow::Result;

use paper_embed::config::ServiceConfig;
use paper_embed::embedding;

/// Print a configuration and model health report.
pub fn doctor(config: &ServiceConfig) -> Result<()> {
    let emb = &config.embedding;

    println!("paper-embed Health Report");
    println!("=========================");
    println!();
    println!("Server:            http://{}", config.bind_addr());
    println!("CORS origins:      {}", config.server.cors_origins.join(", "));
    println!();
    println!("Embedding:");
    println!("  Provider:        {}", emb.provider);
    println!("  Model:           {}", emb.model);
    println!("  Device:          {}", emb.device);
    println!("  Max batch size:  {}", emb.max_batch_size);
    println!("  Max text length: {}", emb.max_text_length);

    if emb.provider == "local" {
        let model_dir = emb.model_dir();
        println!("  Model dir:       {}", model_dir.display());
        for file in ["model.onnx", "tokenizer.json"] {
            let path = model_dir.join(file);
            let size = std::fs::metadata(&path).map(|m| m.len()).ok();
            match size {
                Some(bytes) => println!("    {file:<15} {}", format_bytes(bytes)),
                None => println!("    {file:<15} MISSING"),
            }
        }
    }
    println!();

    match embedding::create_provider(emb) {
        Ok(provider) => {
            println!("Model load:        PASSED");
            println!("  Dimensions:      {}", provider.dimensions());
            println!("  Device:          {}", provider.device());
            if let Some(len) = provider.max_seq_length() {
                println!("  Max seq length:  {len}");
            }
        }
        Err(e) => {
            println!("Model load:        FAILED ({e:#})");
            println!();
            println!("Recovery steps:");
            println!("  1. Download the model: paper-embed model download");
            println!("  2. Or run without model files: PAPER_EMBED_PROVIDER=hash paper-embed serve");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
