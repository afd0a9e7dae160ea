pub mod doctor;
pub mod embed;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::io::AsyncWriteExt;

use paper_embed::config::EmbeddingConfig;

const HF_BASE: &str = "https://huggingface.co/sentence-transformers";

fn model_url(model: &str) -> String {
    format!("{HF_BASE}/{model}/resolve/main/onnx/model.onnx")
}

fn tokenizer_url(model: &str) -> String {
    format!("{HF_BASE}/{model}/resolve/main/tokenizer.json")
}

fn sentence_config_url(model: &str) -> String {
    format!("{HF_BASE}/{model}/resolve/main/sentence_bert_config.json")
}

/// Download the ONNX embedding model and tokenizer to the cache directory.
pub async fn model_download(config: &EmbeddingConfig) -> Result<()> {
    let model_dir = config.model_dir();
    std::fs::create_dir_all(&model_dir)
        .with_context(|| format!("failed to create cache dir: {}", model_dir.display()))?;

    let model_path = model_dir.join("model.onnx");
    let tokenizer_path = model_dir.join("tokenizer.json");

    if model_path.exists() {
        println!("Model already exists at {}", model_path.display());
    } else {
        println!("Downloading {} model.onnx...", config.model);
        download_file(&model_url(&config.model), &model_path).await?;
        println!("Model saved to {}", model_path.display());
    }

    if tokenizer_path.exists() {
        println!("Tokenizer already exists at {}", tokenizer_path.display());
    } else {
        println!("Downloading tokenizer.json...");
        download_file(&tokenizer_url(&config.model), &tokenizer_path).await?;
        println!("Tokenizer saved to {}", tokenizer_path.display());
    }

    // Optional: carries the model's trained sequence length.
    let sentence_config_path = model_dir.join("sentence_bert_config.json");
    if !sentence_config_path.exists() {
        if let Err(e) = download_file(&sentence_config_url(&config.model), &sentence_config_path).await
        {
            println!("No sentence_bert_config.json ({e:#}); using the tokenizer's sequence length.");
        }
    }

    println!("Model download complete. Ready for use.");
    Ok(())
}

/// Download a file from a URL with progress bar. Uses atomic write (tmp + rename).
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("HTTP request failed for {url}"))?;

    anyhow::ensure!(
        response.status().is_success(),
        "download of {url} failed with HTTP {}",
        response.status()
    );

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")
                    .context("invalid progress template")?
                    .progress_chars("##-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let tmp_path = dest.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

    let bytes = response.bytes().await.context("error reading response")?;
    pb.inc(bytes.len() as u64);
    file.write_all(&bytes)
        .await
        .context("error writing to file")?;

    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, dest)
        .await
        .context("failed to rename temp file")?;

    pb.finish_and_clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_model_id() {
        assert_eq!(
            model_url("all-MiniLM-L6-v2"),
            "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx"
        );
        assert!(tokenizer_url("paraphrase-MiniLM-L3-v2").ends_with("paraphrase-MiniLM-L3-v2/resolve/main/tokenizer.json"));
        assert!(sentence_config_url("all-mpnet-base-v2").ends_with("all-mpnet-base-v2/resolve/main/sentence_bert_config.json"));
    }
}
