//! Sentence-embedding microservice for a research-paper reading assistant.
//!
//! `paper-embed` serves a pretrained sentence-transformers model over HTTP.
//! Requests go through a small, fully typed pipeline:
//!
//! 1. **Validate**: non-empty batch, batch size and per-text length limits
//! 2. **Preprocess**: whitespace collapse and defensive truncation
//! 3. **Plan**: contiguous, order-preserving chunks under the batch ceiling
//! 4. **Encode**: one provider call per chunk
//! 5. **Assemble**: concatenate, count words, report dimensionality
//!
//! Cosine similarity between precomputed vectors is a separate, stateless entry point.
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET` | `/health` | Liveness and model readiness |
//! | `GET` | `/model` | Model metadata (503 until loaded) |
//! | `POST` | `/embeddings` | Embed a batch of texts |
//! | `POST` | `/similarity` | Cosine similarity of two vectors |
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`embedding`]: Provider trait, ONNX Runtime and hashing providers, readiness handle
//! - [`pipeline`]: Validation, chunking, assembly, and similarity
//! - [`handlers`]: axum routes and error payloads
//! - [`server`]: Listener startup and background model loading

pub mod config;
pub mod embedding;
pub mod handlers;
pub mod pipeline;
pub mod server;
