//! Shared types for the API layer.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::db::sqlite::open_database;
use crate::pipeline::extraction::TextExtractionEngine;
use crate::pipeline::structuring::LlmClient;

/// Shared context for all API routes and middleware.
///
/// Connections are opened per request; SQLite in WAL mode handles the
/// concurrency and the migration check is a no-op after the first open.
#[derive(Clone)]
pub struct ApiContext {
    pub db_path: Arc<PathBuf>,
    pub engine: Arc<TextExtractionEngine>,
    pub llm: Arc<dyn LlmClient>,
    pub llm_model: Arc<String>,
}

impl ApiContext {
    pub fn new(
        db_path: PathBuf,
        engine: Arc<TextExtractionEngine>,
        llm: Arc<dyn LlmClient>,
        llm_model: String,
    ) -> Self {
        Self {
            db_path: Arc::new(db_path),
            engine,
            llm,
            llm_model: Arc::new(llm_model),
        }
    }

    pub fn open_db(&self) -> Result<Connection, ApiError> {
        Ok(open_database(&self.db_path)?)
    }
}

/// Authenticated user context, injected into request extensions
/// by the auth middleware after successful token validation.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: Uuid,
    pub email: String,
}

/// Hash a bearer token with SHA-256, hex encoded for storage.
pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
