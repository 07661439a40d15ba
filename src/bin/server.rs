//! Backend API server entry point.

use std::sync::Arc;

use famcare::api::{server, ApiContext};
use famcare::config::{Settings, APP_NAME, APP_VERSION};
use famcare::db::sqlite::open_database;
use famcare::pipeline::extraction::{
    ocr_capability, ExtractionConfig, PdfiumRenderer, PdfiumTextSource, TextExtractionEngine,
};
use famcare::pipeline::structuring::OpenAiClient;

/// LLM calls should fail well before a user gives up on the upload.
const LLM_TIMEOUT_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    famcare::init_tracing();
    let settings = Settings::from_env();
    tracing::info!("{APP_NAME} backend starting v{APP_VERSION}");

    if let Some(dir) = settings.db_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    // Run migrations once up front so a broken schema fails the boot,
    // not the first request
    open_database(&settings.db_path)?;
    tracing::info!(db = %settings.db_path.display(), "Database ready");

    let text_source = PdfiumTextSource::new()?;
    let renderer = PdfiumRenderer::new()?;
    let ocr = ocr_capability(settings.tessdata_dir.as_deref());
    let engine = TextExtractionEngine::new(
        Box::new(text_source),
        Box::new(renderer),
        ocr,
        ExtractionConfig::default(),
    );

    let llm = OpenAiClient::new(&settings.llm_base_url, &settings.llm_api_key, LLM_TIMEOUT_SECS);

    let ctx = ApiContext::new(
        settings.db_path.clone(),
        Arc::new(engine),
        Arc::new(llm),
        settings.llm_model.clone(),
    );

    server::serve(ctx, settings.bind_addr).await?;
    Ok(())
}
