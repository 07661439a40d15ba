use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "FamCare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum accepted upload size for `/parse-pdf` (15 MB).
pub const MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

/// Get the application data directory
/// ~/FamCare/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("FamCare")
}

/// Default database path under the app data directory.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("famcare.db")
}

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Runtime settings, resolved once at process start from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the backend API binds to.
    pub bind_addr: SocketAddr,
    /// SQLite database file path.
    pub db_path: PathBuf,
    /// Base URL of the OpenAI-compatible chat completions service.
    pub llm_base_url: String,
    /// API key for the LLM service.
    pub llm_api_key: String,
    /// Model name sent with every structuring request.
    pub llm_model: String,
    /// Tessdata directory for the optional OCR capability.
    pub tessdata_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("FAMCARE_BIND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8000)));

        let db_path = std::env::var("FAMCARE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());

        Self {
            bind_addr,
            db_path,
            llm_base_url: std::env::var("FAMCARE_LLM_URL")
                .unwrap_or_else(|_| "https://api.openai.com".into()),
            llm_api_key: std::env::var("API_KEY").unwrap_or_default(),
            llm_model: std::env::var("FAMCARE_LLM_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".into()),
            tessdata_dir: std::env::var("FAMCARE_TESSDATA").ok().map(PathBuf::from),
        }
    }
}

/// Settings for the tool gateway process.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Address the gateway binds to.
    pub bind_addr: SocketAddr,
    /// Base URL of the famcare backend the tools proxy to.
    pub backend_url: String,
}

impl GatewaySettings {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("FAMCARE_TOOLS_BIND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8001)));

        Self {
            bind_addr,
            backend_url: std::env::var("FAMCARE_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8000".into()),
        }
    }
}
