use reqwest::multipart;
use serde_json::{json, Value};

use super::ToolError;

/// An agent's credentials for one backend account.
///
/// Constructed from the `token` argument of each tool call. Nothing is
/// cached gateway-side, so tokens from different agent sessions never
/// mix.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
}

impl Session {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

/// Status and parsed JSON body of a backend response.
#[derive(Debug)]
pub struct BackendResponse {
    pub status: u16,
    pub body: Value,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP client for the backend API.
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn login(&self, email: &str) -> Result<BackendResponse, ToolError> {
        let req = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&json!({ "email": email }));
        finish(req).await
    }

    pub async fn current_user(&self, session: &Session) -> Result<BackendResponse, ToolError> {
        let req = self
            .http
            .get(format!("{}/auth/me", self.base_url))
            .bearer_auth(&session.token);
        finish(req).await
    }

    pub async fn parse_pdf(
        &self,
        session: &Session,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<BackendResponse, ToolError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ToolError::Http(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let req = self
            .http
            .post(format!("{}/parse-pdf", self.base_url))
            .bearer_auth(&session.token)
            .multipart(form);
        finish(req).await
    }

    pub async fn list_parsed(&self, session: &Session) -> Result<BackendResponse, ToolError> {
        let req = self
            .http
            .get(format!("{}/parsed-appointments", self.base_url))
            .bearer_auth(&session.token);
        finish(req).await
    }

    pub async fn upload_upcoming(
        &self,
        session: &Session,
        appointments: Value,
    ) -> Result<BackendResponse, ToolError> {
        let req = self
            .http
            .post(format!("{}/upcoming-appointments/upload", self.base_url))
            .bearer_auth(&session.token)
            .json(&json!({ "appointments": appointments }));
        finish(req).await
    }

    pub async fn list_upcoming(
        &self,
        session: &Session,
        query: &[(String, String)],
    ) -> Result<BackendResponse, ToolError> {
        let req = self
            .http
            .get(format!("{}/upcoming-appointments", self.base_url))
            .query(query)
            .bearer_auth(&session.token);
        finish(req).await
    }

    pub async fn get_upcoming(
        &self,
        session: &Session,
        queue_id: &str,
    ) -> Result<BackendResponse, ToolError> {
        let req = self
            .http
            .get(format!("{}/upcoming-appointments/{queue_id}", self.base_url))
            .bearer_auth(&session.token);
        finish(req).await
    }

    pub async fn deactivate_upcoming(
        &self,
        session: &Session,
        queue_id: &str,
    ) -> Result<BackendResponse, ToolError> {
        let req = self
            .http
            .put(format!(
                "{}/upcoming-appointments/{queue_id}/deactivate",
                self.base_url
            ))
            .bearer_auth(&session.token);
        finish(req).await
    }

    pub async fn clear_inactive(&self, session: &Session) -> Result<BackendResponse, ToolError> {
        let req = self
            .http
            .delete(format!("{}/upcoming-appointments/inactive", self.base_url))
            .bearer_auth(&session.token);
        finish(req).await
    }
}

async fn finish(req: reqwest::RequestBuilder) -> Result<BackendResponse, ToolError> {
    let response = req.send().await.map_err(|e| ToolError::Http(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .json::<Value>()
        .await
        .unwrap_or_else(|_| json!({ "detail": "non-JSON response" }));
    Ok(BackendResponse { status, body })
}
