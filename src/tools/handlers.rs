//! Tool implementations.
//!
//! Every handler validates its arguments before touching the network
//! and returns a uniform `{"status": "success" | "error", ...}` object,
//! which is what agent frameworks cope with best.

use std::path::Path;

use serde_json::{json, Value};

use super::client::{BackendClient, BackendResponse, Session};
use super::ToolError;

fn str_arg(args: &Value, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ToolError::BadArgs(format!("'{key}' is required")))
}

fn session_arg(args: &Value) -> Result<Session, ToolError> {
    Ok(Session::new(&str_arg(args, "token")?))
}

fn wrap(response: BackendResponse, key: &str) -> Value {
    if response.is_success() {
        json!({ "status": "success", key: response.body })
    } else {
        json!({
            "status": "error",
            "code": response.status,
            "message": response.body,
        })
    }
}

pub async fn login(client: &BackendClient, args: &Value) -> Result<Value, ToolError> {
    let email = str_arg(args, "email")?;
    let response = client.login(&email).await?;
    if response.is_success() {
        Ok(json!({
            "status": "success",
            "token": response.body["access_token"],
            "user": response.body["user"],
        }))
    } else {
        Ok(wrap(response, "result"))
    }
}

pub async fn get_current_user(client: &BackendClient, args: &Value) -> Result<Value, ToolError> {
    let session = session_arg(args)?;
    Ok(wrap(client.current_user(&session).await?, "user"))
}

pub async fn parse_pdf(client: &BackendClient, args: &Value) -> Result<Value, ToolError> {
    let session = session_arg(args)?;
    let file_path = str_arg(args, "file_path")?;

    let path = Path::new(&file_path);
    if !path.extension().is_some_and(|e| e.eq_ignore_ascii_case("pdf")) {
        return Err(ToolError::BadArgs("'file_path' must point to a .pdf".into()));
    }
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.pdf")
        .to_string();
    let bytes = tokio::fs::read(path).await?;

    Ok(wrap(
        client.parse_pdf(&session, &filename, bytes).await?,
        "appointment",
    ))
}

pub async fn list_parsed_appointments(
    client: &BackendClient,
    args: &Value,
) -> Result<Value, ToolError> {
    let session = session_arg(args)?;
    Ok(wrap(client.list_parsed(&session).await?, "appointments"))
}

pub async fn upload_upcoming_appointments(
    client: &BackendClient,
    args: &Value,
) -> Result<Value, ToolError> {
    let session = session_arg(args)?;
    let appointments = args
        .get("appointments")
        .filter(|v| v.is_array())
        .cloned()
        .ok_or_else(|| ToolError::BadArgs("'appointments' must be an array".into()))?;
    Ok(wrap(
        client.upload_upcoming(&session, appointments).await?,
        "report",
    ))
}

pub async fn list_upcoming_appointments(
    client: &BackendClient,
    args: &Value,
) -> Result<Value, ToolError> {
    let session = session_arg(args)?;

    let mut query = Vec::new();
    for key in ["locality", "benefit"] {
        if let Some(v) = args.get(key).and_then(Value::as_str) {
            query.push((key.to_string(), v.to_string()));
        }
    }
    if let Some(days) = args.get("max_wait_days").and_then(Value::as_i64) {
        query.push(("max_wait_days".to_string(), days.to_string()));
    }
    if let Some(active) = args.get("active_only").and_then(Value::as_bool) {
        query.push(("active_only".to_string(), active.to_string()));
    }

    Ok(wrap(
        client.list_upcoming(&session, &query).await?,
        "appointments",
    ))
}

pub async fn get_upcoming_appointment(
    client: &BackendClient,
    args: &Value,
) -> Result<Value, ToolError> {
    let session = session_arg(args)?;
    let queue_id = str_arg(args, "queue_id")?;
    Ok(wrap(
        client.get_upcoming(&session, &queue_id).await?,
        "appointment",
    ))
}

pub async fn deactivate_upcoming_appointment(
    client: &BackendClient,
    args: &Value,
) -> Result<Value, ToolError> {
    let session = session_arg(args)?;
    let queue_id = str_arg(args, "queue_id")?;
    Ok(wrap(
        client.deactivate_upcoming(&session, &queue_id).await?,
        "result",
    ))
}

pub async fn clear_inactive_appointments(
    client: &BackendClient,
    args: &Value,
) -> Result<Value, ToolError> {
    let session = session_arg(args)?;
    Ok(wrap(client.clear_inactive(&session).await?, "result"))
}
