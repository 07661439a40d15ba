//! Tool catalogue and dispatch.

use serde::Serialize;
use serde_json::{json, Value};

use super::client::BackendClient;
use super::{handlers, ToolError};

/// A tool descriptor in the shape agent frameworks expect: name, a
/// short description, and a JSON schema for the arguments.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

fn token_property() -> Value {
    json!({ "type": "string", "description": "Bearer token from the login tool" })
}

/// All tools the gateway exposes.
pub fn registry() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "login",
            description: "Log in with an email address. Returns a bearer token for the other tools.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "email": { "type": "string", "description": "Account email" }
                },
                "required": ["email"]
            }),
        },
        ToolSpec {
            name: "get_current_user",
            description: "Return the account behind a bearer token.",
            parameters: json!({
                "type": "object",
                "properties": { "token": token_property() },
                "required": ["token"]
            }),
        },
        ToolSpec {
            name: "parse_pdf",
            description: "Upload a local PDF referral and store the structured appointment.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "token": token_property(),
                    "file_path": { "type": "string", "description": "Path to a local .pdf file" }
                },
                "required": ["token", "file_path"]
            }),
        },
        ToolSpec {
            name: "list_parsed_appointments",
            description: "List the appointments parsed from the user's uploaded documents.",
            parameters: json!({
                "type": "object",
                "properties": { "token": token_property() },
                "required": ["token"]
            }),
        },
        ToolSpec {
            name: "upload_upcoming_appointments",
            description: "Bulk-upload queue listings. Existing queue_ids are updated in place.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "token": token_property(),
                    "appointments": {
                        "type": "array",
                        "description": "Queue listings with queue_id, place, provider, locality, date, benefit, waiting_people and average_wait_days"
                    }
                },
                "required": ["token", "appointments"]
            }),
        },
        ToolSpec {
            name: "list_upcoming_appointments",
            description: "List upcoming queue slots, soonest first. All filters optional.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "token": token_property(),
                    "locality": { "type": "string", "description": "Substring match on locality" },
                    "benefit": { "type": "string", "description": "Substring match on benefit" },
                    "max_wait_days": { "type": "integer", "description": "Maximum average wait in days" },
                    "active_only": { "type": "boolean", "description": "Defaults to true" }
                },
                "required": ["token"]
            }),
        },
        ToolSpec {
            name: "get_upcoming_appointment",
            description: "Fetch one queue slot by its queue_id.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "token": token_property(),
                    "queue_id": { "type": "string" }
                },
                "required": ["token", "queue_id"]
            }),
        },
        ToolSpec {
            name: "deactivate_upcoming_appointment",
            description: "Mark a queue slot inactive without deleting it.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "token": token_property(),
                    "queue_id": { "type": "string" }
                },
                "required": ["token", "queue_id"]
            }),
        },
        ToolSpec {
            name: "clear_inactive_appointments",
            description: "Delete every inactive queue slot.",
            parameters: json!({
                "type": "object",
                "properties": { "token": token_property() },
                "required": ["token"]
            }),
        },
    ]
}

/// Run one tool call. Unknown names and argument errors come back as
/// error objects, never as transport failures.
pub async fn dispatch(client: &BackendClient, name: &str, args: &Value) -> Value {
    let result = match name {
        "login" => handlers::login(client, args).await,
        "get_current_user" => handlers::get_current_user(client, args).await,
        "parse_pdf" => handlers::parse_pdf(client, args).await,
        "list_parsed_appointments" => handlers::list_parsed_appointments(client, args).await,
        "upload_upcoming_appointments" => {
            handlers::upload_upcoming_appointments(client, args).await
        }
        "list_upcoming_appointments" => handlers::list_upcoming_appointments(client, args).await,
        "get_upcoming_appointment" => handlers::get_upcoming_appointment(client, args).await,
        "deactivate_upcoming_appointment" => {
            handlers::deactivate_upcoming_appointment(client, args).await
        }
        "clear_inactive_appointments" => handlers::clear_inactive_appointments(client, args).await,
        other => Err(ToolError::UnknownTool(other.to_string())),
    };

    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(tool = name, "Tool call failed: {e}");
            json!({ "status": "error", "message": e.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_has_nine_unique_tools() {
        let specs = registry();
        assert_eq!(specs.len(), 9);
        let names: HashSet<_> = specs.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn every_schema_is_an_object_with_required() {
        for spec in registry() {
            assert_eq!(spec.parameters["type"], "object", "{}", spec.name);
            assert!(spec.parameters["required"].is_array(), "{}", spec.name);
        }
    }

    #[test]
    fn authed_tools_all_require_token() {
        for spec in registry() {
            if spec.name == "login" {
                continue;
            }
            let required = spec.parameters["required"].as_array().unwrap();
            assert!(
                required.iter().any(|v| v == "token"),
                "{} must require a token",
                spec.name
            );
        }
    }

    #[tokio::test]
    async fn unknown_tool_reports_error() {
        let client = BackendClient::new("http://localhost:8000");
        let result = dispatch(&client, "does_not_exist", &json!({})).await;
        assert_eq!(result["status"], "error");
        assert!(result["message"]
            .as_str()
            .unwrap()
            .contains("does_not_exist"));
    }

    #[tokio::test]
    async fn bad_args_report_error_not_panic() {
        let client = BackendClient::new("http://localhost:8000");
        let result = dispatch(&client, "login", &json!({})).await;
        assert_eq!(result["status"], "error");
    }
}
