pub mod client;
pub mod parser;
pub mod prompt;
pub mod validate;

pub use client::{LlmClient, MockLlmClient, OpenAiClient};
pub use parser::RawAppointmentFields;
pub use validate::AppointmentFields;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StructuringError {
    #[error("Cannot connect to LLM endpoint at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("LLM API returned status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Failed to parse LLM response: {0}")]
    ResponseParsing(String),

    #[error("Failed to parse JSON from LLM: {0}")]
    JsonParsing(String),

    #[error("Extraction confidence too low: {0}")]
    LowConfidence(i64),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Cannot determine appointment type: {0}")]
    CannotDetermineType(String),
}

/// Run the full structuring pass: prompt the model, parse its JSON and
/// validate the result into usable appointment fields.
pub fn structure_appointment(
    client: &dyn LlmClient,
    model: &str,
    document_text: &str,
) -> Result<AppointmentFields, StructuringError> {
    let user_prompt = prompt::build_user_prompt(document_text);
    let response = client.complete(model, prompt::SYSTEM_PROMPT, &user_prompt)?;
    debug!(chars = response.len(), "LLM structuring response received");

    let raw = parser::parse_llm_response(&response)?;
    validate::validate_fields(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::AppointmentType;

    #[test]
    fn full_pass_on_well_formed_response() {
        let client = MockLlmClient::with_response(
            r#"{"name": "Konsultacja kardiologiczna", "date": "2025-09-15",
                "appointment_type": "Specialist", "summary": "Follow-up ECG",
                "doctor": "dr Nowak", "confidence_score": 88}"#,
        );

        let fields = structure_appointment(&client, "gpt-3.5-turbo", "some referral text").unwrap();
        assert_eq!(fields.appointment_type, AppointmentType::Specialist);
        assert_eq!(fields.confidence_score, 88);
    }

    #[test]
    fn low_confidence_surfaces_as_error() {
        let client = MockLlmClient::with_response(
            r#"{"name": "x", "date": "2025-09-15", "appointment_type": "Specialist",
                "summary": "y", "doctor": "z", "confidence_score": 30}"#,
        );

        let err = structure_appointment(&client, "gpt-3.5-turbo", "blurry scan").unwrap_err();
        assert!(matches!(err, StructuringError::LowConfidence(30)));
    }
}
