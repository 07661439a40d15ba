use serde::Deserialize;

use super::StructuringError;

/// Fields as the model reported them, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAppointmentFields {
    pub name: Option<String>,
    pub date: Option<String>,
    pub appointment_type: Option<String>,
    pub summary: Option<String>,
    pub doctor: Option<String>,
    pub confidence_score: Option<i64>,
}

/// Parse the model's response into raw appointment fields.
///
/// Models sometimes wrap the JSON in a markdown fence despite being told
/// not to, so fences are stripped before parsing.
pub fn parse_llm_response(response: &str) -> Result<RawAppointmentFields, StructuringError> {
    let json_str = strip_code_fence(response);
    serde_json::from_str(json_str).map_err(|e| StructuringError::JsonParsing(e.to_string()))
}

fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = r#"{"name": "Badanie krwi", "date": "2025-10-01",
        "appointment_type": "Lab Work", "summary": "Routine panel",
        "doctor": "dr Wisniewska", "confidence_score": 92}"#;

    #[test]
    fn parses_plain_json() {
        let raw = parse_llm_response(PLAIN).unwrap();
        assert_eq!(raw.name.as_deref(), Some("Badanie krwi"));
        assert_eq!(raw.confidence_score, Some(92));
    }

    #[test]
    fn strips_json_fence() {
        let fenced = format!("```json\n{PLAIN}\n```");
        let raw = parse_llm_response(&fenced).unwrap();
        assert_eq!(raw.appointment_type.as_deref(), Some("Lab Work"));
    }

    #[test]
    fn strips_bare_fence() {
        let fenced = format!("```\n{PLAIN}\n```");
        assert!(parse_llm_response(&fenced).is_ok());
    }

    #[test]
    fn missing_keys_become_none() {
        let raw = parse_llm_response(r#"{"name": "Wizyta"}"#).unwrap();
        assert!(raw.date.is_none());
        assert!(raw.confidence_score.is_none());
    }

    #[test]
    fn prose_response_is_an_error() {
        let err = parse_llm_response("I could not find any appointment.").unwrap_err();
        assert!(matches!(err, StructuringError::JsonParsing(_)));
    }
}
