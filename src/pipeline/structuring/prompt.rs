use crate::models::enums::AppointmentType;

/// Document text beyond this many characters is cut before prompting.
/// Appointment details sit at the top of referrals, the tail is boilerplate.
const MAX_PROMPT_CHARS: usize = 4000;

pub const SYSTEM_PROMPT: &str = "You are a medical document assistant. You extract appointment \
details from Polish and English medical documents and respond with a single JSON object, \
nothing else.";

/// Build the user prompt for a structuring pass.
pub fn build_user_prompt(document_text: &str) -> String {
    let text = truncate_chars(document_text, MAX_PROMPT_CHARS);
    let types = AppointmentType::assignable().join(", ");

    format!(
        "Extract the appointment details from the document below.\n\
         Respond with exactly one JSON object with these keys:\n\
         - \"name\": short appointment title\n\
         - \"date\": appointment date as YYYY-MM-DD\n\
         - \"appointment_type\": one of [{types}]\n\
         - \"summary\": one-sentence summary of the visit purpose\n\
         - \"doctor\": the doctor or provider name\n\
         - \"confidence_score\": integer 0-100, how confident you are in the extraction\n\n\
         Document:\n{text}"
    )
}

/// Truncate on a char boundary, not a byte boundary.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
