//! Response sanitizing: pull the JSON array out of the model's reply.
//!
//! Even when told to answer with "just a JSON array", chat models routinely
//! add a greeting before it or a remark after it. The array is recovered by
//! taking everything from the first `[` to the last `]`.
//!
//! Only square brackets are considered. A reply shaped as a single JSON
//! object is rejected rather than wrapped, and the extracted text is not
//! validated as JSON; the caller of the Lambda parses the body.

use crate::error::SuggestError;

/// Return the slice of `generated` from its first `[` to its last `]`, inclusive.
///
/// Fails with [`SuggestError::MalformedGeneratedOutput`] when either
/// delimiter is missing or the last `]` comes before the first `[`.
pub fn extract_json_array(generated: &str) -> Result<&str, SuggestError> {
    let start = generated.find('[');
    let end = generated.rfind(']');

    match (start, end) {
        (Some(start), Some(end)) if start <= end => Ok(&generated[start..=end]),
        _ => Err(SuggestError::MalformedGeneratedOutput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_and_trailing_commentary() {
        let raw = r#"Sure! Here you go: [{"optionName":"Burger"}] Hope that helps."#;
        assert_eq!(
            extract_json_array(raw).unwrap(),
            r#"[{"optionName":"Burger"}]"#
        );
    }

    #[test]
    fn keeps_nested_arrays_intact() {
        let raw = "```json\n[{\"tags\":[\"a\",\"b\"]},{\"tags\":[]}]\n```";
        assert_eq!(
            extract_json_array(raw).unwrap(),
            "[{\"tags\":[\"a\",\"b\"]},{\"tags\":[]}]"
        );
    }

    #[test]
    fn idempotent_on_sanitized_input() {
        let once = extract_json_array("noise [1, 2, 3] noise").unwrap();
        let twice = extract_json_array(once).unwrap();
        assert_eq!(once, "[1, 2, 3]");
        assert_eq!(once, twice);
    }

    #[test]
    fn fails_without_brackets() {
        let err = extract_json_array("I cannot help with that.").unwrap_err();
        assert!(matches!(err, SuggestError::MalformedGeneratedOutput));
        assert_eq!(
            err.to_string(),
            "Invalid JSON string format generated by OpenAI"
        );
    }

    #[test]
    fn fails_with_only_one_delimiter() {
        assert!(extract_json_array("[1, 2").is_err());
        assert!(extract_json_array("1, 2]").is_err());
        assert!(extract_json_array("").is_err());
    }

    #[test]
    fn fails_when_closing_precedes_opening() {
        assert!(extract_json_array("] backwards [").is_err());
    }

    #[test]
    fn does_not_recover_object_replies() {
        assert!(extract_json_array(r#"{"optionName":"Burger"}"#).is_err());
    }

    #[test]
    fn degenerate_empty_array() {
        assert_eq!(extract_json_array("[]").unwrap(), "[]");
    }
}
