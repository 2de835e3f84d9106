//! Parse sanitized model output into QA pairs

use crate::error::ExtractorError;
use qaforge_domain::QaPair;
use serde_json::{Map, Value};
use tracing::warn;

/// Pairs accepted from one response, plus how many items were rejected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPairs {
    /// Valid pairs in response order
    pub pairs: Vec<QaPair>,
    /// Items dropped for missing or empty fields
    pub dropped: usize,
}

/// Parse a sanitized response into QA pairs
///
/// The object between the first `{` and the last `}` must carry a
/// `qa_pairs` array. Items are validated one at a time; a bad item is
/// dropped without discarding the rest.
pub fn parse_qa_pairs(response: &str) -> Result<ParsedPairs, ExtractorError> {
    let json_str = extract_object(response)?;

    let json: Value = serde_json::from_str(json_str)?;

    let items = json
        .get("qa_pairs")
        .and_then(Value::as_array)
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected a 'qa_pairs' array".to_string()))?;

    let mut parsed = ParsedPairs::default();
    for (idx, item) in items.iter().enumerate() {
        match parse_pair_json(item) {
            Ok(pair) => {
                if let Err(e) = pair.validate() {
                    warn!("QA pair {} failed validation: {}", idx, e);
                    parsed.dropped += 1;
                    continue;
                }
                parsed.pairs.push(pair);
            }
            Err(e) => {
                warn!("Failed to parse QA pair {}: {}", idx, e);
                parsed.dropped += 1;
            }
        }
    }

    Ok(parsed)
}

/// Slice from the first `{` through the last `}`
pub fn extract_object(response: &str) -> Result<&str, ExtractorError> {
    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&response[start..=end]),
        _ => Err(ExtractorError::InvalidFormat(
            "No JSON object in response".to_string(),
        )),
    }
}

/// Parse a single QA item, accepting question/context/answer as aliases
fn parse_pair_json(json: &Value) -> Result<QaPair, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "QA pair is not a JSON object".to_string())?;

    let instruction = field(obj, &["instruction", "question"])?
        .ok_or_else(|| "Missing 'instruction'".to_string())?;

    let input = field(obj, &["input", "context"])?.unwrap_or_default();

    let output = field(obj, &["output", "answer"])?
        .ok_or_else(|| "Missing 'output'".to_string())?;

    Ok(QaPair::new(instruction.trim(), input.trim(), output.trim()))
}

/// First present key among `names`; null counts as absent, other non-strings are errors
fn field(obj: &Map<String, Value>, names: &[&str]) -> Result<Option<String>, String> {
    for name in names {
        match obj.get(*name) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(_) => return Err(format!("'{}' is not a string", name)),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_response() {
        let response = r#"{"qa_pairs": [
            {"instruction": "What is Rust?", "input": "", "output": "A systems language."}
        ]}"#;

        let parsed = parse_qa_pairs(response).unwrap();
        assert_eq!(parsed.pairs.len(), 1);
        assert_eq!(parsed.dropped, 0);
        assert_eq!(parsed.pairs[0].instruction, "What is Rust?");
        assert_eq!(parsed.pairs[0].output, "A systems language.");
    }

    #[test]
    fn test_surrounding_prose_ignored() {
        let response = "Here you go:\n```json\n{\"qa_pairs\": [{\"instruction\": \"Q\", \"output\": \"A\"}]}\n```\nDone.";
        let parsed = parse_qa_pairs(response).unwrap();
        assert_eq!(parsed.pairs.len(), 1);
        assert_eq!(parsed.pairs[0].input, "");
    }

    #[test]
    fn test_empty_output_dropped_individually() {
        let response = r#"{"qa_pairs": [
            {"instruction": "Q1", "input": "", "output": ""},
            {"instruction": "Q2", "input": "", "output": "A2"}
        ]}"#;

        let parsed = parse_qa_pairs(response).unwrap();
        assert_eq!(parsed.pairs.len(), 1);
        assert_eq!(parsed.pairs[0].instruction, "Q2");
        assert_eq!(parsed.dropped, 1);
    }

    #[test]
    fn test_partial_acceptance() {
        let response = r#"{"qa_pairs": [
            {"instruction": "Q1", "output": "A1"},
            "not an object",
            {"instruction": "Q3"},
            {"instruction": 7, "output": "A4"},
            {"instruction": "   ", "output": "A5"},
            {"instruction": "Q6", "output": "A6"}
        ]}"#;

        let parsed = parse_qa_pairs(response).unwrap();
        let instructions: Vec<_> = parsed.pairs.iter().map(|p| p.instruction.as_str()).collect();
        assert_eq!(instructions, vec!["Q1", "Q6"]);
        assert_eq!(parsed.dropped, 4);
    }

    #[test]
    fn test_alias_field_names() {
        let response = r#"{"qa_pairs": [
            {"question": "Q", "context": "C", "answer": "A"}
        ]}"#;
        let pair = &parse_qa_pairs(response).unwrap().pairs[0];
        assert_eq!(pair.instruction, "Q");
        assert_eq!(pair.input, "C");
        assert_eq!(pair.output, "A");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let response = r#"{"qa_pairs": [{"instruction": " Q \n", "input": null, "output": "\tA "}]}"#;
        let pair = &parse_qa_pairs(response).unwrap().pairs[0];
        assert_eq!(pair.instruction, "Q");
        assert_eq!(pair.input, "");
        assert_eq!(pair.output, "A");
    }

    #[test]
    fn test_empty_list_is_ok() {
        let parsed = parse_qa_pairs(r#"{"qa_pairs": []}"#).unwrap();
        assert!(parsed.pairs.is_empty());
        assert_eq!(parsed.dropped, 0);
    }

    #[test]
    fn test_missing_list_rejected() {
        let result = parse_qa_pairs(r#"{"pairs": []}"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));

        let result = parse_qa_pairs(r#"{"qa_pairs": "none"}"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_qa_pairs("This is not JSON"),
            Err(ExtractorError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_qa_pairs("{ broken"),
            Err(ExtractorError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_qa_pairs("{\"qa_pairs\": [}"),
            Err(ExtractorError::JsonParse(_))
        ));
    }

    #[test]
    fn test_extract_object_bounds() {
        assert_eq!(extract_object("x {\"a\": {\"b\": 1}} y").unwrap(), "{\"a\": {\"b\": 1}}");
        assert!(extract_object("} backwards {").is_err());
        assert!(extract_object("").is_err());
    }
}
