use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Category, ClassificationRecord, Sentiment};

/// Loose shape of the service reply before validation.
#[derive(Debug, Deserialize)]
struct RawClassification {
    #[serde(alias = "sentimento")]
    sentiment: Option<String>,
    #[serde(alias = "categoria")]
    category: Option<String>,
    #[serde(alias = "resumo_curto")]
    short_summary: Option<String>,
}

pub fn parse_classification(response: &str) -> Result<ClassificationRecord> {
    let json_str = extract_json(response)?;

    let raw: RawClassification = serde_json::from_str(&json_str)?;

    validate(raw)
}

fn validate(raw: RawClassification) -> Result<ClassificationRecord> {
    let sentiment = raw.sentiment.ok_or_else(|| missing("sentimento"))?;
    let category = raw.category.ok_or_else(|| missing("categoria"))?;
    let short_summary = raw.short_summary.ok_or_else(|| missing("resumo_curto"))?;

    // The sentinel labels are reserved for local failures
    let sentiment = Sentiment::from_label(&sentiment)
        .filter(|s| *s != Sentiment::Error)
        .ok_or_else(|| Error::ParseError(format!("Unexpected sentiment: {}", sentiment)))?;
    let category = Category::from_label(&category)
        .filter(|c| *c != Category::Error)
        .ok_or_else(|| Error::ParseError(format!("Unexpected category: {}", category)))?;

    Ok(ClassificationRecord::new(sentiment, category, short_summary.trim()))
}

fn missing(field: &str) -> Error {
    Error::ParseError(format!("Missing required field: {}", field))
}

/// Reduces a free-form reply to the JSON object it carries.
pub fn extract_json(text: &str) -> Result<String> {
    let mut cleaned = text.trim().to_string();

    if cleaned.contains("```") {
        cleaned = cleaned.replace("```json", "").replace("```JSON", "").replace("```", "");
        cleaned = cleaned.trim().to_string();
    }

    if serde_json::from_str::<Value>(&cleaned).is_ok() {
        return Ok(cleaned);
    }

    // Fall back to the outermost braces
    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(cleaned[start..=end].to_string()),
        _ => Err(Error::ParseError("No valid JSON found in response".to_string())),
    }
}
