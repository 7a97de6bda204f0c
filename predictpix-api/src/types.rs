//! Wire-level helpers for PredictPIX API responses
//!
//! The backend returns either the bare payload or the payload wrapped in a
//! `{ "data": ... }` envelope. Error responses carry a `message`, `error`
//! or `detail` field.

use predictpix_core::PredictError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Error body returned on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message in the body
    pub fn into_message(self) -> Option<String> {
        if let Some(message) = self.message.filter(|m| !m.is_empty()) {
            return Some(message);
        }
        match self.error {
            Some(Value::String(s)) if !s.is_empty() => return Some(s),
            Some(Value::Object(map)) => {
                if let Some(Value::String(s)) = map.get("message") {
                    return Some(s.clone());
                }
            }
            _ => {}
        }
        self.detail.filter(|d| !d.is_empty())
    }
}

/// Decode a success body, unwrapping the `data` envelope when present
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, PredictError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| PredictError::parse(format!("Invalid JSON in response: {}", e)))?;

    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value(payload)
        .map_err(|e| PredictError::parse(format!("Unexpected response shape: {}", e)))
}

/// Extract a readable message from an error body
///
/// Falls back to the raw body text, or the status reason when the body is empty.
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use predictpix_core::Market;

    #[test]
    fn test_decode_wrapped_and_bare() {
        let wrapped = r#"{"data": {"id": 1, "title": "Wrapped", "status": "active"}}"#;
        let bare = r#"{"id": 2, "title": "Bare", "status": "pending"}"#;

        let market: Market = decode_payload(wrapped).unwrap();
        assert_eq!(market.id, 1);

        let market: Market = decode_payload(bare).unwrap();
        assert_eq!(market.title, "Bare");

        let markets: Vec<Market> = decode_payload("[]").unwrap();
        assert!(markets.is_empty());
    }

    #[test]
    fn test_decode_errors_are_parse_errors() {
        let err = decode_payload::<Market>("not json").unwrap_err();
        assert!(matches!(err, PredictError::Parse(_)));

        let err = decode_payload::<Market>(r#"{"unexpected": true}"#).unwrap_err();
        assert!(matches!(err, PredictError::Parse(_)));
    }

    #[test]
    fn test_error_message_sources() {
        assert_eq!(error_message(r#"{"message": "Network error"}"#, "x"), "Network error");
        assert_eq!(error_message(r#"{"error": "Invalid tier"}"#, "x"), "Invalid tier");
        assert_eq!(
            error_message(r#"{"error": {"message": "Nested"}}"#, "x"),
            "Nested"
        );
        assert_eq!(error_message(r#"{"detail": "Too short"}"#, "x"), "Too short");
        assert_eq!(error_message("Bad Gateway", "x"), "Bad Gateway");
        assert_eq!(error_message("", "Internal Server Error"), "Internal Server Error");
    }
}
