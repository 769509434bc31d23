//! Decoding of the backend's `{code, message, data}` response envelope.
//!
//! Every 200 response body is decoded exactly once at the client boundary
//! into either a business envelope or a raw pass-through value. Endpoints
//! that predate the unified envelope return bare JSON; those flow through
//! untouched as [`Body::Raw`].

use serde::Deserialize;
use serde_json::Value;

/// Envelope code for a successful business response.
pub const CODE_OK: i64 = 200;
/// Envelope code for an expired access token; triggers the refresh protocol.
pub const CODE_TOKEN_EXPIRED: i64 = 4011;
/// Envelope code for operations that demand a fresh login. Never retried.
pub const CODE_FRESH_LOGIN_REQUIRED: i64 = 4012;

/// The unified response envelope.
///
/// Callers receive the whole envelope rather than just `data` so that
/// metadata like `total` (pagination) stays available.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub total: Option<i64>,
}

impl Envelope {
    /// Deserialize the inner `data` payload into a concrete type.
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }

    /// The error message, or a generic fallback when the backend sent none.
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("request failed")
    }
}

/// A 200 response body, decoded once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Body carried the `code` discriminator field.
    Envelope(Envelope),
    /// Non-enveloped endpoint; the raw JSON value passes through.
    Raw(Value),
}

impl Body {
    /// Decode a response body. A JSON object with a numeric `code` field is
    /// treated as an envelope; anything else is raw.
    pub fn decode(value: Value) -> Result<Self, serde_json::Error> {
        let has_code = value
            .as_object()
            .map(|obj| obj.get("code").map(Value::is_number).unwrap_or(false))
            .unwrap_or(false);
        if has_code {
            Ok(Body::Envelope(serde_json::from_value(value)?))
        } else {
            Ok(Body::Raw(value))
        }
    }

    /// Unwrap as an envelope, if that is what this body is.
    pub fn as_envelope(&self) -> Option<&Envelope> {
        match self {
            Body::Envelope(env) => Some(env),
            Body::Raw(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_success_envelope() {
        let body = Body::decode(json!({
            "code": 200,
            "message": "ok",
            "data": {"id": 7},
            "total": 42
        }))
        .unwrap();

        let env = body.as_envelope().expect("should be an envelope");
        assert_eq!(env.code, CODE_OK);
        assert_eq!(env.message.as_deref(), Some("ok"));
        assert_eq!(env.total, Some(42));
        assert_eq!(env.data["id"], 7);
    }

    #[test]
    fn test_decode_error_envelope_without_data() {
        let body = Body::decode(json!({"code": 4011, "message": "token expired"})).unwrap();
        let env = body.as_envelope().unwrap();
        assert_eq!(env.code, CODE_TOKEN_EXPIRED);
        assert_eq!(env.data, Value::Null);
        assert!(env.total.is_none());
    }

    #[test]
    fn test_decode_raw_passthrough() {
        let raw = json!({"status": "healthy", "uptime": 120});
        let body = Body::decode(raw.clone()).unwrap();
        assert_eq!(body, Body::Raw(raw));
        assert!(body.as_envelope().is_none());
    }

    #[test]
    fn test_decode_non_numeric_code_is_raw() {
        // A body whose "code" is not a number is not the unified envelope.
        let raw = json!({"code": "green", "label": "tag"});
        let body = Body::decode(raw.clone()).unwrap();
        assert_eq!(body, Body::Raw(raw));
    }

    #[test]
    fn test_decode_array_is_raw() {
        let raw = json!([1, 2, 3]);
        assert_eq!(Body::decode(raw.clone()).unwrap(), Body::Raw(raw));
    }

    #[test]
    fn test_data_as_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Token {
            access_token: String,
        }

        let env = Envelope {
            code: 200,
            message: None,
            data: json!({"access_token": "Bearer abc"}),
            total: None,
        };
        let token: Token = env.data_as().unwrap();
        assert_eq!(token.access_token, "Bearer abc");
    }

    #[test]
    fn test_message_or_default() {
        let env = Envelope {
            code: 500,
            message: None,
            data: Value::Null,
            total: None,
        };
        assert_eq!(env.message_or_default(), "request failed");
    }
}
