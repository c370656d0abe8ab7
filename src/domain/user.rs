//! User identity attached to log entries.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RequestContext;
use crate::error::{LoggerError, LoggerResult};

// Clients are inconsistent about padding and alphabet.
const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Identity of the caller behind a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(Value);

impl UserIdentity {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> LoggerResult<Self> {
        Ok(Self(serde_json::to_value(value)?))
    }

    /// Decode a base64-encoded JSON header value.
    ///
    /// `header` is only used to name the header in the error.
    pub fn decode_header(header: &str, raw: &str) -> LoggerResult<Self> {
        let malformed = |reason: String| LoggerError::MalformedUserHeader {
            header: header.to_string(),
            reason,
        };

        let raw = raw.trim();
        let bytes = STANDARD_LENIENT
            .decode(raw)
            .or_else(|_| URL_SAFE_LENIENT.decode(raw))
            .map_err(|e| malformed(format!("invalid base64: {}", e)))?;
        let text = String::from_utf8(bytes).map_err(|e| malformed(format!("invalid UTF-8: {}", e)))?;
        let value = serde_json::from_str(&text).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Resolves the user behind a request when no explicit identity or user
/// header is available.
pub trait UserExtractor: Send + Sync {
    fn extract(&self, request: &dyn RequestContext) -> Option<UserIdentity>;
}

impl<F> UserExtractor for F
where
    F: Fn(&dyn RequestContext) -> Option<UserIdentity> + Send + Sync,
{
    fn extract(&self, request: &dyn RequestContext) -> Option<UserIdentity> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use serde_json::json;

    #[test]
    fn test_decode_standard_header() {
        let raw = STANDARD.encode(r#"{"id":"u1","role":"admin"}"#);
        let user = UserIdentity::decode_header("baw-user", &raw).unwrap();
        assert_eq!(user.as_value(), &json!({"id": "u1", "role": "admin"}));
    }

    #[test]
    fn test_decode_url_safe_unpadded_header() {
        let raw = URL_SAFE_NO_PAD.encode(r#"{"name":"Zoë ~?>"}"#);
        let user = UserIdentity::decode_header("baw-user", &raw).unwrap();
        assert_eq!(user.into_value(), json!({"name": "Zoë ~?>"}));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = UserIdentity::decode_header("baw-user", "%%% not base64").unwrap_err();
        match err {
            LoggerError::MalformedUserHeader { header, reason } => {
                assert_eq!(header, "baw-user");
                assert!(reason.starts_with("invalid base64"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let raw = STANDARD.encode("just text");
        let err = UserIdentity::decode_header("baw-user", &raw).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let raw = STANDARD.encode([0xff, 0xfe, 0xfd]);
        let err = UserIdentity::decode_header("baw-user", &raw).unwrap_err();
        assert!(err.to_string().contains("invalid UTF-8"));
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Claims {
            sub: String,
        }

        let user = UserIdentity::from_serialize(&Claims {
            sub: "u9".to_string(),
        })
        .unwrap();
        assert_eq!(user.as_value(), &json!({"sub": "u9"}));
    }
}
