//! Wire form of a refresh token: URL-safe base64 over `{"session_id", "random_part"}`.
//!
//! The session id locates the row; the random part is the secret whose bcrypt hash
//! the row stores.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

/// Encodes with padding, accepts tokens with or without it.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    #[error("refresh token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("refresh token payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub session_id: i64,
    pub random_part: String,
}

impl RefreshToken {
    pub fn new(session_id: i64, random_part: String) -> Self {
        Self {
            session_id,
            random_part,
        }
    }

    pub fn encode(&self) -> Result<String, RefreshTokenError> {
        let json = serde_json::to_vec(self)?;
        Ok(TOKEN_ENGINE.encode(json))
    }

    pub fn decode(token: &str) -> Result<Self, RefreshTokenError> {
        let json = TOKEN_ENGINE.decode(token.trim())?;
        Ok(serde_json::from_slice(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

    #[test]
    fn encoded_token_is_url_safe_json() {
        let token = RefreshToken::new(17, "c2VjcmV0".to_string()).encode().unwrap();

        let json = URL_SAFE.decode(&token).expect("standard url-safe decoder");
        assert_eq!(
            String::from_utf8(json).unwrap(),
            r#"{"session_id":17,"random_part":"c2VjcmV0"}"#
        );
    }

    #[test]
    fn decode_accepts_unpadded_tokens() {
        let unpadded = URL_SAFE_NO_PAD.encode(r#"{"session_id":3,"random_part":"abc"}"#);

        let token = RefreshToken::decode(&unpadded).expect("decode");

        assert_eq!(token, RefreshToken::new(3, "abc".to_string()));
    }

    #[test]
    fn decode_rejects_non_base64() {
        assert!(matches!(
            RefreshToken::decode("%%% not base64 %%%"),
            Err(RefreshTokenError::Encoding(_))
        ));
    }

    #[test]
    fn decode_rejects_wrong_payload_shape() {
        let token = URL_SAFE.encode(r#"{"session_id":"seven","random_part":"abc"}"#);

        assert!(matches!(
            RefreshToken::decode(&token),
            Err(RefreshTokenError::Payload(_))
        ));
    }

    #[test]
    fn decode_rejects_missing_secret() {
        let token = URL_SAFE.encode(r#"{"session_id":7}"#);

        assert!(RefreshToken::decode(&token).is_err());
    }
}
