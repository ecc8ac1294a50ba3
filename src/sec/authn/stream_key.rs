use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Serialize, Deserialize};

use crate::net::error::Error as NetError;
use crate::user;

/// transport marker placed in front of the encoded token
pub const STREAM_KEY_PREFIX: &str = "stream_";

/// what a stream key carries. no expiry claim is set, a key stays valid
/// until the shared secret rotates or the user disappears
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("stream key is missing the transport marker")]
    MissingMarker,

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<DecodeError> for NetError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::MissingMarker => NetError::new()
                .source(err),
            DecodeError::Jwt(err) => err.into(),
        }
    }
}

/// signing and verification state for stream keys, built once from the
/// configured shared secret
pub struct StreamKeys {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl StreamKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // keys are issued without an exp claim and must stay decodable
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        StreamKeys {
            header: Header::new(Algorithm::HS256),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn generate(&self, user: &user::User) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            username: user.username.clone(),
            email: user.email.clone(),
        };

        let encoded = jsonwebtoken::encode(&self.header, &claims, &self.encoding)?;

        Ok(format!("{STREAM_KEY_PREFIX}{encoded}"))
    }

    /// strips the transport marker and verifies the remainder against the
    /// shared secret. everything past the FIRST underscore is the token;
    /// base64url payloads may themselves contain underscores
    pub fn decode(&self, key: &str) -> Result<Claims, DecodeError> {
        let Some((_, encoded)) = key.split_once('_') else {
            return Err(DecodeError::MissingMarker);
        };

        let data = jsonwebtoken::decode::<Claims>(encoded, &self.decoding, &self.validation)?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_user() -> user::User {
        user::User {
            id: 1,
            username: String::from("some_username"),
            email: String::from("some_email@example.com"),
            avatar: None,
        }
    }

    #[test]
    fn generate_decode_round_trip() {
        let keys = StreamKeys::new("some_stream_key");
        let user = test_user();

        let key = keys.generate(&user).expect("failed to generate stream key");

        assert!(key.starts_with(STREAM_KEY_PREFIX), "missing transport marker: {key}");

        let claims = keys.decode(&key).expect("failed to decode stream key");

        assert_eq!(claims.username, user.username);
        assert_eq!(claims.email, user.email);
    }

    #[test]
    fn decode_rejects_different_secret() {
        let keys = StreamKeys::new("some_stream_key");
        let other = StreamKeys::new("rotated_stream_key");

        let key = keys.generate(&test_user()).expect("failed to generate stream key");

        match other.decode(&key) {
            Err(DecodeError::Jwt(err)) => {
                assert!(matches!(
                    err.kind(),
                    jsonwebtoken::errors::ErrorKind::InvalidSignature
                ), "unexpected jwt error {err:?}");
            },
            Err(err) => panic!("unexpected decode error {err:?}"),
            Ok(_) => panic!("key decoded with the wrong secret"),
        }
    }

    #[test]
    fn decode_rejects_missing_marker() {
        let keys = StreamKeys::new("some_stream_key");

        match keys.decode("notamarker") {
            Err(DecodeError::MissingMarker) => {},
            Err(err) => panic!("unexpected decode error {err:?}"),
            Ok(_) => panic!("marker-less key decoded"),
        }
    }

    #[test]
    fn decode_survives_underscores_in_payload() {
        // base64url alphabets include '_'. splitting must not truncate the
        // token at the second underscore
        let keys = StreamKeys::new("some_stream_key");
        let mut user = test_user();
        user.username = String::from("name_with_underscores_and_padding_chars");

        let key = keys.generate(&user).expect("failed to generate stream key");
        let claims = keys.decode(&key).expect("failed to decode stream key");

        assert_eq!(claims.username, user.username);
    }
}
