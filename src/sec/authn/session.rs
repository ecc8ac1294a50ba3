use sks_api::ids;

use chrono::Utc;
use base64::{Engine, engine::general_purpose::URL_SAFE};
use tokio_postgres::Error as PgError;
use deadpool_postgres::GenericClient;
use hmac::{Hmac, Mac, digest::CtOutput};
use sha3::Sha3_256;

use crate::sec::state::SessionInfo;
use crate::net::error::Error as NetError;
use crate::net::cookie::{SameSite, SetCookie};

pub mod token;

pub enum BuilderError {
    TokenAttempts,
    UtcOverflow,

    Pg(PgError),
    Rand(rand::Error),
}

impl From<PgError> for BuilderError {
    fn from(err: PgError) -> Self {
        BuilderError::Pg(err)
    }
}

impl From<token::UniqueError> for BuilderError {
    fn from(err: token::UniqueError) -> Self {
        match err {
            token::UniqueError::Rand(err) => BuilderError::Rand(err),
            token::UniqueError::Pg(err) => BuilderError::Pg(err)
        }
    }
}

impl From<BuilderError> for NetError {
    fn from(err: BuilderError) -> NetError {
        match err {
            BuilderError::TokenAttempts => NetError::new()
                .source("ran out of token attempts"),
            BuilderError::UtcOverflow => NetError::new()
                .source("date time value overflowed"),
            BuilderError::Pg(err) => err.into(),
            BuilderError::Rand(err) => err.into(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    pub token: token::SessionToken,
    pub user_id: ids::UserId,
    pub dropped: bool,
    pub issued_on: chrono::DateTime<chrono::Utc>,
    pub expires: chrono::DateTime<chrono::Utc>,
}

impl Session {
    /// creates a session record for the user, valid for seven days
    pub async fn create(
        conn: &impl GenericClient,
        user_id: ids::UserId,
    ) -> Result<Session, BuilderError> {
        let dropped = false;
        let issued_on = Utc::now();
        let duration = chrono::Duration::days(7);

        let Some(token) = token::SessionToken::unique(conn, 10).await? else {
            return Err(BuilderError::TokenAttempts);
        };

        let Some(expires) = issued_on.clone().checked_add_signed(duration) else {
            return Err(BuilderError::UtcOverflow);
        };

        let _ = conn.execute(
            "\
            insert into auth_sessions (token, user_id, dropped, issued_on, expires) values \
            ($1, $2, $3, $4, $5)",
            &[
                &token.as_slice(),
                &user_id,
                &dropped,
                &issued_on,
                &expires,
            ]
        ).await?;

        Ok(Session {
            token,
            user_id,
            dropped,
            issued_on,
            expires,
        })
    }

    pub async fn retrieve_token(
        conn: &impl GenericClient,
        token: &token::SessionToken
    ) -> Result<Option<Session>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select auth_sessions.token, \
                   auth_sessions.user_id, \
                   auth_sessions.dropped, \
                   auth_sessions.issued_on, \
                   auth_sessions.expires \
            from auth_sessions \
            where auth_sessions.token = $1",
            &[&token.as_slice()]
        ).await? {
            Ok(Some(Session {
                token: token::SessionToken::from_vec(row.get(0)),
                user_id: row.get(1),
                dropped: row.get(2),
                issued_on: row.get(3),
                expires: row.get(4),
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn delete(&self, conn: &impl GenericClient) -> Result<(), PgError> {
        let _ = conn.execute(
            "delete from auth_sessions where token = $1",
            &[&self.token.as_slice()]
        ).await?;

        Ok(())
    }
}

type SessionMac = Hmac<Sha3_256>;

const MAC_LEN: usize = 32;

pub fn create_hash<T>(info: &SessionInfo, token: T) -> CtOutput<SessionMac>
where
    T: AsRef<[u8]>
{
    let mut mac = SessionMac::new_from_slice(info.key()).unwrap();
    mac.update(token.as_ref());

    mac.finalize()
}

pub fn encode_base64<T>(token: T, hash: CtOutput<SessionMac>) -> String
where
    T: AsRef<[u8]>
{
    let token_ref = token.as_ref();
    let bytes = hash.into_bytes();
    let slice = bytes.as_slice();

    let mut joined = Vec::with_capacity(token_ref.len() + slice.len());
    joined.extend_from_slice(token_ref);
    joined.extend_from_slice(slice);

    URL_SAFE.encode(joined)
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("session id is not valid base64")]
    InvalidString,

    #[error("session id does not have the proper length")]
    InvalidLength,

    #[error("session id hash does not match")]
    InvalidHash,
}

pub fn decode_base64<S>(info: &SessionInfo, session_id: S) -> Result<token::SessionToken, DecodeError>
where
    S: AsRef<[u8]>
{
    let mut bytes = match URL_SAFE.decode(session_id) {
        Ok(b) => b,
        Err(_) => {
            return Err(DecodeError::InvalidString);
        }
    };

    if bytes.len() != token::SESSION_ID_BYTES + MAC_LEN {
        return Err(DecodeError::InvalidLength);
    }

    let token = token::SessionToken::drain_vec(&mut bytes);

    let mut mac = SessionMac::new_from_slice(info.key()).unwrap();
    mac.update(token.as_slice());

    if mac.verify_slice(&bytes).is_err() {
        Err(DecodeError::InvalidHash)
    } else {
        Ok(token)
    }
}

pub fn create_session_cookie(info: &SessionInfo, session: &Session) -> SetCookie {
    let hash = create_hash(info, &session.token);
    let encoded_token = encode_base64(&session.token, hash);

    let mut cookie = SetCookie::new("session_id", encoded_token)
        .with_expires(session.expires.clone())
        .with_path("/")
        .with_http_only(true)
        .with_secure(*info.secure())
        .with_same_site(SameSite::Strict);

    if let Some(domain) = info.domain() {
        cookie.set_domain(domain);
    }

    cookie
}

pub fn expire_session_cookie(info: &SessionInfo) -> SetCookie {
    let mut cookie = SetCookie::new("session_id", "")
        .with_max_age(std::time::Duration::new(0, 0))
        .with_path("/")
        .with_http_only(true)
        .with_secure(*info.secure())
        .with_same_site(SameSite::Strict);

    if let Some(domain) = info.domain() {
        cookie.set_domain(domain);
    }

    cookie
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sec::state::Sec;

    #[test]
    fn encode_decode_round_trip() {
        let sec = Sec::test_state();
        let token = token::SessionToken::test_token();
        let hash = create_hash(sec.session_info(), &token);

        let encoded = encode_base64(&token, hash);

        let decoded = decode_base64(sec.session_info(), &encoded)
            .expect("failed to decode session id");

        assert_eq!(token, decoded, "tokens do not match");
    }

    #[test]
    fn decode_rejects_tampered_mac() {
        let sec = Sec::test_state();
        let token = token::SessionToken::test_token();
        let hash = create_hash(sec.session_info(), &token);

        let encoded = encode_base64(&token, hash);

        let mut bytes = URL_SAFE.decode(encoded.as_bytes())
            .expect("failed to decode original base64 encoded string");

        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;

        let tampered = URL_SAFE.encode(bytes);

        match decode_base64(sec.session_info(), &tampered) {
            Err(DecodeError::InvalidHash) => {},
            Err(err) => panic!("unexpected decode error {err:?}"),
            Ok(_) => panic!("tampered session id decoded"),
        }
    }

    #[test]
    fn decode_rejects_short_value() {
        let sec = Sec::test_state();

        match decode_base64(sec.session_info(), URL_SAFE.encode([0u8; 8])) {
            Err(DecodeError::InvalidLength) => {},
            Err(err) => panic!("unexpected decode error {err:?}"),
            Ok(_) => panic!("short session id decoded"),
        }
    }
}
