use deadpool_postgres::GenericClient;
use tokio_postgres::Error as PgError;

use crate::net::error::Error as NetError;
use crate::user;

pub mod password;
pub mod session;
pub mod stream_key;
pub mod initiator;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Argon2(#[from] argon2::Error),

    #[error(transparent)]
    Db(#[from] PgError),
}

impl From<VerifyError> for NetError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Argon2(e) => e.into(),
            VerifyError::Db(e) => e.into(),
        }
    }
}

/// the credential check seam. a backend resolves a username/password pair
/// to a user identity, or to nothing when the pair does not check out
pub trait VerifyCredentials {
    async fn verify(
        &self,
        conn: &impl GenericClient,
        username: &str,
        given: &str,
    ) -> Result<Option<user::User>, VerifyError>;
}

/// checks the given password against the argon2 hash stored with the user
/// row
pub struct PasswordBackend;

impl VerifyCredentials for PasswordBackend {
    async fn verify(
        &self,
        conn: &impl GenericClient,
        username: &str,
        given: &str,
    ) -> Result<Option<user::User>, VerifyError> {
        let Some(user) = user::User::retrieve_username(conn, username).await? else {
            return Ok(None);
        };

        let Some(stored) = password::Password::retrieve(conn, &user.id).await? else {
            return Ok(None);
        };

        if stored.verify(given)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
