use sks_api::ids;

use argon2::Variant;
use tokio_postgres::Error as PgError;
use deadpool_postgres::GenericClient;
use rand::RngCore;

pub const SALT_LEN: usize = 32;

pub type Salt = [u8; SALT_LEN];

pub fn gen_salt() -> Result<Salt, rand::Error> {
    let mut salt = [0u8; SALT_LEN];

    rand::thread_rng().try_fill_bytes(&mut salt)?;

    Ok(salt)
}

pub fn gen_hash(password: &str, salt: &[u8]) -> Result<String, argon2::Error> {
    let mut config = argon2::Config::default();
    config.mem_cost = 19456;
    config.variant = Variant::Argon2id;

    Ok(argon2::hash_encoded(
        password.as_bytes(),
        salt,
        &config
    )?)
}

/// the stored password hash of a user. lives on the users row, retrieved
/// separately so the hash never travels with the identity record
pub struct Password {
    pub user_id: ids::UserId,
    pub hash: String,
}

impl Password {
    pub async fn retrieve(
        conn: &impl GenericClient,
        user_id: &ids::UserId,
    ) -> Result<Option<Password>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select users.id, \
                   users.hash \
            from users \
            where users.id = $1",
            &[user_id]
        ).await? {
            Ok(Some(Password {
                user_id: row.get(0),
                hash: row.get(1),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn verify<C>(&self, check: C) -> Result<bool, argon2::Error>
    where
        C: AsRef<str>
    {
        argon2::verify_encoded(&self.hash, check.as_ref().as_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hash_verifies_matching_password() {
        let salt = gen_salt().expect("failed to generate salt");
        let hash = gen_hash("admin", &salt).expect("failed to hash password");

        let password = Password {
            user_id: 1,
            hash,
        };

        assert!(password.verify("admin").expect("failed to verify password"));
        assert!(!password.verify("other").expect("failed to verify password"));
    }

    #[test]
    fn same_password_different_salt_different_hash() {
        let first = gen_hash("admin", &gen_salt().unwrap()).unwrap();
        let second = gen_hash("admin", &gen_salt().unwrap()).unwrap();

        assert_ne!(first, second);
    }
}
