use sks_api::ids;

use chrono::{DateTime, Utc};
use tokio_postgres::Error as PgError;
use deadpool_postgres::GenericClient;

/// identity record of a registered user. the password hash stays out of
/// this struct, crate::sec::authn::password retrieves it on its own
#[derive(Debug)]
pub struct User {
    pub id: ids::UserId,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl User {
    pub fn id(&self) -> &ids::UserId {
        &self.id
    }
}

impl User {
    pub async fn retrieve(conn: &impl GenericClient, id: &ids::UserId) -> Result<Option<User>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select users.id, \
                   users.username, \
                   users.email, \
                   users.avatar \
            from users \
            where users.id = $1",
            &[id]
        ).await? {
            Ok(Some(User {
                id: row.get(0),
                username: row.get(1),
                email: row.get(2),
                avatar: row.get(3),
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn retrieve_username(conn: &impl GenericClient, username: &str) -> Result<Option<User>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select users.id, \
                   users.username, \
                   users.email, \
                   users.avatar \
            from users \
            where users.username = $1",
            &[&username]
        ).await? {
            Ok(Some(User {
                id: row.get(0),
                username: row.get(1),
                email: row.get(2),
                avatar: row.get(3),
            }))
        } else {
            Ok(None)
        }
    }

    /// whether a user with the given username currently exists. this is
    /// the only check stream key verification performs beyond the
    /// signature
    pub async fn username_exists(conn: &impl GenericClient, username: &str) -> Result<bool, PgError> {
        let row = conn.query_one(
            "select exists(select 1 from users where users.username = $1)",
            &[&username]
        ).await?;

        Ok(row.get(0))
    }

    /// inserts the user row. a duplicate username violates the unique
    /// constraint and the error propagates to the caller untouched
    pub async fn create(
        conn: &impl GenericClient,
        username: &str,
        hash: &str,
        email: &str,
    ) -> Result<User, PgError> {
        let registered = Utc::now();

        let row = conn.query_one(
            "\
            insert into users (username, hash, email, registered) values \
            ($1, $2, $3, $4) \
            returning id",
            &[&username, &hash, &email, &registered]
        ).await?;

        Ok(User {
            id: row.get(0),
            username: username.to_owned(),
            email: email.to_owned(),
            avatar: None,
        })
    }

    pub async fn record_login(
        conn: &impl GenericClient,
        id: &ids::UserId,
        on: &DateTime<Utc>,
    ) -> Result<(), PgError> {
        let _ = conn.execute(
            "update users set last_login = $2 where id = $1",
            &[id, on]
        ).await?;

        Ok(())
    }
}
