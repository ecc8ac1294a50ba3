use sks_api::{Payload, Validator, Detail};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::http::header::ACCESS_CONTROL_EXPOSE_HEADERS;
use axum::response::IntoResponse;
use chrono::Utc;

use crate::net::error;
use crate::net::cookie::{SameSite, SetCookie};
use crate::state::ArcShared;
use crate::sec::authn::{self, VerifyCredentials, password};
use crate::sec::authn::session::{Session, create_session_cookie, expire_session_cookie};
use crate::sec::authn::initiator::{lookup_header_map, Mechanism};
use crate::user;

/// the stream key travels in its own cookie. not HttpOnly, the embedding
/// page reads it
fn stream_key_cookie(key: String) -> SetCookie {
    SetCookie::new("stream_key", key)
        .with_path("/")
        .with_same_site(SameSite::Lax)
}

pub async fn registration(
    State(state): State<ArcShared>,
    axum::Json(json): axum::Json<sks_api::users::Registration>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    if json.password != json.re_password {
        return Err(error::Error::api((
            error::AuthKind::PasswordMismatch,
            Detail::with_key("re_password")
        )));
    }

    let mut conn = state.pool().get().await?;
    let transaction = conn.transaction().await?;

    let salt = password::gen_salt()?;
    let hash = password::gen_hash(&json.password, &salt)?;

    // no username pre-check. a duplicate violates the unique constraint
    // and surfaces as a server error
    let user = user::User::create(&transaction, &json.username, &hash, &json.email).await?;

    let session = Session::create(&transaction, user.id).await?;

    user::User::record_login(&transaction, &user.id, &Utc::now()).await?;

    let stream_key = state.sec().stream_keys().generate(&user)?;

    transaction.commit().await?;

    Ok((
        create_session_cookie(state.sec().session_info(), &session),
        stream_key_cookie(stream_key),
        Payload::new(sks_api::users::User {
            username: user.username,
            email: user.email,
        })
    ))
}

pub async fn login(
    State(state): State<ArcShared>,
    axum::Json(json): axum::Json<sks_api::users::Login>,
) -> error::Result<impl IntoResponse> {
    let mut conn = state.pool().get().await?;
    let transaction = conn.transaction().await?;

    let backend = authn::PasswordBackend;

    let Some(user) = backend.verify(&transaction, &json.username, &json.password).await? else {
        return Err(error::Error::api(error::AuthKind::UserNotFound));
    };

    let session = Session::create(&transaction, user.id).await?;

    user::User::record_login(&transaction, &user.id, &Utc::now()).await?;

    let stream_key = state.sec().stream_keys().generate(&user)?;

    transaction.commit().await?;

    Ok((
        [(ACCESS_CONTROL_EXPOSE_HEADERS, "Set-Cookie")],
        create_session_cookie(state.sec().session_info(), &session),
        stream_key_cookie(stream_key),
        Payload::new(sks_api::users::User {
            username: user.username,
            email: user.email,
        })
    ))
}

pub async fn logout(
    State(state): State<ArcShared>,
    headers: HeaderMap,
) -> error::Result<impl IntoResponse> {
    let mut conn = state.pool().get().await?;

    let initiator = lookup_header_map(state.auth(), &conn, &headers).await?;
    let transaction = conn.transaction().await?;

    match initiator.mechanism {
        Mechanism::Session(session) => {
            session.delete(&transaction).await?;

            transaction.commit().await?;

            Ok((
                StatusCode::OK,
                expire_session_cookie(state.sec().session_info())
            ))
        }
    }
}

/// verifies a previously issued stream key. decode failures are server
/// errors, a key that names a vanished user is a plain 401
pub async fn auth(
    State(state): State<ArcShared>,
    axum::Json(json): axum::Json<sks_api::auth::VerifyStreamKey>,
) -> error::Result<impl IntoResponse> {
    let claims = state.sec().stream_keys().decode(&json.key)?;

    let conn = state.pool().get().await?;

    if user::User::username_exists(&conn, &claims.username).await? {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::UNAUTHORIZED)
    }
}

pub async fn me(
    initiator: authn::initiator::Initiator,
) -> error::Result<impl IntoResponse> {
    let user = initiator.user;

    Ok(Payload::new(sks_api::users::User {
        username: user.username,
        email: user.email,
    }))
}
