use sks_api::Payload;
use sks_api::widget::{SettingsDoc, SavedSettings};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::net::error;
use crate::state::ArcShared;
use crate::sec::authn::initiator::Initiator;
use crate::widget;

#[derive(Deserialize)]
pub struct SettingsQuery {
    code: String
}

pub async fn save_settings(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<SettingsDoc>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let code = widget::save(&conn, initiator.user.id(), json).await?;

    Ok((
        StatusCode::CREATED,
        Payload::new(SavedSettings { code })
    ))
}

pub async fn get_settings(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Query(SettingsQuery { code }): Query<SettingsQuery>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let Some(found) = widget::WidgetSettings::retrieve_user_code(
        &conn,
        initiator.user.id(),
        &code
    ).await? else {
        return Err(error::Error::api(error::WidgetKind::SettingsNotFound));
    };

    Ok(Payload::new(found.settings))
}
