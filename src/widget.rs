use sks_api::ids;
use sks_api::widget::SettingsDoc;

use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio_postgres::Error as PgError;
use deadpool_postgres::GenericClient;

use crate::sql;

pub const CODE_LEN: usize = 20;

pub fn gen_code() -> String {
    rand::thread_rng()
        .sample_iter(Alphanumeric)
        .take(CODE_LEN)
        .map(char::from)
        .collect()
}

/// the widget display settings stored for a user, addressed externally by
/// the lookup code
#[derive(Debug)]
pub struct WidgetSettings {
    pub id: ids::WidgetSettingsId,
    pub user_id: ids::UserId,
    pub settings: SettingsDoc,
    pub code: String,
}

impl WidgetSettings {
    pub async fn retrieve_user(
        conn: &impl GenericClient,
        user_id: &ids::UserId,
    ) -> Result<Option<WidgetSettings>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select widget_settings.id, \
                   widget_settings.user_id, \
                   widget_settings.settings, \
                   widget_settings.code \
            from widget_settings \
            where widget_settings.user_id = $1",
            &[user_id]
        ).await? {
            Ok(Some(WidgetSettings {
                id: row.get(0),
                user_id: row.get(1),
                settings: sql::de_from_sql(row.get(2)),
                code: row.get(3),
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn retrieve_user_code(
        conn: &impl GenericClient,
        user_id: &ids::UserId,
        code: &str,
    ) -> Result<Option<WidgetSettings>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select widget_settings.id, \
                   widget_settings.user_id, \
                   widget_settings.settings, \
                   widget_settings.code \
            from widget_settings \
            where widget_settings.user_id = $1 and \
                  widget_settings.code = $2",
            &[user_id, &code]
        ).await? {
            Ok(Some(WidgetSettings {
                id: row.get(0),
                user_id: row.get(1),
                settings: sql::de_from_sql(row.get(2)),
                code: row.get(3),
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn create(
        conn: &impl GenericClient,
        user_id: &ids::UserId,
        settings: SettingsDoc,
    ) -> Result<WidgetSettings, PgError> {
        let code = gen_code();

        let row = conn.query_one(
            "\
            insert into widget_settings (user_id, settings, code) values \
            ($1, $2, $3) \
            returning id",
            &[user_id, &sql::ser_to_sql(&settings), &code]
        ).await?;

        Ok(WidgetSettings {
            id: row.get(0),
            user_id: user_id.clone(),
            settings,
            code,
        })
    }
}

/// settings are create-once. the first save stores the document and issues
/// a code; every later save returns that code and leaves the stored
/// document untouched
pub async fn save(
    conn: &impl GenericClient,
    user_id: &ids::UserId,
    settings: SettingsDoc,
) -> Result<String, PgError> {
    if let Some(found) = WidgetSettings::retrieve_user(conn, user_id).await? {
        return Ok(found.code);
    }

    let created = WidgetSettings::create(conn, user_id, settings).await?;

    Ok(created.code)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gen_code_is_fixed_length_alphanumeric() {
        let code = gen_code();

        assert_eq!(code.chars().count(), CODE_LEN);
        assert!(code.chars().all(|ch| ch.is_ascii_alphanumeric()), "code is not alphanumeric: {code}");
    }

    #[test]
    fn gen_code_does_not_repeat() {
        assert_ne!(gen_code(), gen_code());
    }
}
