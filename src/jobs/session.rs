use crate::state;
use crate::error;

/// drops session rows that are past their expiry. clients holding one of
/// these cookies already fail the expiry check on lookup, this just keeps
/// the table from growing without bound
pub async fn cleanup(state: state::ArcShared) -> error::Result<()> {
    let today = chrono::Utc::now();
    let conn = state.pool().get().await?;

    let count = conn.execute(
        "delete from auth_sessions where expires <= $1",
        &[&today]
    ).await?;

    tracing::info!("dropped {count} sessions");

    Ok(())
}
