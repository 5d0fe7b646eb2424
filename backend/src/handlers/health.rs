//! Service health probe

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Overall status for the probe payload.
fn overall_status(database_ok: bool) -> &'static str {
    if database_ok {
        "healthy"
    } else {
        "degraded"
    }
}

/// Liveness and database connectivity probe. Reports the environment the
/// server booted with so operators can tell which configuration is live.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    Json(json!({
        "status": overall_status(database_ok),
        "service": "pos-inventory-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": &state.config.environment,
        "database": if database_ok { "connected" } else { "unreachable" },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tracks_database_reachability() {
        assert_eq!(overall_status(true), "healthy");
        assert_eq!(overall_status(false), "degraded");
    }
}
