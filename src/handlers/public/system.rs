// handlers/public/system.rs - GET / and GET /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "NGO Scholarship API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Accounts, student profiles and assessments for the scholarship platform",
            "endpoints": {
                "auth": "/auth/register, /auth/login, /auth/logout (public)",
                "users": "/users, /users/me, /users/:user_id (protected)",
                "profile": "/students/:user_id/profile[/submit|/progress] (owner only)",
                "education": "/students/:user_id/education[/:education_id] (owner only)",
                "assessment": "/students/:user_id/assessment/* (owner only)",
                "health": "/health (public)"
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "environment": state.config.environment,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
