use axum::{extract::State, http::StatusCode, Json, response::IntoResponse};
use serde::Serialize;
use serde_json::json;

use crate::{api::state::AppState, error::Result};

#[derive(Serialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub status: String,
}

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Special Announcements API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "schema.org SpecialAnnouncement records and structured data",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "api": "/api",
            "public": "/public/announcements"
        }
    }))
}

pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let global_count = state.service_context.announcement_repo.count_global().await?;

    Ok((StatusCode::OK, Json(json!({
        "status": "healthy",
        "global_announcements": global_count,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))))
}

pub async fn api_info() -> impl IntoResponse {
    Json(ApiInfo {
        name: "Special Announcements API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "schema.org SpecialAnnouncement records and structured data".to_string(),
        status: "operational".to_string(),
    })
}
