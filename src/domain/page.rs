use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: Uuid,
    pub title: String,
    pub url_segment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePageRequest {
    #[validate(length(min = 1, max = 255, message = "Page title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "URL segment is required"))]
    pub url_segment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: Uuid,
    pub filename: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Image {
    pub fn exists(&self) -> bool {
        !self.filename.trim().is_empty()
    }

    pub fn absolute_url(&self, base_url: &str) -> Option<String> {
        if !self.exists() {
            return None;
        }
        Some(format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.filename.trim_start_matches('/')
        ))
    }
}

/// A page block that shows one chosen announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementElement {
    pub id: Uuid,
    pub page_id: Uuid,
    pub announcement_id: Option<Uuid>,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl AnnouncementElement {
    pub const TYPE_LABEL: &'static str = "Special announcement";

    pub fn summary(&self) -> &'static str {
        Self::TYPE_LABEL
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateElementRequest {
    pub page_id: Uuid,
    pub announcement_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
}
