use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Image, Link, LinkSlot};
use crate::error::{AppError, Result};

/// Canonical text form for `date_posted` and `expires` in the store.
pub const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub is_global: bool,
    pub category: String,
    pub short_description: String,
    pub content: String,
    pub date_posted: Option<String>,
    pub expires: Option<String>,
    pub image_id: Option<Uuid>,
    pub links: BTreeMap<LinkSlot, Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    /// Label used by the element picker, e.g. `Stay home (global)`.
    pub fn title_with_global_status(&self) -> String {
        if self.is_global {
            format!("{} (global)", self.title)
        } else {
            self.title.clone()
        }
    }

    pub fn category_url<'a>(&'a self, default_category_url: &'a str) -> &'a str {
        if self.category.trim().is_empty() {
            default_category_url
        } else {
            &self.category
        }
    }
}

/// An announcement with its image, slot links and pages loaded.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedAnnouncement {
    pub announcement: Announcement,
    pub image: Option<Image>,
    pub links: BTreeMap<LinkSlot, Link>,
    pub page_ids: Vec<Uuid>,
}

impl ResolvedAnnouncement {
    /// Wraps a bare record with nothing resolved.
    pub fn bare(announcement: Announcement) -> Self {
        Self {
            announcement,
            image: None,
            links: BTreeMap::new(),
            page_ids: Vec::new(),
        }
    }
}

/// Full-replacement payload for creating or updating an announcement.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SaveAnnouncementRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required (255 characters max)"))]
    pub title: String,
    #[serde(default)]
    pub is_global: bool,
    /// `None` means "use the configured default category".
    #[validate(length(max = 255, message = "Category must be at most 255 characters"))]
    pub category: Option<String>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub content: String,
    pub date_posted: Option<String>,
    pub expires: Option<String>,
    pub image_id: Option<Uuid>,
    #[serde(default)]
    pub links: BTreeMap<LinkSlot, Uuid>,
    #[serde(default)]
    pub page_ids: Vec<Uuid>,
}

/// Row shape for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementSummary {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub global: &'static str,
    pub description: String,
    pub date_posted: Option<String>,
    pub expires: Option<String>,
}

impl From<&Announcement> for AnnouncementSummary {
    fn from(announcement: &Announcement) -> Self {
        Self {
            id: announcement.id,
            title: announcement.title.clone(),
            category: announcement.category.clone(),
            global: if announcement.is_global { "Yes" } else { "No" },
            description: announcement.short_description.clone(),
            date_posted: announcement.date_posted.as_deref().and_then(nice_timestamp),
            expires: announcement.expires.as_deref().and_then(nice_timestamp),
        }
    }
}

/// Dropdown entry for the element announcement picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnouncementOption {
    pub id: Uuid,
    pub label: String,
}

/// Parses editor or stored input into a UTC timestamp.
///
/// Accepts RFC 3339 (offsets are converted to UTC), `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM` and a bare `YYYY-MM-DD`.
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Normalizes editor input into the stored form. Blank input means "unset".
pub fn normalize_timestamp(field: &'static str, input: Option<&str>) -> Result<Option<String>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(|dt| Some(dt.format(STORED_TIMESTAMP_FORMAT).to_string()))
            .ok_or_else(|| AppError::Validation {
                field: field.to_string(),
                message: format!("'{}' is not a valid date and time", value),
            }),
    }
}

fn nice_timestamp(stored: &str) -> Option<String> {
    parse_timestamp(stored).map(|dt| dt.format("%-d/%m/%Y %-I:%M%P").to_string())
}
