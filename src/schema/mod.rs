//! schema.org `SpecialAnnouncement` projection.
//!
//! See <https://schema.org/SpecialAnnouncement> and
//! <https://developers.google.com/search/docs/data-types/special-announcements>.

pub mod render;

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    config::Settings,
    domain::{parse_timestamp, ResolvedAnnouncement},
    error::{AppError, Result},
};

pub const SCHEMA_CONTEXT: &str = "http://schema.org";
pub const SCHEMA_TYPE: &str = "SpecialAnnouncement";

/// ISO-8601 with a numeric offset, e.g. `2021-03-01T00:00:00+0000`.
const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Comments, and tags opened by `<` plus a letter, `/`, `!` or `?`. An
/// unterminated tag runs to the end of the input.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?(?:-->|\z)|<[A-Za-z/!?][^>]*(?:>|\z)").expect("tag pattern is valid")
});

/// Called with the assembled JSON-LD object before it is returned.
pub trait SchemaExtension: Send + Sync {
    fn update_schema(&self, resolved: &ResolvedAnnouncement, schema: &mut Map<String, Value>);
}

/// Merges a fixed set of properties into every payload.
pub struct StaticPropertiesExtension {
    properties: BTreeMap<String, Value>,
}

impl StaticPropertiesExtension {
    pub fn new(properties: BTreeMap<String, Value>) -> Self {
        Self { properties }
    }
}

impl SchemaExtension for StaticPropertiesExtension {
    fn update_schema(&self, _resolved: &ResolvedAnnouncement, schema: &mut Map<String, Value>) {
        for (key, value) in &self.properties {
            schema.insert(key.clone(), value.clone());
        }
    }
}

pub struct SchemaProjector {
    default_category_url: String,
    base_url: String,
    extensions: Vec<Arc<dyn SchemaExtension>>,
}

impl SchemaProjector {
    pub fn new(default_category_url: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            default_category_url: default_category_url.into(),
            base_url: base_url.into(),
            extensions: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut projector = Self::new(
            settings.schema.default_category_url.clone(),
            settings.server.base_url.clone(),
        );
        if !settings.schema.extra_properties.is_empty() {
            projector.register(Arc::new(StaticPropertiesExtension::new(
                settings.schema.extra_properties.clone(),
            )));
        }
        projector
    }

    /// Extensions run in registration order.
    pub fn register(&mut self, extension: Arc<dyn SchemaExtension>) {
        self.extensions.push(extension);
    }

    pub fn with_extension(mut self, extension: Arc<dyn SchemaExtension>) -> Self {
        self.register(extension);
        self
    }

    pub fn default_category_url(&self) -> &str {
        &self.default_category_url
    }

    pub fn image_url(&self, resolved: &ResolvedAnnouncement) -> Option<String> {
        resolved
            .image
            .as_ref()
            .and_then(|image| image.absolute_url(&self.base_url))
    }

    pub fn to_schema_json(&self, resolved: &ResolvedAnnouncement) -> Map<String, Value> {
        let announcement = &resolved.announcement;
        let mut schema = Map::new();

        schema.insert("@context".into(), SCHEMA_CONTEXT.into());
        schema.insert("@type".into(), SCHEMA_TYPE.into());
        schema.insert(
            "category".into(),
            announcement.category_url(&self.default_category_url).into(),
        );
        schema.insert("name".into(), announcement.title.clone().into());
        schema.insert("text".into(), strip_tags(&announcement.short_description).into());

        if let Some(url) = self.image_url(resolved) {
            schema.insert("image".into(), url.into());
        }

        if let Some(value) = iso8601(announcement.date_posted.as_deref(), "date_posted", resolved) {
            schema.insert("datePosted".into(), value.into());
        }
        if let Some(value) = iso8601(announcement.expires.as_deref(), "expires", resolved) {
            schema.insert("expires".into(), value.into());
        }

        for (slot, link) in &resolved.links {
            let url = link.url.trim();
            if !url.is_empty() {
                schema.insert(slot.schema_key().into(), url.into());
            }
        }

        for extension in &self.extensions {
            extension.update_schema(resolved, &mut schema);
        }

        schema
    }

    /// Pretty-printed JSON-LD.
    pub fn to_schema_string(&self, resolved: &ResolvedAnnouncement) -> Result<String> {
        serde_json::to_string_pretty(&self.to_schema_json(resolved))
            .map_err(|e| AppError::Internal(format!("Failed to serialize schema: {}", e)))
    }
}

/// Removes markup tags and comments, leaving the text between them.
pub fn strip_tags(input: &str) -> String {
    TAG_PATTERN.replace_all(input, "").into_owned()
}

fn iso8601(stored: Option<&str>, field: &str, resolved: &ResolvedAnnouncement) -> Option<String> {
    let stored = stored.filter(|s| !s.trim().is_empty())?;
    match parse_timestamp(stored) {
        Some(dt) => Some(
            DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc)
                .format(ISO8601_FORMAT)
                .to_string(),
        ),
        None => {
            tracing::warn!(
                "Announcement {} has an unparseable {} value {:?}; omitting it from structured data",
                resolved.announcement.id,
                field,
                stored
            );
            None
        }
    }
}
