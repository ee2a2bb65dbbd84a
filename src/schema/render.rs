use askama::Template;

use super::{strip_tags, SchemaProjector};
use crate::{
    domain::{LinkSlot, ResolvedAnnouncement, STORED_TIMESTAMP_FORMAT},
    error::Result,
};

/// A resolved link as exposed to the template.
pub struct RenderedLink {
    pub slot: LinkSlot,
    pub label: String,
    pub url: String,
}

#[derive(Template)]
#[template(path = "special_announcement.html")]
pub struct SpecialAnnouncementTemplate<'a> {
    pub id: String,
    pub title: &'a str,
    pub is_global: bool,
    pub category: &'a str,
    pub category_url: &'a str,
    pub short_description: &'a str,
    pub description_text: String,
    pub content: &'a str,
    pub date_posted: Option<&'a str>,
    pub expires: Option<&'a str>,
    pub image_id: Option<String>,
    pub image_url: Option<String>,
    pub links: Vec<RenderedLink>,
    pub page_ids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub schema_json: String,
}

#[derive(Template)]
#[template(path = "special_announcements.html")]
pub struct SpecialAnnouncementListTemplate {
    pub items: Vec<String>,
}

/// Makes a JSON document safe to place inside a `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

impl SchemaProjector {
    pub fn template_context<'a>(
        &'a self,
        resolved: &'a ResolvedAnnouncement,
    ) -> Result<SpecialAnnouncementTemplate<'a>> {
        let announcement = &resolved.announcement;

        let links = resolved
            .links
            .iter()
            .filter(|(_, link)| !link.url.trim().is_empty())
            .map(|(slot, link)| RenderedLink {
                slot: *slot,
                label: link
                    .title
                    .clone()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| slot.label().to_string()),
                url: link.url.trim().to_string(),
            })
            .collect();

        Ok(SpecialAnnouncementTemplate {
            id: announcement.id.to_string(),
            title: &announcement.title,
            is_global: announcement.is_global,
            category: &announcement.category,
            category_url: announcement.category_url(self.default_category_url()),
            short_description: &announcement.short_description,
            description_text: strip_tags(&announcement.short_description),
            content: &announcement.content,
            date_posted: announcement.date_posted.as_deref(),
            expires: announcement.expires.as_deref(),
            image_id: announcement.image_id.map(|id| id.to_string()),
            image_url: self.image_url(resolved),
            links,
            page_ids: resolved.page_ids.iter().map(|id| id.to_string()).collect(),
            created_at: announcement.created_at.format(STORED_TIMESTAMP_FORMAT).to_string(),
            updated_at: announcement.updated_at.format(STORED_TIMESTAMP_FORMAT).to_string(),
            schema_json: escape_script(&self.to_schema_string(resolved)?),
        })
    }

    /// HTML block for one announcement, including its JSON-LD script.
    pub fn render(&self, resolved: &ResolvedAnnouncement) -> Result<String> {
        Ok(self.template_context(resolved)?.render()?)
    }

    pub fn render_list(&self, announcements: &[ResolvedAnnouncement]) -> Result<String> {
        let items = announcements
            .iter()
            .map(|resolved| self.render(resolved))
            .collect::<Result<Vec<_>>>()?;

        Ok(SpecialAnnouncementListTemplate { items }.render()?)
    }
}
