use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{self, Authorizer},
    domain::{
        normalize_timestamp, Announcement, AnnouncementOption, AnnouncementSummary,
        ResolvedAnnouncement, SaveAnnouncementRequest,
    },
    error::{AppError, Result},
    repository::{AnnouncementRepository, ImageRepository, LinkRepository, PageRepository},
};

pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
    link_repo: Arc<dyn LinkRepository>,
    image_repo: Arc<dyn ImageRepository>,
    page_repo: Arc<dyn PageRepository>,
    default_category_url: String,
}

impl AnnouncementService {
    pub fn new(
        repo: Arc<dyn AnnouncementRepository>,
        link_repo: Arc<dyn LinkRepository>,
        image_repo: Arc<dyn ImageRepository>,
        page_repo: Arc<dyn PageRepository>,
        default_category_url: String,
    ) -> Self {
        Self {
            repo,
            link_repo,
            image_repo,
            page_repo,
            default_category_url,
        }
    }

    /// Get an announcement by ID
    pub async fn get(&self, id: Uuid) -> Result<Announcement> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
    }

    /// Admin listing rows, global first
    pub async fn list_summaries(&self) -> Result<Vec<AnnouncementSummary>> {
        let announcements = self.repo.list().await?;
        Ok(announcements.iter().map(AnnouncementSummary::from).collect())
    }

    /// Data source for the element announcement picker, global first
    pub async fn dropdown_options(&self) -> Result<Vec<AnnouncementOption>> {
        let announcements = self.repo.list().await?;
        Ok(announcements
            .iter()
            .map(|a| AnnouncementOption {
                id: a.id,
                label: a.title_with_global_status(),
            })
            .collect())
    }

    /// Create (`id == None`) or fully replace an announcement.
    pub async fn save(
        &self,
        actor: &dyn Authorizer,
        id: Option<Uuid>,
        mut request: SaveAnnouncementRequest,
    ) -> Result<Announcement> {
        let allowed = if id.is_some() {
            auth::can_edit(actor)
        } else {
            auth::can_create(actor)
        };
        if !allowed {
            return Err(AppError::Forbidden);
        }

        let existing = match id {
            Some(id) => Some(self.get(id).await?),
            None => None,
        };

        request.title = request.title.trim().to_string();
        request.validate()?;

        let date_posted = normalize_timestamp("date_posted", request.date_posted.as_deref())?;
        let expires = normalize_timestamp("expires", request.expires.as_deref())?;

        if let Some(image_id) = request.image_id {
            if self.image_repo.find_by_id(image_id).await?.is_none() {
                return Err(AppError::validation("image_id", "Image does not exist"));
            }
        }

        for (slot, link_id) in &request.links {
            if self.link_repo.find_by_id(*link_id).await?.is_none() {
                return Err(AppError::validation(
                    format!("links.{}", slot.as_str()),
                    "Link does not exist",
                ));
            }
        }

        let mut page_ids = Vec::with_capacity(request.page_ids.len());
        for page_id in request.page_ids {
            if page_ids.contains(&page_id) {
                continue;
            }
            if self.page_repo.find_by_id(page_id).await?.is_none() {
                return Err(AppError::validation("page_ids", format!("Page {} does not exist", page_id)));
            }
            page_ids.push(page_id);
        }

        let now = Utc::now();
        let announcement = Announcement {
            id: existing.as_ref().map(|a| a.id).unwrap_or_else(Uuid::new_v4),
            title: request.title,
            is_global: request.is_global,
            category: request
                .category
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| self.default_category_url.clone()),
            short_description: request.short_description,
            content: request.content,
            date_posted,
            expires,
            image_id: request.image_id,
            links: request.links,
            created_at: existing.as_ref().map(|a| a.created_at).unwrap_or(now),
            updated_at: now,
        };

        let saved = self.repo.save(announcement, &page_ids).await?;
        tracing::info!(
            "Saved special announcement {} ({}{})",
            saved.id,
            saved.title,
            if saved.is_global { ", global" } else { "" }
        );

        Ok(saved)
    }

    pub async fn delete(&self, actor: &dyn Authorizer, id: Uuid) -> Result<()> {
        if !auth::can_delete(actor) {
            return Err(AppError::Forbidden);
        }

        let announcement = self.get(id).await?;
        self.repo.delete(id).await?;
        tracing::info!("Deleted special announcement {} ({})", id, announcement.title);

        Ok(())
    }

    /// Loads the image, slot links and pages of an announcement.
    pub async fn resolve(&self, announcement: Announcement) -> Result<ResolvedAnnouncement> {
        let image = match announcement.image_id {
            Some(image_id) => self.image_repo.find_by_id(image_id).await?,
            None => None,
        };

        let mut links = BTreeMap::new();
        for (slot, link_id) in &announcement.links {
            if let Some(link) = self.link_repo.find_by_id(*link_id).await? {
                links.insert(*slot, link);
            }
        }

        let page_ids = self.repo.page_ids_for(announcement.id).await?;

        Ok(ResolvedAnnouncement {
            announcement,
            image,
            links,
            page_ids,
        })
    }

    /// Announcements to show in a page context: those attached to the page plus
    /// the global one, global first. Without a page only the global one.
    pub async fn global_special_announcements(
        &self,
        page_id: Option<Uuid>,
    ) -> Result<Vec<ResolvedAnnouncement>> {
        let announcements = self.repo.find_active_for(page_id).await?;

        let mut resolved = Vec::with_capacity(announcements.len());
        for announcement in announcements {
            resolved.push(self.resolve(announcement).await?);
        }

        Ok(resolved)
    }
}
