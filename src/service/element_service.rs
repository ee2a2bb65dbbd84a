use std::sync::Arc;

use uuid::Uuid;

use crate::{
    auth::{self, Authorizer},
    domain::{AnnouncementElement, CreateElementRequest},
    error::{AppError, Result},
    repository::{AnnouncementRepository, ElementRepository, PageRepository},
    schema::SchemaProjector,
    service::announcement_service::AnnouncementService,
};

pub struct ElementService {
    repo: Arc<dyn ElementRepository>,
    page_repo: Arc<dyn PageRepository>,
    announcement_repo: Arc<dyn AnnouncementRepository>,
    announcement_service: Arc<AnnouncementService>,
    projector: Arc<SchemaProjector>,
}

impl ElementService {
    pub fn new(
        repo: Arc<dyn ElementRepository>,
        page_repo: Arc<dyn PageRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        announcement_service: Arc<AnnouncementService>,
        projector: Arc<SchemaProjector>,
    ) -> Self {
        Self {
            repo,
            page_repo,
            announcement_repo,
            announcement_service,
            projector,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<AnnouncementElement> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Element not found".to_string()))
    }

    /// Placing an element edits the page, so it needs the edit permission.
    pub async fn create(
        &self,
        actor: &dyn Authorizer,
        request: CreateElementRequest,
    ) -> Result<AnnouncementElement> {
        if !auth::can_edit(actor) {
            return Err(AppError::Forbidden);
        }

        if self.page_repo.find_by_id(request.page_id).await?.is_none() {
            return Err(AppError::validation("page_id", "Page does not exist"));
        }

        if let Some(announcement_id) = request.announcement_id {
            if self.announcement_repo.find_by_id(announcement_id).await?.is_none() {
                return Err(AppError::validation("announcement_id", "Announcement does not exist"));
            }
        }

        self.repo.create(request).await
    }

    pub async fn delete(&self, actor: &dyn Authorizer, id: Uuid) -> Result<()> {
        if !auth::can_edit(actor) {
            return Err(AppError::Forbidden);
        }

        self.get(id).await?;
        self.repo.delete(id).await
    }

    /// Empty when the element has no announcement or it has since been deleted.
    pub async fn render(&self, id: Uuid) -> Result<String> {
        let element = self.get(id).await?;

        let Some(announcement_id) = element.announcement_id else {
            return Ok(String::new());
        };

        match self.announcement_repo.find_by_id(announcement_id).await? {
            Some(announcement) => {
                let resolved = self.announcement_service.resolve(announcement).await?;
                self.projector.render(&resolved)
            }
            None => Ok(String::new()),
        }
    }
}
