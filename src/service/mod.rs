pub mod announcement_service;
pub mod element_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;
use crate::schema::SchemaProjector;
use announcement_service::AnnouncementService;
use element_service::ElementService;

pub struct ServiceContext {
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub link_repo: Arc<dyn LinkRepository>,
    pub image_repo: Arc<dyn ImageRepository>,
    pub page_repo: Arc<dyn PageRepository>,
    pub editor_repo: Arc<dyn EditorRepository>,
    pub announcement_service: Arc<AnnouncementService>,
    pub element_service: Arc<ElementService>,
    pub projector: Arc<SchemaProjector>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, projector: Arc<SchemaProjector>) -> Self {
        let announcement_repo: Arc<dyn AnnouncementRepository> =
            Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
        let link_repo: Arc<dyn LinkRepository> = Arc::new(SqliteLinkRepository::new(db_pool.clone()));
        let image_repo: Arc<dyn ImageRepository> = Arc::new(SqliteImageRepository::new(db_pool.clone()));
        let page_repo: Arc<dyn PageRepository> = Arc::new(SqlitePageRepository::new(db_pool.clone()));
        let element_repo: Arc<dyn ElementRepository> =
            Arc::new(SqliteElementRepository::new(db_pool.clone()));
        let editor_repo: Arc<dyn EditorRepository> = Arc::new(SqliteEditorRepository::new(db_pool.clone()));

        let announcement_service = Arc::new(AnnouncementService::new(
            announcement_repo.clone(),
            link_repo.clone(),
            image_repo.clone(),
            page_repo.clone(),
            projector.default_category_url().to_string(),
        ));

        let element_service = Arc::new(ElementService::new(
            element_repo,
            page_repo.clone(),
            announcement_repo.clone(),
            announcement_service.clone(),
            projector.clone(),
        ));

        Self {
            announcement_repo,
            link_repo,
            image_repo,
            page_repo,
            editor_repo,
            announcement_service,
            element_service,
            projector,
            db_pool,
        }
    }
}
