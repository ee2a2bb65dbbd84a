use async_trait::async_trait;
use uuid::Uuid;
use crate::auth::Permission;
use crate::domain::*;
use crate::error::Result;

pub mod announcement_repository;
pub mod editor_repository;
pub mod image_repository;
pub mod link_repository;
pub mod page_repository;

pub use announcement_repository::SqliteAnnouncementRepository;
pub use editor_repository::SqliteEditorRepository;
pub use image_repository::SqliteImageRepository;
pub use link_repository::SqliteLinkRepository;
pub use page_repository::{SqliteElementRepository, SqlitePageRepository};

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    /// Upserts the record and its page links in one transaction. When the record
    /// is global, every other record loses its global flag in the same transaction.
    async fn save(&self, announcement: Announcement, page_ids: &[Uuid]) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    /// All records, global first, then in insertion order.
    async fn list(&self) -> Result<Vec<Announcement>>;
    /// Records linked to `page_id` or global; only global ones without a page.
    async fn find_active_for(&self, page_id: Option<Uuid>) -> Result<Vec<Announcement>>;
    async fn page_ids_for(&self, id: Uuid) -> Result<Vec<Uuid>>;
    async fn count_global(&self) -> Result<i64>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait LinkRepository: Send + Sync {
    async fn create(&self, request: CreateLinkRequest) -> Result<Link>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, filename: &str, title: Option<String>) -> Result<Image>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>>;
}

#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn create(&self, request: CreatePageRequest) -> Result<Page>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>>;
    async fn list(&self) -> Result<Vec<Page>>;
}

#[async_trait]
pub trait ElementRepository: Send + Sync {
    async fn create(&self, request: CreateElementRequest) -> Result<AnnouncementElement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnnouncementElement>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait EditorRepository: Send + Sync {
    async fn create(&self, name: &str, token_hash: &str, permissions: &[Permission]) -> Result<Editor>;
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<(Editor, Vec<Permission>)>>;
}
