use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{AnnouncementElement, CreateElementRequest, CreatePageRequest, Page},
    error::{AppError, Result},
    repository::{ElementRepository, PageRepository},
};

#[derive(FromRow)]
struct PageRow {
    id: String,
    title: String,
    url_segment: String,
    created_at: NaiveDateTime,
}

#[derive(FromRow)]
struct ElementRow {
    id: String,
    page_id: String,
    announcement_id: Option<String>,
    title: String,
    created_at: NaiveDateTime,
}

fn parse_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::Database(e.to_string()))
}

pub struct SqlitePageRepository {
    pool: SqlitePool,
}

impl SqlitePageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_page(row: PageRow) -> Result<Page> {
        Ok(Page {
            id: parse_id(&row.id)?,
            title: row.title,
            url_segment: row.url_segment,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl PageRepository for SqlitePageRepository {
    async fn create(&self, request: CreatePageRequest) -> Result<Page> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query("INSERT INTO pages (id, title, url_segment, created_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(&request.title)
            .bind(&request.url_segment)
            .bind(now)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created page".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>> {
        let row = sqlx::query_as::<_, PageRow>(
            "SELECT id, title, url_segment, created_at FROM pages WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_page).transpose()
    }

    async fn list(&self) -> Result<Vec<Page>> {
        let rows = sqlx::query_as::<_, PageRow>(
            "SELECT id, title, url_segment, created_at FROM pages ORDER BY title ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_page)
            .collect()
    }
}

pub struct SqliteElementRepository {
    pool: SqlitePool,
}

impl SqliteElementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ElementRepository for SqliteElementRepository {
    async fn create(&self, request: CreateElementRequest) -> Result<AnnouncementElement> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO special_announcement_elements (id, page_id, announcement_id, title, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(request.page_id.to_string())
        .bind(request.announcement_id.map(|a| a.to_string()))
        .bind(&request.title)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created element".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnnouncementElement>> {
        let row = sqlx::query_as::<_, ElementRow>(
            r#"
            SELECT id, page_id, announcement_id, title, created_at
            FROM special_announcement_elements
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(AnnouncementElement {
                id: parse_id(&r.id)?,
                page_id: parse_id(&r.page_id)?,
                announcement_id: r.announcement_id.as_deref().map(parse_id).transpose()?,
                title: r.title,
                created_at: DateTime::from_naive_utc_and_offset(r.created_at, Utc),
            })),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM special_announcement_elements WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
