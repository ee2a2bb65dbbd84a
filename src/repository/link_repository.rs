use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateLinkRequest, Link},
    error::{AppError, Result},
    repository::LinkRepository,
};

#[derive(FromRow)]
struct LinkRow {
    id: String,
    url: String,
    title: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqliteLinkRepository {
    pool: SqlitePool,
}

impl SqliteLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_link(row: LinkRow) -> Result<Link> {
        Ok(Link {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            url: row.url,
            title: row.title,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn create(&self, request: CreateLinkRequest) -> Result<Link> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query("INSERT INTO links (id, url, title, created_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(request.url.trim())
            .bind(&request.title)
            .bind(now)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created link".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>> {
        let row = sqlx::query_as::<_, LinkRow>(
            "SELECT id, url, title, created_at FROM links WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_link).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM links WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
