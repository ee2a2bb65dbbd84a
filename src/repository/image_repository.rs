use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::Image,
    error::{AppError, Result},
    repository::ImageRepository,
};

#[derive(FromRow)]
struct ImageRow {
    id: String,
    filename: String,
    title: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqliteImageRepository {
    pool: SqlitePool,
}

impl SqliteImageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for SqliteImageRepository {
    async fn create(&self, filename: &str, title: Option<String>) -> Result<Image> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query("INSERT INTO images (id, filename, title, created_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(filename)
            .bind(&title)
            .bind(now)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created image".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>> {
        let row = sqlx::query_as::<_, ImageRow>(
            "SELECT id, filename, title, created_at FROM images WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(Image {
                id: Uuid::parse_str(&r.id).map_err(|e| AppError::Database(e.to_string()))?,
                filename: r.filename,
                title: r.title,
                created_at: DateTime::from_naive_utc_and_offset(r.created_at, Utc),
            })),
            None => Ok(None),
        }
    }
}
