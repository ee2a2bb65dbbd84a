use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    auth::Permission,
    domain::Editor,
    error::{AppError, Result},
    repository::EditorRepository,
};

#[derive(FromRow)]
struct EditorRow {
    id: String,
    name: String,
    created_at: NaiveDateTime,
}

pub struct SqliteEditorRepository {
    pool: SqlitePool,
}

impl SqliteEditorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EditorRepository for SqliteEditorRepository {
    async fn create(&self, name: &str, token_hash: &str, permissions: &[Permission]) -> Result<Editor> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO editors (id, name, token_hash, created_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(name)
            .bind(token_hash)
            .bind(now.naive_utc())
            .execute(&mut *tx)
            .await?;

        for permission in permissions {
            sqlx::query("INSERT OR IGNORE INTO editor_permissions (editor_id, permission) VALUES (?, ?)")
                .bind(id.to_string())
                .bind(permission.code())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Editor {
            id,
            name: name.to_string(),
            created_at: now,
        })
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<(Editor, Vec<Permission>)>> {
        let row = sqlx::query_as::<_, EditorRow>(
            "SELECT id, name, created_at FROM editors WHERE token_hash = ?"
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let codes = sqlx::query_scalar::<_, String>(
            "SELECT permission FROM editor_permissions WHERE editor_id = ?"
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let permissions = codes
            .iter()
            .filter_map(|code| {
                let permission = Permission::from_code(code);
                if permission.is_none() {
                    tracing::warn!("Ignoring unknown permission code {} for editor {}", code, row.id);
                }
                permission
            })
            .collect();

        let editor = Editor {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        };

        Ok(Some((editor, permissions)))
    }
}
