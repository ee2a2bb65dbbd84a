#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use special_announcements::{
    auth::{Authorizer, Permission},
    schema::SchemaProjector,
    service::ServiceContext,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

pub const DEFAULT_CATEGORY: &str = "https://www.wikidata.org/wiki/Q81068910";

/// A single connection keeps every query on the same in-memory database.
pub async fn setup_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

/// File-backed database so several connections can write at once.
/// Returns the file path so the caller can remove it.
pub async fn setup_file_pool(max_connections: u32) -> anyhow::Result<(SqlitePool, PathBuf)> {
    let path = std::env::temp_dir().join(format!("special-announcements-{}.db", uuid::Uuid::new_v4()));
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok((pool, path))
}

pub async fn setup_context() -> anyhow::Result<Arc<ServiceContext>> {
    let pool = setup_pool().await?;
    let projector = Arc::new(SchemaProjector::new(DEFAULT_CATEGORY, "https://example.gov"));
    Ok(Arc::new(ServiceContext::new(pool, projector)))
}

pub struct Grants(pub Vec<Permission>);

impl Grants {
    pub fn all() -> Self {
        Grants(Permission::ALL.to_vec())
    }
}

impl Authorizer for Grants {
    fn check(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }
}
