use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Editor {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
