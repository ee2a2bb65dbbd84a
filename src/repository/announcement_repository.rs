use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Announcement, LinkSlot},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

const COLUMNS: &str = r#"
    id, title, is_global, category, short_description, content,
    date_posted, expires, image_id,
    link_id, news_updates_and_guidelines_id, disease_prevention_info_id,
    disease_spread_statistics_id, getting_tested_info_id, government_benefits_info_id,
    public_transport_closures_info_id, quarantine_guidelines_id,
    school_closures_info_id, travel_bans_id,
    created_at, updated_at
"#;

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    is_global: i32,
    category: String,
    short_description: String,
    content: String,
    date_posted: Option<String>,
    expires: Option<String>,
    image_id: Option<String>,
    link_id: Option<String>,
    news_updates_and_guidelines_id: Option<String>,
    disease_prevention_info_id: Option<String>,
    disease_spread_statistics_id: Option<String>,
    getting_tested_info_id: Option<String>,
    government_benefits_info_id: Option<String>,
    public_transport_closures_info_id: Option<String>,
    quarantine_guidelines_id: Option<String>,
    school_closures_info_id: Option<String>,
    travel_bans_id: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl AnnouncementRow {
    /// Slot link ids in `LinkSlot::ALL` order.
    fn slot_ids(&self) -> [Option<&String>; 10] {
        [
            self.link_id.as_ref(),
            self.news_updates_and_guidelines_id.as_ref(),
            self.disease_prevention_info_id.as_ref(),
            self.disease_spread_statistics_id.as_ref(),
            self.getting_tested_info_id.as_ref(),
            self.government_benefits_info_id.as_ref(),
            self.public_transport_closures_info_id.as_ref(),
            self.quarantine_guidelines_id.as_ref(),
            self.school_closures_info_id.as_ref(),
            self.travel_bans_id.as_ref(),
        ]
    }
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_id(value: &str) -> Result<Uuid> {
        Uuid::parse_str(value).map_err(|e| AppError::Database(e.to_string()))
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        let mut links = BTreeMap::new();
        for (slot, link_id) in LinkSlot::ALL.into_iter().zip(row.slot_ids()) {
            if let Some(link_id) = link_id {
                links.insert(slot, Self::parse_id(link_id)?);
            }
        }

        Ok(Announcement {
            id: Self::parse_id(&row.id)?,
            title: row.title,
            is_global: row.is_global != 0,
            category: row.category,
            short_description: row.short_description,
            content: row.content,
            date_posted: row.date_posted,
            expires: row.expires,
            image_id: row.image_id.as_deref().map(Self::parse_id).transpose()?,
            links,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    async fn upsert(conn: &mut SqliteConnection, announcement: &Announcement) -> Result<()> {
        let sql = format!(
            r#"
            INSERT INTO special_announcements ({COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                is_global = excluded.is_global,
                category = excluded.category,
                short_description = excluded.short_description,
                content = excluded.content,
                date_posted = excluded.date_posted,
                expires = excluded.expires,
                image_id = excluded.image_id,
                link_id = excluded.link_id,
                news_updates_and_guidelines_id = excluded.news_updates_and_guidelines_id,
                disease_prevention_info_id = excluded.disease_prevention_info_id,
                disease_spread_statistics_id = excluded.disease_spread_statistics_id,
                getting_tested_info_id = excluded.getting_tested_info_id,
                government_benefits_info_id = excluded.government_benefits_info_id,
                public_transport_closures_info_id = excluded.public_transport_closures_info_id,
                quarantine_guidelines_id = excluded.quarantine_guidelines_id,
                school_closures_info_id = excluded.school_closures_info_id,
                travel_bans_id = excluded.travel_bans_id,
                updated_at = excluded.updated_at
            "#
        );

        let is_global_int = if announcement.is_global { 1i32 } else { 0i32 };

        let mut query = sqlx::query(&sql)
            .bind(announcement.id.to_string())
            .bind(&announcement.title)
            .bind(is_global_int)
            .bind(&announcement.category)
            .bind(&announcement.short_description)
            .bind(&announcement.content)
            .bind(&announcement.date_posted)
            .bind(&announcement.expires)
            .bind(announcement.image_id.map(|id| id.to_string()));

        for slot in LinkSlot::ALL {
            query = query.bind(announcement.links.get(&slot).map(|id| id.to_string()));
        }

        query
            .bind(announcement.created_at.naive_utc())
            .bind(announcement.updated_at.naive_utc())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    async fn replace_pages(conn: &mut SqliteConnection, id: Uuid, page_ids: &[Uuid]) -> Result<()> {
        let id_str = id.to_string();

        sqlx::query("DELETE FROM special_announcement_pages WHERE announcement_id = ?")
            .bind(&id_str)
            .execute(&mut *conn)
            .await?;

        for page_id in page_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO special_announcement_pages (announcement_id, page_id) VALUES (?, ?)"
            )
            .bind(&id_str)
            .bind(page_id.to_string())
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Single bulk statement that drops the global flag from every other row.
    async fn clear_other_globals(conn: &mut SqliteConnection, id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE special_announcements SET is_global = 0 WHERE id <> ? AND is_global <> 0"
        )
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn save(&self, announcement: Announcement, page_ids: &[Uuid]) -> Result<Announcement> {
        let mut tx = self.pool.begin().await?;

        Self::upsert(&mut tx, &announcement).await?;
        Self::replace_pages(&mut tx, announcement.id, page_ids).await?;

        if announcement.is_global {
            let cleared = Self::clear_other_globals(&mut tx, announcement.id).await?;
            if cleared > 0 {
                tracing::info!(
                    "Announcement {} is now global; cleared the flag on {} other(s)",
                    announcement.id,
                    cleared
                );
            }
        }

        tx.commit().await?;

        self.find_by_id(announcement.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve saved announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let sql = format!("SELECT {COLUMNS} FROM special_announcements WHERE id = ?");
        let row = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_announcement).transpose()
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM special_announcements ORDER BY is_global DESC, rowid ASC"
        );
        let rows = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(Self::row_to_announcement)
            .collect()
    }

    async fn find_active_for(&self, page_id: Option<Uuid>) -> Result<Vec<Announcement>> {
        let rows = match page_id {
            Some(page_id) => {
                let sql = format!(
                    r#"
                    SELECT {COLUMNS}
                    FROM special_announcements a
                    WHERE a.is_global = 1
                       OR EXISTS (
                           SELECT 1 FROM special_announcement_pages p
                           WHERE p.announcement_id = a.id AND p.page_id = ?
                       )
                    ORDER BY a.is_global DESC, a.rowid ASC
                    "#
                );
                sqlx::query_as::<_, AnnouncementRow>(&sql)
                    .bind(page_id.to_string())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM special_announcements WHERE is_global = 1 ORDER BY rowid ASC"
                );
                sqlx::query_as::<_, AnnouncementRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter()
            .map(Self::row_to_announcement)
            .collect()
    }

    async fn page_ids_for(&self, id: Uuid) -> Result<Vec<Uuid>> {
        let page_ids = sqlx::query_scalar::<_, String>(
            "SELECT page_id FROM special_announcement_pages WHERE announcement_id = ? ORDER BY rowid ASC"
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        page_ids.iter().map(|p| Self::parse_id(p)).collect()
    }

    async fn count_global(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM special_announcements WHERE is_global = 1"
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM special_announcement_pages WHERE announcement_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM special_announcements WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
