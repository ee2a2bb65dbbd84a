mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use common::{setup_context, setup_file_pool, setup_pool, Grants, DEFAULT_CATEGORY};
use special_announcements::{
    auth::Permission,
    domain::{Announcement, CreateLinkRequest, CreatePageRequest, LinkSlot, SaveAnnouncementRequest},
    error::AppError,
    repository::{AnnouncementRepository, SqliteAnnouncementRepository},
};
use uuid::Uuid;

fn request(title: &str, is_global: bool) -> SaveAnnouncementRequest {
    SaveAnnouncementRequest {
        title: title.to_string(),
        is_global,
        ..Default::default()
    }
}

fn record(title: &str, is_global: bool) -> Announcement {
    Announcement {
        id: Uuid::new_v4(),
        title: title.to_string(),
        is_global,
        category: String::new(),
        short_description: String::new(),
        content: String::new(),
        date_posted: None,
        expires: None,
        image_id: None,
        links: BTreeMap::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_at_most_one_global_after_every_save() -> anyhow::Result<()> {
    let pool = setup_pool().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let mut saved = Vec::new();
    for (i, is_global) in [true, false, true, true, false, true].into_iter().enumerate() {
        let announcement = repo.save(record(&format!("Announcement {}", i), is_global), &[]).await?;
        saved.push(announcement);
        assert!(repo.count_global().await? <= 1);
    }

    // The last global save wins
    let last_global = saved.iter().rev().find(|a| a.is_global).unwrap();
    let globals = repo.find_active_for(None).await?;
    assert_eq!(globals.len(), 1);
    assert_eq!(globals[0].id, last_global.id);

    // Updating an older record to global moves the flag to it
    let mut first = repo.find_by_id(saved[0].id).await?.unwrap();
    assert!(!first.is_global);
    first.is_global = true;
    repo.save(first.clone(), &[]).await?;
    assert_eq!(repo.count_global().await?, 1);
    assert!(repo.find_by_id(first.id).await?.unwrap().is_global);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_global_saves_leave_one_global() -> anyhow::Result<()> {
    let (pool, path) = setup_file_pool(8).await?;
    let repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.save(record(&format!("Global {}", i), true), &[]).await
            })
        })
        .collect();

    let mut saved = Vec::new();
    for handle in handles {
        saved.push(handle.await??);
    }

    assert_eq!(saved.len(), 16);
    assert_eq!(repo.count_global().await?, 1);
    assert_eq!(repo.list().await?.len(), 16);

    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }

    Ok(())
}

#[tokio::test]
async fn test_saving_global_record_again_is_idempotent() -> anyhow::Result<()> {
    let pool = setup_pool().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let global = repo.save(record("Global", true), &[]).await?;
    repo.save(record("Other", false), &[]).await?;

    let again = repo.save(global.clone(), &[]).await?;
    assert!(again.is_global);
    assert_eq!(repo.count_global().await?, 1);
    assert_eq!(repo.find_active_for(None).await?[0].id, global.id);
    assert_eq!(again.created_at, global.created_at);

    Ok(())
}

#[tokio::test]
async fn test_find_active_for_orders_global_first() -> anyhow::Result<()> {
    let ctx = setup_context().await?;
    let actor = Grants::all();
    let service = &ctx.announcement_service;

    let page = ctx.page_repo.create(CreatePageRequest {
        title: "Home".to_string(),
        url_segment: "home".to_string(),
    }).await?;
    let other_page = ctx.page_repo.create(CreatePageRequest {
        title: "About".to_string(),
        url_segment: "about".to_string(),
    }).await?;

    let mut page_scoped = request("Page scoped", false);
    page_scoped.page_ids = vec![page.id, page.id];
    let page_scoped = service.save(&actor, None, page_scoped).await?;

    let mut elsewhere = request("Elsewhere", false);
    elsewhere.page_ids = vec![other_page.id];
    service.save(&actor, None, elsewhere).await?;

    let global = service.save(&actor, None, request("Global", true)).await?;

    let active = service.global_special_announcements(Some(page.id)).await?;
    let ids: Vec<_> = active.iter().map(|r| r.announcement.id).collect();
    assert_eq!(ids, vec![global.id, page_scoped.id]);
    assert_eq!(active[1].page_ids, vec![page.id]);

    let global_only = service.global_special_announcements(None).await?;
    assert_eq!(global_only.len(), 1);
    assert_eq!(global_only[0].announcement.id, global.id);

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_record() -> anyhow::Result<()> {
    let ctx = setup_context().await?;
    let actor = Grants::all();
    let service = &ctx.announcement_service;

    let global = service.save(&actor, None, request("Global", true)).await?;
    service.delete(&actor, global.id).await?;

    assert!(ctx.announcement_repo.find_by_id(global.id).await?.is_none());
    assert_eq!(ctx.announcement_repo.count_global().await?, 0);
    assert!(matches!(service.delete(&actor, global.id).await, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_permissions_are_enforced() -> anyhow::Result<()> {
    let ctx = setup_context().await?;
    let service = &ctx.announcement_service;

    let editor = Grants(vec![Permission::Edit]);
    assert!(matches!(
        service.save(&editor, None, request("New", false)).await,
        Err(AppError::Forbidden)
    ));

    let creator = Grants(vec![Permission::Create]);
    let created = service.save(&creator, None, request("New", false)).await?;

    // Without edit rights, known and unknown ids are refused alike
    assert!(matches!(
        service.save(&creator, Some(Uuid::new_v4()), request("Guess", false)).await,
        Err(AppError::Forbidden)
    ));

    assert!(matches!(
        service.save(&creator, Some(created.id), request("Renamed", false)).await,
        Err(AppError::Forbidden)
    ));
    let renamed = service.save(&editor, Some(created.id), request("Renamed", false)).await?;
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.title, "Renamed");

    assert!(matches!(service.delete(&editor, created.id).await, Err(AppError::Forbidden)));
    service.delete(&Grants(vec![Permission::Delete]), created.id).await?;

    Ok(())
}

#[tokio::test]
async fn test_validation_names_the_offending_field() -> anyhow::Result<()> {
    let ctx = setup_context().await?;
    let actor = Grants::all();
    let service = &ctx.announcement_service;

    let field_of = |result: Result<Announcement, AppError>| match result {
        Err(AppError::Validation { field, .. }) => field,
        other => panic!("expected validation error, got {:?}", other.map(|a| a.id)),
    };

    assert_eq!(field_of(service.save(&actor, None, request("", false)).await), "title");
    assert_eq!(field_of(service.save(&actor, None, request("   ", false)).await), "title");

    let mut bad_date = request("Dated", false);
    bad_date.expires = Some("next tuesday".to_string());
    assert_eq!(field_of(service.save(&actor, None, bad_date).await), "expires");

    let mut bad_link = request("Linked", false);
    bad_link.links.insert(LinkSlot::Link, Uuid::new_v4());
    assert_eq!(field_of(service.save(&actor, None, bad_link).await), "links.link");

    let mut bad_image = request("Pictured", false);
    bad_image.image_id = Some(Uuid::new_v4());
    assert_eq!(field_of(service.save(&actor, None, bad_image).await), "image_id");

    // Nothing was written
    assert!(ctx.announcement_repo.list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_category_defaults_and_schema_projection() -> anyhow::Result<()> {
    let ctx = setup_context().await?;
    let actor = Grants::all();
    let service = &ctx.announcement_service;

    let defaulted = service.save(&actor, None, request("Defaulted", false)).await?;
    assert_eq!(defaulted.category, DEFAULT_CATEGORY);

    let link = ctx.link_repo.create(CreateLinkRequest {
        url: "https://example.gov/info".to_string(),
        title: None,
    }).await?;

    let mut blank = request("Stay home", false);
    blank.category = Some(String::new());
    blank.short_description = "<b>Stay home</b>".to_string();
    blank.date_posted = Some("2021-03-01T00:00:00".to_string());
    blank.links.insert(LinkSlot::Link, link.id);
    let blank = service.save(&actor, None, blank).await?;
    assert_eq!(blank.category, "");
    assert_eq!(blank.date_posted.as_deref(), Some("2021-03-01 00:00:00"));

    let resolved = service.resolve(blank).await?;
    let schema = ctx.projector.to_schema_json(&resolved);
    assert_eq!(schema["category"], DEFAULT_CATEGORY);
    assert_eq!(schema["text"], "Stay home");
    assert_eq!(schema["datePosted"], "2021-03-01T00:00:00+0000");
    assert!(!schema.contains_key("expires"));
    assert_eq!(schema["url"], "https://example.gov/info");
    for slot in LinkSlot::ALL.iter().filter(|s| **s != LinkSlot::Link) {
        assert!(!schema.contains_key(slot.schema_key()));
    }

    Ok(())
}

#[tokio::test]
async fn test_unparseable_stored_date_is_omitted() -> anyhow::Result<()> {
    let ctx = setup_context().await?;
    let actor = Grants::all();

    let mut dated = request("Dated", false);
    dated.date_posted = Some("2021-03-01".to_string());
    dated.expires = Some("2021-06-01".to_string());
    let saved = ctx.announcement_service.save(&actor, None, dated).await?;

    sqlx::query("UPDATE special_announcements SET expires = 'soon' WHERE id = ?")
        .bind(saved.id.to_string())
        .execute(&ctx.db_pool)
        .await?;

    let reloaded = ctx.announcement_service.get(saved.id).await?;
    let schema = ctx.projector.to_schema_json(&ctx.announcement_service.resolve(reloaded).await?);
    assert_eq!(schema["datePosted"], "2021-03-01T00:00:00+0000");
    assert!(!schema.contains_key("expires"));

    Ok(())
}

#[tokio::test]
async fn test_dropdown_options_global_first() -> anyhow::Result<()> {
    let ctx = setup_context().await?;
    let actor = Grants::all();
    let service = &ctx.announcement_service;

    service.save(&actor, None, request("Local", false)).await?;
    service.save(&actor, None, request("Everywhere", true)).await?;

    let labels: Vec<_> = service.dropdown_options().await?.into_iter().map(|o| o.label).collect();
    assert_eq!(labels, vec!["Everywhere (global)".to_string(), "Local".to_string()]);

    let summaries = service.list_summaries().await?;
    assert_eq!(summaries[0].global, "Yes");
    assert_eq!(summaries[1].global, "No");

    Ok(())
}

#[tokio::test]
async fn test_deleting_link_clears_slot() -> anyhow::Result<()> {
    let ctx = setup_context().await?;
    let actor = Grants::all();

    let link = ctx.link_repo.create(CreateLinkRequest {
        url: "https://example.gov/travel".to_string(),
        title: Some("Travel bans".to_string()),
    }).await?;

    let mut linked = request("Travel", false);
    linked.links.insert(LinkSlot::TravelBans, link.id);
    let saved = ctx.announcement_service.save(&actor, None, linked).await?;
    assert_eq!(saved.links.get(&LinkSlot::TravelBans), Some(&link.id));

    ctx.link_repo.delete(link.id).await?;

    let reloaded = ctx.announcement_service.get(saved.id).await?;
    assert!(reloaded.links.is_empty());

    Ok(())
}
