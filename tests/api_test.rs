mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::{setup_context, DEFAULT_CATEGORY};
use serde_json::{json, Value};
use special_announcements::{
    api::create_app,
    auth::{generate_token, hash_token, Permission},
    config::Settings,
};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    token: String,
    reader_token: String,
}

async fn setup_app() -> anyhow::Result<TestApp> {
    let ctx = setup_context().await?;

    let token = generate_token();
    ctx.editor_repo
        .create("Editor", &hash_token(&token), &Permission::ALL)
        .await?;

    let reader_token = generate_token();
    ctx.editor_repo
        .create("Reader", &hash_token(&reader_token), &[])
        .await?;

    let mut settings = Settings::default();
    settings.server.base_url = "https://example.gov".to_string();
    settings.uploads.dir = std::env::temp_dir()
        .join("special-announcements-api-test")
        .to_string_lossy()
        .to_string();

    Ok(TestApp {
        router: create_app(ctx, Arc::new(settings)),
        token,
        reader_token,
    })
}

async fn send(app: &TestApp, request: Request<Body>) -> anyhow::Result<(StatusCode, Vec<u8>)> {
    let response = app.router.clone().oneshot(request).await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, body.to_vec()))
}

fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_api_requires_bearer_token() -> anyhow::Result<()> {
    let app = setup_app().await?;

    let (status, _) = send(&app, get("/api/announcements")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/announcements", "not-a-token", json!({ "title": "x" })),
    ).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/announcements", &app.reader_token, json!({ "title": "x" })),
    ).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn test_create_and_publish_announcement() -> anyhow::Result<()> {
    let app = setup_app().await?;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/links", &app.token, json!({ "url": "https://example.gov/info" })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);
    let link: Value = serde_json::from_slice(&body)?;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/pages", &app.token, json!({ "title": "Home", "url_segment": "home" })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);
    let page: Value = serde_json::from_slice(&body)?;
    let page_id = page["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        json_request("POST", "/api/announcements", &app.token, json!({
            "title": "Stay home",
            "is_global": true,
            "category": "",
            "short_description": "<b>Stay home</b>",
            "content": "<p>Only leave home for essential reasons.</p>",
            "date_posted": "2021-03-01T00:00:00",
            "links": { "link": link["id"] },
            "page_ids": [page_id]
        })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_slice(&body)?;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["is_global"], true);

    let (status, body) = send(&app, get(&format!("/public/announcements/{}/schema.json", id))).await?;
    assert_eq!(status, StatusCode::OK);
    let schema: Value = serde_json::from_slice(&body)?;
    assert_eq!(schema["@context"], "http://schema.org");
    assert_eq!(schema["@type"], "SpecialAnnouncement");
    assert_eq!(schema["category"], DEFAULT_CATEGORY);
    assert_eq!(schema["text"], "Stay home");
    assert_eq!(schema["datePosted"], "2021-03-01T00:00:00+0000");
    assert_eq!(schema["url"], "https://example.gov/info");
    assert!(schema.get("expires").is_none());

    let (status, body) = send(&app, get("/public/announcements")).await?;
    assert_eq!(status, StatusCode::OK);
    let active: Value = serde_json::from_slice(&body)?;
    assert_eq!(active.as_array().map(Vec::len), Some(1));
    assert_eq!(active[0]["category_url"], DEFAULT_CATEGORY);

    let (status, body) = send(&app, get(&format!("/public/pages/{}/announcements", page_id))).await?;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body)?;
    assert!(html.contains("<p>Only leave home for essential reasons.</p>"));
    assert!(html.contains("application/ld+json"));

    Ok(())
}

#[tokio::test]
async fn test_validation_error_response_names_field() -> anyhow::Result<()> {
    let app = setup_app().await?;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/announcements", &app.token, json!({
            "title": "Dated",
            "date_posted": "the first of march"
        })),
    ).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = serde_json::from_slice(&body)?;
    assert_eq!(error["field"], "date_posted");

    let (status, body) = send(
        &app,
        json_request("POST", "/api/links", &app.token, json!({ "url": "not a url" })),
    ).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = serde_json::from_slice(&body)?;
    assert_eq!(error["field"], "url");

    Ok(())
}

#[tokio::test]
async fn test_element_renders_chosen_announcement() -> anyhow::Result<()> {
    let app = setup_app().await?;

    let (_, body) = send(
        &app,
        json_request("POST", "/api/pages", &app.token, json!({ "title": "News", "url_segment": "news" })),
    ).await?;
    let page: Value = serde_json::from_slice(&body)?;

    let (_, body) = send(
        &app,
        json_request("POST", "/api/announcements", &app.token, json!({
            "title": "Testing clinics open",
            "content": "<p>Clinics are open daily.</p>"
        })),
    ).await?;
    let announcement: Value = serde_json::from_slice(&body)?;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/elements", &app.token, json!({
            "page_id": page["id"],
            "announcement_id": announcement["id"]
        })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);
    let element: Value = serde_json::from_slice(&body)?;
    assert_eq!(element["summary"], "Special announcement");

    let element_uri = format!("/public/elements/{}", element["id"].as_str().unwrap());
    let (status, body) = send(&app, get(&element_uri)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body)?.contains("<p>Clinics are open daily.</p>"));

    let delete_uri = format!("/api/announcements/{}", announcement["id"].as_str().unwrap());
    let (status, _) = send(&app, json_request("DELETE", &delete_uri, &app.token, json!({}))).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get(&element_uri)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_admin_metadata_endpoints() -> anyhow::Result<()> {
    let app = setup_app().await?;

    for (title, is_global) in [("Local", false), ("Everywhere", true)] {
        let (status, _) = send(
            &app,
            json_request("POST", "/api/announcements", &app.token, json!({ "title": title, "is_global": is_global })),
        ).await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let options_request = Request::builder()
        .uri("/api/announcements/options")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .body(Body::empty())?;
    let (status, body) = send(&app, options_request).await?;
    assert_eq!(status, StatusCode::OK);
    let options: Value = serde_json::from_slice(&body)?;
    assert_eq!(options[0]["label"], "Everywhere (global)");
    assert_eq!(options[1]["label"], "Local");

    let fields_request = Request::builder()
        .uri("/api/announcements/fields")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .body(Body::empty())?;
    let (status, body) = send(&app, fields_request).await?;
    assert_eq!(status, StatusCode::OK);
    let form: Value = serde_json::from_slice(&body)?;
    let category = form["fields"]
        .as_array()
        .and_then(|fields| fields.iter().find(|f| f["name"] == "category"))
        .cloned()
        .unwrap_or(Value::Null);
    assert_eq!(category["default_value"], DEFAULT_CATEGORY);

    let permissions_request = Request::builder()
        .uri("/api/permissions")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.reader_token))
        .body(Body::empty())?;
    let (status, body) = send(&app, permissions_request).await?;
    assert_eq!(status, StatusCode::OK);
    let permissions: Value = serde_json::from_slice(&body)?;
    assert_eq!(permissions.as_array().map(Vec::len), Some(3));

    Ok(())
}
