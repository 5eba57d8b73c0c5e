use anyhow::Result;
use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;
use common::*;

#[tokio::test]
async fn test_health_and_root() -> Result<()> {
    let relay = spawn_relay().await?;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", relay.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health["success"], true);
    assert_eq!(health["data"]["status"], "ok");
    assert!(health["data"]["timestamp"].is_string());

    let root: Value = client.get(&relay.base_url).send().await?.json().await?;
    assert_eq!(root["success"], true);
    assert!(root["data"]["endpoints"]["upload"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_upload_stores_file_under_timestamped_name() -> Result<()> {
    let relay = spawn_relay().await?;
    let client = reqwest::Client::new();

    let form = Form::new().part("file", file_part("letter.pdf", b"%PDF-1.4"));
    let response = client
        .post(format!("{}/upload", relay.base_url))
        .multipart(form)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    assert_eq!(body["success"], true);
    let path = body["filePath"].as_str().unwrap().to_string();
    assert!(path.starts_with("/uploads/"));
    assert!(path.ends_with("-letter.pdf"));
    assert!(timestamp_of(&path) > 0);

    assert_eq!(relay.backend.file(&path).as_deref(), Some(&b"%PDF-1.4"[..]));
    assert_eq!(
        relay.backend.events(),
        vec![Event::Connect, Event::Upload(path), Event::Close]
    );
    Ok(())
}

#[tokio::test]
async fn test_identical_uploads_get_distinct_paths() -> Result<()> {
    let relay = spawn_relay().await?;
    let client = reqwest::Client::new();

    let mut paths = Vec::new();
    for _ in 0..5 {
        let form = Form::new().part("file", file_part("same.pdf", b"same"));
        let body: Value = client
            .post(format!("{}/upload", relay.base_url))
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;
        paths.push(body["filePath"].as_str().unwrap().to_string());
    }

    let stamps: Vec<i64> = paths.iter().map(|p| timestamp_of(p)).collect();
    assert!(stamps.windows(2).all(|w| w[0] < w[1]), "{:?}", stamps);
    assert_eq!(relay.backend.uploads(), paths);
    Ok(())
}

#[tokio::test]
async fn test_client_file_name_is_reduced_to_base_name() -> Result<()> {
    let relay = spawn_relay().await?;
    let form = Form::new().part("file", file_part("../../etc/passwd", b"x"));
    let body: Value = reqwest::Client::new()
        .post(format!("{}/upload", relay.base_url))
        .multipart(form)
        .send()
        .await?
        .json()
        .await?;

    let path = body["filePath"].as_str().unwrap();
    assert!(path.starts_with("/uploads/"));
    assert!(path.ends_with("-passwd"));
    assert!(!path.contains(".."));
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_bad_request() -> Result<()> {
    let relay = spawn_relay().await?;
    let form = Form::new().text("note", "no attachment");
    let response = reqwest::Client::new()
        .post(format!("{}/upload", relay.base_url))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({"error": "No file uploaded"}));
    assert!(relay.backend.events().is_empty(), "no session for a rejected form");
    Ok(())
}

#[tokio::test]
async fn test_unexpected_file_field_is_bad_request() -> Result<()> {
    let relay = spawn_relay().await?;
    let form = Form::new().part("attachment", file_part("letter.pdf", b"x"));
    let response = reqwest::Client::new()
        .post(format!("{}/upload", relay.base_url))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Unexpected field: attachment");
    assert!(relay.backend.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_reports_details() -> Result<()> {
    let relay = spawn_relay().await?;
    relay.backend.refuse_connect();

    let form = Form::new().part("file", file_part("letter.pdf", b"x"));
    let response = reqwest::Client::new()
        .post(format!("{}/upload", relay.base_url))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "File upload failed");
    assert!(body["details"].as_str().unwrap().contains("connection refused"));
    Ok(())
}

#[tokio::test]
async fn test_failed_store_still_closes_session() -> Result<()> {
    let relay = spawn_relay().await?;
    relay.backend.fail_upload_after(0);

    let form = Form::new().part("file", file_part("letter.pdf", b"x"));
    let response = reqwest::Client::new()
        .post(format!("{}/upload", relay.base_url))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert!(body["details"].as_str().unwrap().contains("552"));
    assert_eq!(relay.backend.events(), vec![Event::Connect, Event::Close]);
    Ok(())
}
