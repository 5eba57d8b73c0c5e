use anyhow::Result;
use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;
use common::*;

#[tokio::test]
async fn test_headman_returns_only_received_slots() -> Result<()> {
    let relay = spawn_relay().await?;
    let form = Form::new().part("supporting_document_ddc", file_part("ddc.pdf", b"ddc"));

    let response = reqwest::Client::new()
        .post(format!("{}/upload/headman", relay.base_url))
        .multipart(form)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    assert_eq!(body["success"], true);
    let paths = body["filePaths"].as_object().unwrap();
    assert_eq!(paths.len(), 1);
    let ddc = paths["supporting_document_ddc"].as_str().unwrap();
    assert!(ddc.starts_with("/uploads/"));
    assert!(ddc.ends_with("-ddc-ddc.pdf"));

    assert_eq!(relay.backend.events().first(), Some(&Event::Connect));
    assert_eq!(relay.backend.events().last(), Some(&Event::Close));
    Ok(())
}

#[tokio::test]
async fn test_villagehead_stores_all_three_with_one_timestamp() -> Result<()> {
    let relay = spawn_relay().await?;
    let form = Form::new()
        .part("recommendationsfromchief", file_part("chief.pdf", b"c"))
        .part("recommendationsfromheadman", file_part("headman.pdf", b"h"))
        .part("supporting_document_ddc", file_part("ddc.pdf", b"d"));

    let body: Value = reqwest::Client::new()
        .post(format!("{}/upload/villagehead", relay.base_url))
        .multipart(form)
        .send()
        .await?
        .json()
        .await?;

    let paths = body["filePaths"].as_object().unwrap();
    assert_eq!(paths.len(), 3);
    let chief = paths["recommendationsfromchief"].as_str().unwrap();
    let headman = paths["recommendationsfromheadman"].as_str().unwrap();
    let ddc = paths["supporting_document_ddc"].as_str().unwrap();
    assert!(chief.ends_with("-chief-chief.pdf"));
    assert!(headman.ends_with("-headman-headman.pdf"));
    assert!(ddc.ends_with("-ddc-ddc.pdf"));

    let stamp = timestamp_of(chief);
    assert_eq!(timestamp_of(headman), stamp);
    assert_eq!(timestamp_of(ddc), stamp);

    assert_eq!(relay.backend.uploads().len(), 3);
    assert_eq!(relay.backend.file(headman).as_deref(), Some(&b"h"[..]));
    Ok(())
}

#[tokio::test]
async fn test_no_documents_is_bad_request() -> Result<()> {
    let relay = spawn_relay().await?;
    let form = Form::new().text("notes", "nothing attached");

    let response = reqwest::Client::new()
        .post(format!("{}/upload/headman", relay.base_url))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({"error": "No files uploaded"}));
    assert!(relay.backend.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_headman_rejects_village_head_slot() -> Result<()> {
    let relay = spawn_relay().await?;
    let form = Form::new().part("recommendationsfromheadman", file_part("h.pdf", b"h"));

    let response = reqwest::Client::new()
        .post(format!("{}/upload/headman", relay.base_url))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Unexpected field: recommendationsfromheadman");
    Ok(())
}

#[tokio::test]
async fn test_partial_failure_reports_error_and_closes() -> Result<()> {
    let relay = spawn_relay().await?;
    relay.backend.fail_upload_after(1);

    let form = Form::new()
        .part("recommendationsfromchief", file_part("chief.pdf", b"c"))
        .part("supporting_document_ddc", file_part("ddc.pdf", b"d"));
    let response = reqwest::Client::new()
        .post(format!("{}/upload/headman", relay.base_url))
        .multipart(form)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "File upload failed");

    let events = relay.backend.events();
    assert_eq!(events.len(), 3, "{:?}", events);
    assert!(matches!(&events[1], Event::Upload(p) if p.ends_with("-chief-chief.pdf")));
    assert_eq!(events[2], Event::Close);
    Ok(())
}
