use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leadership_records::client::{ApiClient, Attachment, ClientError, RelayClient};
use leadership_records::models::{DocumentKind, LeaderField, LeaderRole};
use leadership_records::workflow::{AppointmentWizard, Step, SubmitError};

mod common;
use common::*;

fn clients(relay: &TestRelay, api: &MockServer) -> Result<(RelayClient, ApiClient)> {
    let relay_client = RelayClient::new(&relay.base_url, Duration::from_secs(5))?;
    let api_client = ApiClient::new(&api.uri(), Duration::from_secs(5))?.with_session(admin_session());
    Ok((relay_client, api_client))
}

/// Headman wizard filled through to the documents step.
fn headman_at_documents() -> Result<AppointmentWizard> {
    let mut wizard = AppointmentWizard::new(LeaderRole::Headman);
    for (field, value) in [
        (LeaderField::Province, "masvingo"),
        (LeaderField::Chieftainship, "Chivi"),
        (LeaderField::Headmanship, "Madzivire"),
        (LeaderField::District, "Chivi"),
        (LeaderField::Status, "SUBSTANTIVE"),
    ] {
        wizard.set(field, value);
    }
    assert_eq!(wizard.next()?, Step::Incumbent);

    for (field, value) in [
        (LeaderField::Incumbent, "Farai Madzivire"),
        (LeaderField::IdNumber, "63-112233-K-63"),
        (LeaderField::DateOfBirth, "1965-09-14"),
        (LeaderField::Gender, "Male"),
        (LeaderField::DateOfAppointment, "2024-06-01"),
    ] {
        wizard.set(field, value);
    }
    assert_eq!(wizard.next()?, Step::PreviousIncumbent);

    for (field, value) in [
        (LeaderField::LastIncumbentName, "Tobias Madzivire"),
        (LeaderField::LastIncumbentIdNumber, "41-556677-C-41"),
        (LeaderField::RelationshipToLastIncumbent, "Nephew"),
        (LeaderField::DateOfVacancy, "2023-11-02"),
        (LeaderField::ReasonOfVacancy, "Death"),
    ] {
        wizard.set(field, value);
    }
    assert_eq!(wizard.next()?, Step::Documents);
    Ok(wizard)
}

#[tokio::test]
async fn test_headman_appointment_uploads_then_posts_paths() -> Result<()> {
    let relay = spawn_relay().await?;
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/appoint/headman"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"headman_id": 77})))
        .expect(1)
        .mount(&api)
        .await;
    let (relay_client, api_client) = clients(&relay, &api)?;

    let mut wizard = headman_at_documents()?;
    wizard.attach(DocumentKind::RecommendationsFromChief, Attachment::new("chief.pdf", b"c".to_vec()))?;
    wizard.attach(DocumentKind::SupportingDocumentDdc, Attachment::new("ddc.pdf", b"d".to_vec()))?;

    let created = wizard.submit(&relay_client, &api_client).await?;
    assert_eq!(created["headman_id"], 77);
    assert!(!wizard.is_open());
    assert_eq!(wizard.step(), Step::Location);
    assert!(wizard.draft().is_empty());

    let stored = relay.backend.uploads();
    assert_eq!(stored.len(), 2);

    let requests = api.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body)?;
    assert_eq!(sent["headmanship"], "Madzivire");
    assert_eq!(sent["lastincumbentname"], "Tobias Madzivire");
    assert_eq!(sent["reasonofvacancy"], "Death");
    let chief = sent["recommendationsfromchief"].as_str().unwrap();
    let ddc = sent["supporting_document_ddc"].as_str().unwrap();
    assert!(stored.iter().any(|p| p == chief));
    assert!(stored.iter().any(|p| p == ddc));
    assert!(chief.ends_with("-chief-chief.pdf"));
    Ok(())
}

#[tokio::test]
async fn test_missing_document_blocks_any_upload() -> Result<()> {
    let relay = spawn_relay().await?;
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&api)
        .await;
    let (relay_client, api_client) = clients(&relay, &api)?;

    let mut wizard = headman_at_documents()?;
    wizard.attach(DocumentKind::SupportingDocumentDdc, Attachment::new("ddc.pdf", b"d".to_vec()))?;

    let err = wizard.submit(&relay_client, &api_client).await.unwrap_err();
    assert!(matches!(
        &err,
        SubmitError::Failed { source: ClientError::MissingFields(fields), .. }
            if fields == &vec!["recommendationsfromchief".to_string()]
    ));
    assert!(wizard.error().unwrap().contains("recommendationsfromchief"));
    assert!(wizard.is_open());
    assert_eq!(wizard.step(), Step::Documents);
    assert!(relay.backend.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_rejected_appointment_reports_orphaned_documents() -> Result<()> {
    let relay = spawn_relay().await?;
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/appoint/headman"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Database unavailable"})))
        .mount(&api)
        .await;
    let (relay_client, api_client) = clients(&relay, &api)?;

    let mut wizard = headman_at_documents()?;
    wizard.attach(DocumentKind::RecommendationsFromChief, Attachment::new("chief.pdf", b"c".to_vec()))?;
    wizard.attach(DocumentKind::SupportingDocumentDdc, Attachment::new("ddc.pdf", b"d".to_vec()))?;

    let err = wizard.submit(&relay_client, &api_client).await.unwrap_err();
    assert_eq!(err.to_string(), "Database unavailable");

    let mut orphaned: Vec<String> = err.orphaned_documents().iter().map(|p| p.to_string()).collect();
    let mut stored = relay.backend.uploads();
    orphaned.sort();
    stored.sort();
    assert_eq!(orphaned, stored);

    assert_eq!(wizard.error(), Some("Database unavailable"));
    assert!(wizard.is_open());
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.draft().get(LeaderField::Incumbent), Some("Farai Madzivire"));
    Ok(())
}

#[tokio::test]
async fn test_relay_failure_stops_before_appointment() -> Result<()> {
    let relay = spawn_relay().await?;
    relay.backend.refuse_connect();
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&api)
        .await;
    let (relay_client, api_client) = clients(&relay, &api)?;

    let mut wizard = headman_at_documents()?;
    wizard.attach(DocumentKind::RecommendationsFromChief, Attachment::new("chief.pdf", b"c".to_vec()))?;
    wizard.attach(DocumentKind::SupportingDocumentDdc, Attachment::new("ddc.pdf", b"d".to_vec()))?;

    let err = wizard.submit(&relay_client, &api_client).await.unwrap_err();
    assert_eq!(err.to_string(), "File upload failed");
    assert!(err.orphaned_documents().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_empty_previous_incumbent_step_blocks_next() -> Result<()> {
    let mut wizard = AppointmentWizard::new(LeaderRole::VillageHead);
    for (field, value) in [
        (LeaderField::Province, "midlands"),
        (LeaderField::Chieftainship, "Ngungumbane"),
        (LeaderField::Headmanship, "Mapanzure"),
        (LeaderField::Villagemanship, "Chikato"),
        (LeaderField::District, "Zvishavane"),
        (LeaderField::Status, "ACTING"),
        (LeaderField::Incumbent, "Rudo Shava"),
        (LeaderField::IdNumber, "70-998877-D-70"),
        (LeaderField::DateOfBirth, "1980-02-20"),
        (LeaderField::Gender, "Female"),
        (LeaderField::DateOfAppointment, "2024-06-05"),
    ] {
        wizard.set(field, value);
    }
    assert_eq!(wizard.next()?, Step::Incumbent);
    assert_eq!(wizard.next()?, Step::PreviousIncumbent);

    wizard.set(LeaderField::LastIncumbentName, "Tawanda Shava");
    let err = wizard.next().unwrap_err();
    assert_eq!(err.to_string(), "Missing required fields: lastincumbentidnumber, relationshiptolastincumbent, dateofvacancy, reasonofvacancy");
    assert_eq!(wizard.step(), Step::PreviousIncumbent);
    Ok(())
}

#[tokio::test]
async fn test_submit_only_from_last_step() -> Result<()> {
    let relay = spawn_relay().await?;
    let api = MockServer::start().await;
    let (relay_client, api_client) = clients(&relay, &api)?;

    let mut wizard = AppointmentWizard::new(LeaderRole::Chief);
    let err = wizard.submit(&relay_client, &api_client).await.unwrap_err();
    assert!(matches!(err, SubmitError::NotAtDocuments(Step::Location)));
    assert!(relay.backend.events().is_empty());
    Ok(())
}
