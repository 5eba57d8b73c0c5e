use chrono::{Datelike, Months, NaiveDate};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::{ClientError, ClientResult};
use super::relay::{Attachment, RelayClient};
use crate::auth::Session;
use crate::config::{normalize_base_url, ClientConfig};
use crate::models::{
    Appointment, AreaKind, DocumentKind, DocumentPath, ErrorResponse, LeaderDraft, LeaderField, LeaderRole,
    LoginRequest, LoginResponse, MessageResponse, SignupRequest, TraditionalArea, TraditionalLeader,
};

/// Filters for the leader list endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub province: Option<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl ListQuery {
    pub fn province(province: impl Into<String>) -> Self {
        Self {
            province: Some(province.into()),
            date_range: None,
        }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            province: None,
            date_range: Some((start, end)),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(province) = self.province.as_deref().map(str::trim) {
            if !province.is_empty() && !province.eq_ignore_ascii_case("all") {
                params.push(("province", province.to_string()));
            }
        }
        if let Some((start, end)) = self.date_range {
            params.push(("startDate", start.format("%Y-%m-%d").to_string()));
            params.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

/// Appointments made in one calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub chiefs: Vec<TraditionalLeader>,
    pub headmen: Vec<TraditionalLeader>,
    pub village_heads: Vec<TraditionalLeader>,
}

impl MonthlyReport {
    pub fn total(&self) -> usize {
        self.chiefs.len() + self.headmen.len() + self.village_heads.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Client for the remote records API.
///
/// Authentication endpoints are public; everything else sends the session
/// token and fails fast without one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = normalize_base_url(base_url);
        url::Url::parse(&base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            session: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(&config.api_base_url, Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- Authentication ----

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        info!("Logging in as {}", username);
        let request = self
            .http
            .post(self.url("/login"))
            .json(&LoginRequest { username, password });
        self.fetch(request).await
    }

    pub async fn signup(&self, signup: &SignupRequest) -> ClientResult<MessageResponse> {
        let request = self.http.post(self.url("/signup")).json(signup);
        self.fetch(request).await
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        let request = self
            .http
            .post(self.url("/forgot-password"))
            .json(&json!({ "email": email }));
        self.fetch(request).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> ClientResult<MessageResponse> {
        let request = self
            .http
            .post(self.url(&format!("/reset-password/{}", token)))
            .json(&json!({ "newPassword": new_password }));
        self.fetch(request).await
    }

    // ---- Leaders ----

    pub async fn list_leaders(&self, role: LeaderRole, query: &ListQuery) -> ClientResult<Vec<TraditionalLeader>> {
        let request = self
            .http
            .get(self.url(&format!("/{}", role.collection())))
            .query(&query.params());
        let leaders: Option<Vec<TraditionalLeader>> = self.fetch(self.authorize(request)?).await?;
        Ok(leaders.unwrap_or_default())
    }

    pub async fn get_chiefs(&self, province: Option<&str>) -> ClientResult<Vec<TraditionalLeader>> {
        self.list_leaders(LeaderRole::Chief, &province_query(province)).await
    }

    pub async fn get_headmen(&self, province: Option<&str>) -> ClientResult<Vec<TraditionalLeader>> {
        self.list_leaders(LeaderRole::Headman, &province_query(province)).await
    }

    pub async fn get_village_heads(&self, province: Option<&str>) -> ClientResult<Vec<TraditionalLeader>> {
        self.list_leaders(LeaderRole::VillageHead, &province_query(province)).await
    }

    /// Fetch one record. A `null` or empty body means it does not exist.
    pub async fn get_leader(&self, role: LeaderRole, id: &str) -> ClientResult<TraditionalLeader> {
        let request = self.http.get(self.url(&format!("/{}/{}", role.collection(), id)));
        let body = self.send(self.authorize(request)?).await?;
        if body.trim().is_empty() {
            return Err(not_found(role));
        }
        let leader: Option<TraditionalLeader> = serde_json::from_str(&body)?;
        leader.ok_or_else(|| not_found(role))
    }

    pub async fn get_chief_by_id(&self, id: &str) -> ClientResult<TraditionalLeader> {
        self.get_leader(LeaderRole::Chief, id).await
    }

    pub async fn get_headman_by_id(&self, id: &str) -> ClientResult<TraditionalLeader> {
        self.get_leader(LeaderRole::Headman, id).await
    }

    pub async fn get_village_head_by_id(&self, id: &str) -> ClientResult<TraditionalLeader> {
        self.get_leader(LeaderRole::VillageHead, id).await
    }

    /// Validate the draft locally, then create the record.
    ///
    /// Nothing is sent when a required field is missing.
    pub async fn appoint(&self, draft: &LeaderDraft, role: LeaderRole) -> ClientResult<Value> {
        let appointment = Appointment::from_draft(role, draft)?;
        let request = self
            .http
            .post(self.url(&format!("/{}", role.appoint_path())))
            .json(&appointment.to_body());
        let request = self.authorize(request)?;
        info!("Appointing {} {}", role, appointment.nominee().incumbent);
        let created: Option<Value> = self.fetch(request).await?;
        Ok(created.unwrap_or(Value::Null))
    }

    pub async fn appoint_chief(&self, draft: &LeaderDraft) -> ClientResult<Value> {
        self.appoint(draft, LeaderRole::Chief).await
    }

    pub async fn appoint_headman(&self, draft: &LeaderDraft) -> ClientResult<Value> {
        self.appoint(draft, LeaderRole::Headman).await
    }

    pub async fn appoint_village_head(&self, draft: &LeaderDraft) -> ClientResult<Value> {
        self.appoint(draft, LeaderRole::VillageHead).await
    }

    /// PUT only the given fields of one record.
    pub async fn update_leader(&self, role: LeaderRole, id: &str, changes: &Map<String, Value>) -> ClientResult<Value> {
        let request = self
            .http
            .put(self.url(&format!("/{}/{}", role.collection(), id)))
            .json(changes);
        let updated: Option<Value> = self.fetch(self.authorize(request)?).await?;
        Ok(updated.unwrap_or(Value::Null))
    }

    pub async fn update_field(&self, role: LeaderRole, id: &str, field: LeaderField, value: &str) -> ClientResult<Value> {
        let mut changes = Map::new();
        changes.insert(field.as_str().to_string(), Value::String(value.to_string()));
        self.update_leader(role, id, &changes).await
    }

    pub async fn update_chief(&self, id: &str, changes: &Map<String, Value>) -> ClientResult<Value> {
        self.update_leader(LeaderRole::Chief, id, changes).await
    }

    pub async fn update_headman(&self, id: &str, changes: &Map<String, Value>) -> ClientResult<Value> {
        self.update_leader(LeaderRole::Headman, id, changes).await
    }

    pub async fn update_village_head(&self, id: &str, changes: &Map<String, Value>) -> ClientResult<Value> {
        self.update_leader(LeaderRole::VillageHead, id, changes).await
    }

    /// PUT document paths of one record.
    pub async fn update_documents(
        &self,
        role: LeaderRole,
        id: &str,
        documents: &Map<String, Value>,
    ) -> ClientResult<Value> {
        let request = self
            .http
            .put(self.url(&format!("/{}/{}/documents", role.collection(), id)))
            .json(documents);
        let updated: Option<Value> = self.fetch(self.authorize(request)?).await?;
        Ok(updated.unwrap_or(Value::Null))
    }

    /// Replace documents: each file goes through the relay (which drops the
    /// file it replaces), then the new paths are written to the record.
    pub async fn update_files(
        &self,
        relay: &RelayClient,
        role: LeaderRole,
        id: &str,
        current: &TraditionalLeader,
        files: &[(DocumentKind, Attachment)],
    ) -> ClientResult<BTreeMap<DocumentKind, DocumentPath>> {
        self.bearer()?;

        let mut paths = BTreeMap::new();
        for (kind, file) in files {
            let path = relay.update_file(file, *kind, current.get(kind.field())).await?;
            paths.insert(*kind, path);
        }

        let documents: Map<String, Value> = paths
            .iter()
            .map(|(kind, path)| (kind.wire_name().to_string(), Value::String(path.to_string())))
            .collect();
        self.update_documents(role, id, &documents).await?;
        Ok(paths)
    }

    // ---- Areas ----

    /// Areas of one kind. The endpoint answers with a single object when
    /// filtered by id; both shapes come back as a list.
    pub async fn list_areas(
        &self,
        kind: AreaKind,
        id: Option<&str>,
        province: Option<&str>,
    ) -> ClientResult<Vec<TraditionalArea>> {
        let mut params = Vec::new();
        if let Some(id) = id {
            params.push(("id", id.to_string()));
        }
        if let Some(province) = province {
            params.push(("province", province.to_string()));
        }
        let request = self
            .http
            .get(self.url(&format!("/{}", kind.collection())))
            .query(&params);
        let areas: Option<OneOrMany<TraditionalArea>> = self.fetch(self.authorize(request)?).await?;
        Ok(match areas {
            Some(OneOrMany::Many(areas)) => areas,
            Some(OneOrMany::One(area)) => vec![area],
            None => Vec::new(),
        })
    }

    // ---- Reports ----

    /// Appointments dated within the calendar month containing `today`.
    pub async fn monthly_appointments(&self, today: NaiveDate) -> ClientResult<MonthlyReport> {
        let (start, end) = month_bounds(today);
        let query = ListQuery::between(start, end);

        let (chiefs, headmen, village_heads) = futures::try_join!(
            self.list_leaders(LeaderRole::Chief, &query),
            self.list_leaders(LeaderRole::Headman, &query),
            self.list_leaders(LeaderRole::VillageHead, &query),
        )?;

        let within = |leaders: Vec<TraditionalLeader>| -> Vec<TraditionalLeader> {
            leaders
                .into_iter()
                .filter(|leader| appointed_between(leader, start, end))
                .collect()
        };

        Ok(MonthlyReport {
            start,
            end,
            chiefs: within(chiefs),
            headmen: within(headmen),
            village_heads: within(village_heads),
        })
    }

    // ---- Plumbing ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> ClientResult<&str> {
        let session = self.session.as_ref().ok_or(ClientError::NotAuthenticated)?;
        if session.is_expired() {
            return Err(ClientError::SessionExpired);
        }
        Ok(session.token())
    }

    fn authorize(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        Ok(request.bearer_auth(self.bearer()?))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let body = self.send(request).await?;
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    /// Send and return the body text of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> ClientResult<String> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            warn!("API error {}: {}", status.as_u16(), message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

fn province_query(province: Option<&str>) -> ListQuery {
    ListQuery {
        province: province.map(str::to_string),
        date_range: None,
    }
}

fn not_found(role: LeaderRole) -> ClientError {
    ClientError::NotFound(format!("{} not found", role.label()))
}

/// First and last day of the month containing `day`.
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(day);
    (start, end)
}

fn appointed_between(leader: &TraditionalLeader, start: NaiveDate, end: NaiveDate) -> bool {
    leader
        .get(LeaderField::DateOfAppointment)
        .and_then(|raw| raw.get(..10))
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .map(|date| date >= start && date <= end)
        .unwrap_or(false)
}
