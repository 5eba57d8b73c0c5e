use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::document::{DocumentKind, DocumentPath};
use super::leader::{LeaderField, LeaderRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Substantive,
    Acting,
    Deceased,
    Removed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Substantive => "SUBSTANTIVE",
            AppointmentStatus::Acting => "ACTING",
            AppointmentStatus::Deceased => "DECEASED",
            AppointmentStatus::Removed => "REMOVED",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUBSTANTIVE" => Ok(AppointmentStatus::Substantive),
            "ACTING" => Ok(AppointmentStatus::Acting),
            "DECEASED" => Ok(AppointmentStatus::Deceased),
            "REMOVED" => Ok(AppointmentStatus::Removed),
            _ => Err(format!("unknown appointment status '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: String, value: String },
}

/// Fields that must be present before an appointment is sent, in form order.
pub fn required_fields(role: LeaderRole) -> &'static [LeaderField] {
    use LeaderField::*;
    match role {
        LeaderRole::Chief => &[
            Province,
            Chieftainship,
            District,
            Status,
            Incumbent,
            IdNumber,
            DateOfBirth,
            Gender,
            DateOfAppointment,
            RecommendationsFromHeadman,
        ],
        LeaderRole::Headman => &[
            Province,
            Chieftainship,
            Headmanship,
            District,
            Status,
            Incumbent,
            IdNumber,
            DateOfBirth,
            Gender,
            DateOfAppointment,
            RecommendationsFromChief,
            SupportingDocumentDdc,
        ],
        LeaderRole::VillageHead => &[
            Province,
            Chieftainship,
            Headmanship,
            Villagemanship,
            District,
            Status,
            Incumbent,
            IdNumber,
            DateOfBirth,
            Gender,
            DateOfAppointment,
            RecommendationsFromChief,
            RecommendationsFromHeadman,
            SupportingDocumentDdc,
        ],
    }
}

/// Field values collected by the wizard before they become an [`Appointment`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderDraft {
    values: BTreeMap<LeaderField, String>,
}

impl LeaderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field; blank input clears it.
    pub fn set(&mut self, field: LeaderField, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, trimmed.to_string());
        }
    }

    pub fn with(mut self, field: LeaderField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: LeaderField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn remove(&mut self, field: LeaderField) -> Option<String> {
        self.values.remove(&field)
    }

    pub fn set_document(&mut self, kind: DocumentKind, path: &DocumentPath) {
        self.set(kind.field(), path.as_str());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (LeaderField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Required fields of `role` that are still unset.
    pub fn missing(&self, role: LeaderRole) -> Vec<LeaderField> {
        required_fields(role)
            .iter()
            .copied()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// Build a draft from a JSON object keyed by wire field names.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| "appointment data must be a JSON object".to_string())?;

        let mut draft = Self::new();
        for (key, value) in object {
            let field = LeaderField::from_wire(key).ok_or_else(|| format!("unknown leader field '{}'", key))?;
            match value {
                Value::Null => {}
                Value::String(s) => draft.set(field, s.as_str()),
                Value::Number(n) => draft.set(field, n.to_string()),
                Value::Bool(b) => draft.set(field, b.to_string()),
                _ => return Err(format!("field '{}' must be a scalar", key)),
            }
        }
        Ok(draft)
    }
}

/// Identity, location and appointment data every role shares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nominee {
    pub incumbent: String,
    pub id_number: String,
    pub dateofbirth: NaiveDate,
    pub gender: String,
    pub dateofappointment: NaiveDate,
    pub status: AppointmentStatus,
    pub province: String,
    pub district: String,
    pub chieftainship: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiefAppointment {
    #[serde(flatten)]
    pub nominee: Nominee,
    pub recommendationsfromheadman: DocumentPath,
    #[serde(flatten)]
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadmanAppointment {
    #[serde(flatten)]
    pub nominee: Nominee,
    pub headmanship: String,
    pub recommendationsfromchief: DocumentPath,
    pub supporting_document_ddc: DocumentPath,
    #[serde(flatten)]
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VillageHeadAppointment {
    #[serde(flatten)]
    pub nominee: Nominee,
    pub headmanship: String,
    pub villagemanship: String,
    pub recommendationsfromchief: DocumentPath,
    pub recommendationsfromheadman: DocumentPath,
    pub supporting_document_ddc: DocumentPath,
    #[serde(flatten)]
    pub details: BTreeMap<String, String>,
}

/// A fully validated appointment, one variant per role.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Appointment {
    Chief(ChiefAppointment),
    Headman(HeadmanAppointment),
    VillageHead(VillageHeadAppointment),
}

struct Checked<'a> {
    draft: &'a LeaderDraft,
}

impl Checked<'_> {
    fn text(&self, field: LeaderField) -> String {
        self.draft.get(field).unwrap_or_default().to_string()
    }

    fn date(&self, field: LeaderField) -> Result<NaiveDate, ValidationError> {
        let raw = self.text(field);
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidValue {
            field: field.as_str().to_string(),
            value: raw,
        })
    }

    fn document(&self, kind: DocumentKind) -> Result<DocumentPath, ValidationError> {
        let raw = self.text(kind.field());
        DocumentPath::parse(raw.clone()).ok_or(ValidationError::InvalidValue {
            field: kind.wire_name().to_string(),
            value: raw,
        })
    }

    fn status(&self) -> Result<AppointmentStatus, ValidationError> {
        let raw = self.text(LeaderField::Status);
        raw.parse().map_err(|_| ValidationError::InvalidValue {
            field: LeaderField::Status.as_str().to_string(),
            value: raw,
        })
    }

    fn nominee(&self) -> Result<Nominee, ValidationError> {
        Ok(Nominee {
            incumbent: self.text(LeaderField::Incumbent),
            id_number: self.text(LeaderField::IdNumber),
            dateofbirth: self.date(LeaderField::DateOfBirth)?,
            gender: self.text(LeaderField::Gender),
            dateofappointment: self.date(LeaderField::DateOfAppointment)?,
            status: self.status()?,
            province: self.text(LeaderField::Province),
            district: self.text(LeaderField::District),
            chieftainship: self.text(LeaderField::Chieftainship),
        })
    }

    fn details(&self, role: LeaderRole) -> BTreeMap<String, String> {
        let required = required_fields(role);
        self.draft
            .iter()
            .filter(|(field, _)| !required.contains(field))
            .map(|(field, value)| (field.as_str().to_string(), value.to_string()))
            .collect()
    }
}

impl Appointment {
    /// Validate a draft against the role's required fields.
    ///
    /// Every missing field is reported at once, in form order.
    pub fn from_draft(role: LeaderRole, draft: &LeaderDraft) -> Result<Self, ValidationError> {
        let missing = draft.missing(role);
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(
                missing.iter().map(|f| f.as_str().to_string()).collect(),
            ));
        }

        let checked = Checked { draft };
        let nominee = checked.nominee()?;
        let details = checked.details(role);

        Ok(match role {
            LeaderRole::Chief => Appointment::Chief(ChiefAppointment {
                nominee,
                recommendationsfromheadman: checked.document(DocumentKind::RecommendationsFromHeadman)?,
                details,
            }),
            LeaderRole::Headman => Appointment::Headman(HeadmanAppointment {
                nominee,
                headmanship: checked.text(LeaderField::Headmanship),
                recommendationsfromchief: checked.document(DocumentKind::RecommendationsFromChief)?,
                supporting_document_ddc: checked.document(DocumentKind::SupportingDocumentDdc)?,
                details,
            }),
            LeaderRole::VillageHead => Appointment::VillageHead(VillageHeadAppointment {
                nominee,
                headmanship: checked.text(LeaderField::Headmanship),
                villagemanship: checked.text(LeaderField::Villagemanship),
                recommendationsfromchief: checked.document(DocumentKind::RecommendationsFromChief)?,
                recommendationsfromheadman: checked.document(DocumentKind::RecommendationsFromHeadman)?,
                supporting_document_ddc: checked.document(DocumentKind::SupportingDocumentDdc)?,
                details,
            }),
        })
    }

    pub fn role(&self) -> LeaderRole {
        match self {
            Appointment::Chief(_) => LeaderRole::Chief,
            Appointment::Headman(_) => LeaderRole::Headman,
            Appointment::VillageHead(_) => LeaderRole::VillageHead,
        }
    }

    pub fn nominee(&self) -> &Nominee {
        match self {
            Appointment::Chief(a) => &a.nominee,
            Appointment::Headman(a) => &a.nominee,
            Appointment::VillageHead(a) => &a.nominee,
        }
    }

    /// Request body for the appoint endpoint.
    pub fn to_body(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chief_draft() -> LeaderDraft {
        LeaderDraft::new()
            .with(LeaderField::Province, "masvingo")
            .with(LeaderField::Chieftainship, "Chivi")
            .with(LeaderField::District, "Chivi")
            .with(LeaderField::Status, "substantive")
            .with(LeaderField::Incumbent, "Tendai Moyo")
            .with(LeaderField::IdNumber, "80-123456-A-80")
            .with(LeaderField::DateOfBirth, "1970-03-01")
            .with(LeaderField::Gender, "Male")
            .with(LeaderField::DateOfAppointment, "2024-06-01")
            .with(LeaderField::RecommendationsFromHeadman, "/uploads/1-rec.pdf")
    }

    #[test]
    fn complete_chief_draft_validates() {
        let mut draft = chief_draft();
        draft.set(LeaderField::LastIncumbentName, "Samuel Moyo");

        let appointment = Appointment::from_draft(LeaderRole::Chief, &draft).unwrap();
        assert_eq!(appointment.role(), LeaderRole::Chief);

        let body = appointment.to_body();
        assert_eq!(body["status"], "SUBSTANTIVE");
        assert_eq!(body["dateofappointment"], "2024-06-01");
        assert_eq!(body["recommendationsfromheadman"], "/uploads/1-rec.pdf");
        assert_eq!(body["lastincumbentname"], "Samuel Moyo");
        assert!(body.get("headmanship").is_none());
    }

    #[test]
    fn every_missing_field_is_named() {
        let draft = LeaderDraft::new()
            .with(LeaderField::Incumbent, "Rudo")
            .with(LeaderField::Province, "midlands");

        let err = Appointment::from_draft(LeaderRole::VillageHead, &draft).unwrap_err();
        let ValidationError::MissingFields(missing) = &err else {
            panic!("expected missing fields, got {err:?}");
        };
        assert_eq!(missing.len(), required_fields(LeaderRole::VillageHead).len() - 2);
        for name in ["chieftainship", "headmanship", "villagemanship", "supporting_document_ddc"] {
            assert!(missing.iter().any(|m| m == name), "{name} not reported");
            assert!(err.to_string().contains(name));
        }
        assert!(!missing.iter().any(|m| m == "incumbent"));
    }

    #[test]
    fn headman_requires_its_own_jurisdiction() {
        let err = Appointment::from_draft(LeaderRole::Headman, &chief_draft()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "headmanship".into(),
                "recommendationsfromchief".into(),
                "supporting_document_ddc".into(),
            ])
        );
    }

    #[test]
    fn bad_status_and_dates_are_rejected() {
        let draft = chief_draft().with(LeaderField::Status, "retired");
        assert!(matches!(
            Appointment::from_draft(LeaderRole::Chief, &draft),
            Err(ValidationError::InvalidValue { field, .. }) if field == "status"
        ));

        let draft = chief_draft().with(LeaderField::DateOfBirth, "01/03/1970");
        assert!(matches!(
            Appointment::from_draft(LeaderRole::Chief, &draft),
            Err(ValidationError::InvalidValue { field, .. }) if field == "dateofbirth"
        ));
    }

    #[test]
    fn blank_values_clear_the_draft() {
        let mut draft = chief_draft();
        draft.set(LeaderField::Gender, "   ");
        assert_eq!(draft.missing(LeaderRole::Chief), vec![LeaderField::Gender]);
    }

    #[test]
    fn draft_from_json_rejects_unknown_keys() {
        let draft = LeaderDraft::from_json(&serde_json::json!({"incumbent": "A", "id_number": 123})).unwrap();
        assert_eq!(draft.get(LeaderField::IdNumber), Some("123"));
        assert!(LeaderDraft::from_json(&serde_json::json!({"nickname": "x"})).is_err());
        assert!(LeaderDraft::from_json(&serde_json::json!(["x"])).is_err());
    }
}
