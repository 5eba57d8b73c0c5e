use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{ApiClient, Attachment, ClientError, RelayClient};
use crate::models::{DocumentKind, DocumentPath, LeaderDraft, LeaderField, LeaderRole, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Location = 1,
    Incumbent = 2,
    PreviousIncumbent = 3,
    Documents = 4,
}

impl Step {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Location => "Location & Basic Info",
            Step::Incumbent => "Incumbent Info",
            Step::PreviousIncumbent => "Previous Incumbent",
            Step::Documents => "Additional Info",
        }
    }

    fn next(&self) -> Option<Step> {
        match self {
            Step::Location => Some(Step::Incumbent),
            Step::Incumbent => Some(Step::PreviousIncumbent),
            Step::PreviousIncumbent => Some(Step::Documents),
            Step::Documents => None,
        }
    }

    fn previous(&self) -> Option<Step> {
        match self {
            Step::Location => None,
            Step::Incumbent => Some(Step::Location),
            Step::PreviousIncumbent => Some(Step::Incumbent),
            Step::Documents => Some(Step::PreviousIncumbent),
        }
    }

    /// Text inputs shown on this step for `role`. Document slots are
    /// attachments and not listed here.
    pub fn inputs(&self, role: LeaderRole) -> Vec<StepInput> {
        use LeaderField::*;
        match self {
            Step::Location => {
                let mut inputs = vec![StepInput::required(Province), StepInput::required(Chieftainship)];
                if role != LeaderRole::Chief {
                    inputs.push(StepInput::required(Headmanship));
                }
                if role == LeaderRole::VillageHead {
                    inputs.push(StepInput::required(Villagemanship));
                }
                inputs.push(StepInput::required(District));
                inputs.push(StepInput::required(Status));
                inputs
            }
            Step::Incumbent => vec![
                StepInput::required(Incumbent),
                StepInput::required(IdNumber),
                StepInput::required(DateOfBirth),
                StepInput::required(Gender),
                StepInput::required(DateOfAppointment),
                StepInput::optional(Spouses),
            ],
            Step::PreviousIncumbent => vec![
                StepInput::required(LastIncumbentName),
                StepInput::required(LastIncumbentIdNumber),
                StepInput::required(RelationshipToLastIncumbent),
                StepInput::required(DateOfVacancy),
                StepInput::required(ReasonOfVacancy),
            ],
            Step::Documents => vec![
                StepInput::optional(PersonalAttributes),
                StepInput::optional(Disagreements),
                StepInput::optional(OtherInfo),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInput {
    pub field: LeaderField,
    pub required: bool,
}

impl StepInput {
    fn required(field: LeaderField) -> Self {
        Self { field, required: true }
    }

    fn optional(field: LeaderField) -> Self {
        Self { field, required: false }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("An appointment is already being submitted")]
    InProgress,

    #[error("Appointments are submitted from step 4, not step {}", .0.number())]
    NotAtDocuments(Step),

    /// Upload or appoint failed. Documents stored before the failure are
    /// listed so they can be traced; nothing removes them.
    #[error("{source}")]
    Failed {
        #[source]
        source: ClientError,
        orphaned_documents: Vec<DocumentPath>,
    },
}

impl SubmitError {
    pub fn orphaned_documents(&self) -> &[DocumentPath] {
        match self {
            SubmitError::Failed { orphaned_documents, .. } => orphaned_documents,
            _ => &[],
        }
    }
}

impl From<ClientError> for SubmitError {
    fn from(source: ClientError) -> Self {
        SubmitError::Failed {
            source,
            orphaned_documents: Vec::new(),
        }
    }
}

/// Four-step appointment form for one role.
///
/// Documents are uploaded through the relay first; the appointment is only
/// sent once every upload has returned its path.
#[derive(Debug)]
pub struct AppointmentWizard {
    role: LeaderRole,
    step: Step,
    draft: LeaderDraft,
    attachments: BTreeMap<DocumentKind, Attachment>,
    error: Option<String>,
    submitting: bool,
    open: bool,
}

impl AppointmentWizard {
    pub fn new(role: LeaderRole) -> Self {
        Self {
            role,
            step: Step::Location,
            draft: LeaderDraft::new(),
            attachments: BTreeMap::new(),
            error: None,
            submitting: false,
            open: true,
        }
    }

    pub fn role(&self) -> LeaderRole {
        self.role
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &LeaderDraft {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set(&mut self, field: LeaderField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Attach a file to one of the role's document slots.
    pub fn attach(&mut self, kind: DocumentKind, file: Attachment) -> Result<(), ValidationError> {
        if !self.role.document_slots().contains(&kind) {
            return Err(ValidationError::InvalidValue {
                field: kind.wire_name().to_string(),
                value: file.file_name,
            });
        }
        self.attachments.insert(kind, file);
        Ok(())
    }

    /// Required inputs of the current step that are still blank.
    pub fn step_missing(&self) -> Vec<LeaderField> {
        self.step
            .inputs(self.role)
            .into_iter()
            .filter(|input| input.required && self.draft.get(input.field).is_none())
            .map(|input| input.field)
            .collect()
    }

    /// Advance one step once the current step's required inputs are filled.
    /// At the last step this stays put.
    pub fn next(&mut self) -> Result<Step, ValidationError> {
        let missing = self.step_missing();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(
                missing.iter().map(|f| f.as_str().to_string()).collect(),
            ));
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn previous(&mut self) -> Step {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Fields (documents included) that would block submission.
    pub fn missing_for_submit(&self) -> Vec<LeaderField> {
        self.draft
            .missing(self.role)
            .into_iter()
            .filter(|field| match field.document_kind() {
                Some(kind) => !self.attachments.contains_key(&kind),
                None => true,
            })
            .collect()
    }

    /// Upload the documents, then send the appointment.
    ///
    /// On success the wizard resets and closes. On failure it stays open on
    /// the documents step with the error message set.
    pub async fn submit(&mut self, relay: &RelayClient, api: &ApiClient) -> Result<Value, SubmitError> {
        if self.submitting {
            return Err(SubmitError::InProgress);
        }
        if self.step != Step::Documents {
            return Err(SubmitError::NotAtDocuments(self.step));
        }

        let missing = self.missing_for_submit();
        if !missing.is_empty() {
            let err = SubmitError::from(ClientError::MissingFields(
                missing.iter().map(|f| f.as_str().to_string()).collect(),
            ));
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.submitting = true;
        self.error = None;
        let result = self.upload_and_appoint(relay, api).await;
        self.submitting = false;

        match result {
            Ok(created) => {
                info!("{} appointment submitted", self.role);
                self.reset();
                self.open = false;
                Ok(created)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn upload_and_appoint(&self, relay: &RelayClient, api: &ApiClient) -> Result<Value, SubmitError> {
        let paths = self.upload_documents(relay).await?;

        let mut draft = self.draft.clone();
        for (kind, path) in &paths {
            draft.set_document(*kind, path);
        }

        api.appoint(&draft, self.role).await.map_err(|source| {
            let orphaned_documents: Vec<DocumentPath> = paths.into_values().collect();
            if !orphaned_documents.is_empty() {
                warn!(
                    "Appointment failed after uploading {} document(s): {:?}",
                    orphaned_documents.len(),
                    orphaned_documents
                );
            }
            SubmitError::Failed {
                source,
                orphaned_documents,
            }
        })
    }

    async fn upload_documents(&self, relay: &RelayClient) -> Result<BTreeMap<DocumentKind, DocumentPath>, ClientError> {
        let file = |kind: DocumentKind| self.attachments.get(&kind);
        match self.role {
            LeaderRole::Chief => {
                let mut paths = BTreeMap::new();
                if let Some(doc) = file(DocumentKind::RecommendationsFromHeadman) {
                    paths.insert(DocumentKind::RecommendationsFromHeadman, relay.upload(doc).await?);
                }
                Ok(paths)
            }
            LeaderRole::Headman => {
                relay
                    .upload_headman_documents(
                        file(DocumentKind::RecommendationsFromChief),
                        file(DocumentKind::SupportingDocumentDdc),
                    )
                    .await
            }
            LeaderRole::VillageHead => {
                relay
                    .upload_villagehead_documents(
                        file(DocumentKind::RecommendationsFromChief),
                        file(DocumentKind::RecommendationsFromHeadman),
                        file(DocumentKind::SupportingDocumentDdc),
                    )
                    .await
            }
        }
    }

    /// Dismiss the form, discarding everything entered.
    pub fn close(&mut self) {
        self.reset();
        self.submitting = false;
        self.open = false;
    }

    fn reset(&mut self) {
        self.step = Step::Location;
        self.draft.clear();
        self.attachments.clear();
        self.error = None;
    }
}
