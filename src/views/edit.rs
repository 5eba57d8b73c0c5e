use serde_json::{Map, Value};
use tracing::{error, info};

use crate::client::{ApiClient, Attachment, ClientError, ClientResult, RelayClient};
use crate::models::{LeaderField, LeaderRole, TraditionalLeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown after a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// New value for the field being edited.
#[derive(Debug, Clone)]
pub enum EditValue {
    Text(String),
    File(Attachment),
}

/// Per-record edit dialog. At most one field is in edit mode at a time.
#[derive(Debug, Clone)]
pub struct EditModal {
    role: LeaderRole,
    id: String,
    record: TraditionalLeader,
    editing: Option<LeaderField>,
    open: bool,
}

impl EditModal {
    /// `None` when the record has no id for `role`.
    pub fn open(role: LeaderRole, record: TraditionalLeader) -> Option<Self> {
        let id = record.record_id(role)?.to_string();
        Some(Self {
            role,
            id,
            record,
            editing: None,
            open: true,
        })
    }

    pub fn record(&self) -> &TraditionalLeader {
        &self.record
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn editing(&self) -> Option<LeaderField> {
        self.editing
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Put `field` in edit mode; any other field leaves edit mode.
    pub fn begin(&mut self, field: LeaderField) {
        self.editing = Some(field);
    }

    pub fn cancel(&mut self) {
        self.editing = None;
    }

    pub fn close(&mut self) {
        self.editing = None;
        self.open = false;
    }

    /// Save the field in edit mode.
    ///
    /// Text fields send exactly `{field: value}`. Document fields upload the
    /// replacement through the relay (naming the old path for removal) and
    /// then store the new path; they refuse text values. Success closes the dialog; failure keeps it
    /// open. Edit mode ends either way.
    pub async fn save(&mut self, api: &ApiClient, relay: &RelayClient, value: EditValue) -> Notice {
        let Some(field) = self.editing.take() else {
            return Notice::error("Select a field to edit first");
        };

        match self.persist(api, relay, field, value).await {
            Ok(stored) => {
                info!("Updated {} of {} {}", field, self.role, self.id);
                self.record.set(field, Some(stored));
                self.open = false;
                Notice::success(format!("{} updated successfully", field.as_str().to_lowercase()))
            }
            Err(e) => {
                error!("Error saving field {}: {}", field, e);
                Notice::error("Failed to update field. Please try again.")
            }
        }
    }

    async fn persist(
        &self,
        api: &ApiClient,
        relay: &RelayClient,
        field: LeaderField,
        value: EditValue,
    ) -> ClientResult<String> {
        match (field.document_kind(), value) {
            (Some(kind), EditValue::File(file)) => {
                let paths = api
                    .update_files(relay, self.role, &self.id, &self.record, &[(kind, file)])
                    .await?;
                let mut changes = Map::new();
                let path = paths.get(&kind).map(|p| p.to_string()).unwrap_or_default();
                changes.insert(field.as_str().to_string(), Value::String(path.clone()));
                api.update_leader(self.role, &self.id, &changes).await?;
                Ok(path)
            }
            // Document fields only ever hold paths the relay handed back
            (Some(_), EditValue::Text(text)) => Err(ClientError::InvalidValue {
                field: field.as_str().to_string(),
                value: text,
            }),
            (None, EditValue::Text(text)) => {
                api.update_field(self.role, &self.id, field, &text).await?;
                Ok(text)
            }
            (None, EditValue::File(file)) => Err(ClientError::InvalidValue {
                field: field.as_str().to_string(),
                value: file.file_name,
            }),
        }
    }
}
