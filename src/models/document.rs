use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::leader::LeaderField;

/// Document slots a leader record can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentKind {
    Picture,
    RecommendationsFromHeadman,
    RecommendationsFromChief,
    SupportingDocumentDdc,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Picture,
        DocumentKind::RecommendationsFromHeadman,
        DocumentKind::RecommendationsFromChief,
        DocumentKind::SupportingDocumentDdc,
    ];

    pub fn field(&self) -> LeaderField {
        match self {
            DocumentKind::Picture => LeaderField::Picture,
            DocumentKind::RecommendationsFromHeadman => LeaderField::RecommendationsFromHeadman,
            DocumentKind::RecommendationsFromChief => LeaderField::RecommendationsFromChief,
            DocumentKind::SupportingDocumentDdc => LeaderField::SupportingDocumentDdc,
        }
    }

    /// Multipart field name, also the `fileType` sent on replacement.
    pub fn wire_name(&self) -> &'static str {
        self.field().as_str()
    }

    /// Prefix the relay puts in front of the original file name when the
    /// document arrives through a role upload.
    pub fn relay_prefix(&self) -> Option<&'static str> {
        match self {
            DocumentKind::Picture => None,
            DocumentKind::RecommendationsFromHeadman => Some("headman"),
            DocumentKind::RecommendationsFromChief => Some("chief"),
            DocumentKind::SupportingDocumentDdc => Some("ddc"),
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.wire_name() == name)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "picture" | "photo" => Ok(DocumentKind::Picture),
            "headman" => Ok(DocumentKind::RecommendationsFromHeadman),
            "chief" => Ok(DocumentKind::RecommendationsFromChief),
            "ddc" => Ok(DocumentKind::SupportingDocumentDdc),
            other => DocumentKind::from_wire(other).ok_or_else(|| format!("unknown document kind '{}'", s)),
        }
    }
}

/// A server-relative path returned by the upload relay.
///
/// Never empty and never a URL or local handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains("://") {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DocumentPath::parse(value.clone()).ok_or_else(|| format!("'{}' is not a relay document path", value))
    }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self {
        path.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
