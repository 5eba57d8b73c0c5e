use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named jurisdiction: chieftainship, headmanship or villageship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraditionalArea {
    #[serde(default, deserialize_with = "super::lenient::opt_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::opt_i64", skip_serializing_if = "Option::is_none")]
    pub villageship_id: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub villageship: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub headmanship: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub chieftainship: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub succession_custom: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::opt_i64", skip_serializing_if = "Option::is_none")]
    pub households: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaKind {
    Chieftainship,
    Headmanship,
    Villageship,
}

impl AreaKind {
    pub fn collection(&self) -> &'static str {
        match self {
            AreaKind::Chieftainship => "chieftainships",
            AreaKind::Headmanship => "headmanships",
            AreaKind::Villageship => "villageships",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AreaKind::Chieftainship => "Chieftainship",
            AreaKind::Headmanship => "Headmanship",
            AreaKind::Villageship => "Villageship",
        }
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AreaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chieftainship" | "chieftainships" => Ok(AreaKind::Chieftainship),
            "headmanship" | "headmanships" => Ok(AreaKind::Headmanship),
            "villageship" | "villageships" | "village" | "villages" => Ok(AreaKind::Villageship),
            _ => Err(format!("unknown area kind '{}'", s)),
        }
    }
}

impl TraditionalArea {
    /// Display name: the explicit `name` if set, otherwise the kind's own field.
    pub fn display_name(&self, kind: AreaKind) -> &str {
        let own = match kind {
            AreaKind::Chieftainship => self.chieftainship.as_deref(),
            AreaKind::Headmanship => self.headmanship.as_deref(),
            AreaKind::Villageship => self.villageship.as_deref(),
        };
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(own)
            .unwrap_or("")
    }
}
