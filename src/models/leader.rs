use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::document::DocumentKind;

/// The three traditional-authority roles a leader record can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderRole {
    Chief,
    Headman,
    VillageHead,
}

impl LeaderRole {
    pub const ALL: [LeaderRole; 3] = [LeaderRole::Chief, LeaderRole::Headman, LeaderRole::VillageHead];

    /// Collection path on the remote API (list, by-id and update).
    ///
    /// Headmen live under the singular `/headman`; the plural route is not
    /// served for reads.
    pub fn collection(&self) -> &'static str {
        match self {
            LeaderRole::Chief => "chiefs",
            LeaderRole::Headman => "headman",
            LeaderRole::VillageHead => "villageheads",
        }
    }

    pub fn appoint_path(&self) -> &'static str {
        match self {
            LeaderRole::Chief => "appoint/chiefs",
            LeaderRole::Headman => "appoint/headman",
            LeaderRole::VillageHead => "appoint/villagehead",
        }
    }

    /// Which identifier field carries this role's record id.
    pub fn id_field(&self) -> LeaderField {
        match self {
            LeaderRole::Chief => LeaderField::ChiefId,
            LeaderRole::Headman => LeaderField::HeadmanId,
            LeaderRole::VillageHead => LeaderField::VillageheadId,
        }
    }

    /// Jurisdiction fields that are meaningful for the role, outermost first.
    pub fn jurisdiction_fields(&self) -> &'static [LeaderField] {
        match self {
            LeaderRole::Chief => &[LeaderField::Chieftainship],
            LeaderRole::Headman => &[LeaderField::Chieftainship, LeaderField::Headmanship],
            LeaderRole::VillageHead => &[
                LeaderField::Chieftainship,
                LeaderField::Headmanship,
                LeaderField::Villagemanship,
            ],
        }
    }

    /// Documents collected when appointing a leader of this role.
    pub fn document_slots(&self) -> &'static [DocumentKind] {
        match self {
            LeaderRole::Chief => &[DocumentKind::RecommendationsFromHeadman],
            LeaderRole::Headman => &[
                DocumentKind::RecommendationsFromChief,
                DocumentKind::SupportingDocumentDdc,
            ],
            LeaderRole::VillageHead => &[
                DocumentKind::RecommendationsFromChief,
                DocumentKind::RecommendationsFromHeadman,
                DocumentKind::SupportingDocumentDdc,
            ],
        }
    }

    /// Fields matched by the list view's free-text search.
    pub fn search_fields(&self) -> &'static [LeaderField] {
        match self {
            LeaderRole::Chief => &[LeaderField::Chieftainship],
            LeaderRole::Headman => &[LeaderField::Incumbent, LeaderField::Headmanship],
            LeaderRole::VillageHead => &[LeaderField::Incumbent, LeaderField::Villageship],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeaderRole::Chief => "Chief",
            LeaderRole::Headman => "Headman",
            LeaderRole::VillageHead => "Village Head",
        }
    }

    pub fn plural_label(&self) -> &'static str {
        match self {
            LeaderRole::Chief => "Chiefs",
            LeaderRole::Headman => "Headmen",
            LeaderRole::VillageHead => "Village Heads",
        }
    }
}

impl fmt::Display for LeaderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeaderRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "chief" | "chiefs" => Ok(LeaderRole::Chief),
            "headman" | "headmen" => Ok(LeaderRole::Headman),
            "villagehead" | "villageheads" => Ok(LeaderRole::VillageHead),
            _ => Err(format!("unknown leader role '{}'", s)),
        }
    }
}

macro_rules! leader_fields {
    (
        required { $($req:ident : $req_variant:ident => $req_label:literal),* $(,)? }
        optional { $($opt:ident : $opt_variant:ident => $opt_label:literal),* $(,)? }
    ) => {
        /// Wire shape of a leader record as the remote API sends and accepts it.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct TraditionalLeader {
            #[serde(default, deserialize_with = "super::lenient::opt_i64", skip_serializing_if = "Option::is_none")]
            pub id: Option<i64>,
            #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
            pub leader_id: Option<String>,
            #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
            pub leader_type: Option<LeaderRole>,
            $(
                #[serde(default, deserialize_with = "super::lenient::string")]
                pub $req: String,
            )*
            $(
                #[serde(default, deserialize_with = "super::lenient::opt_string", skip_serializing_if = "Option::is_none")]
                pub $opt: Option<String>,
            )*
        }

        /// A single named attribute of a leader record.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum LeaderField {
            $($req_variant,)*
            $($opt_variant,)*
        }

        impl LeaderField {
            pub const ALL: &'static [LeaderField] = &[
                $(LeaderField::$req_variant,)*
                $(LeaderField::$opt_variant,)*
            ];

            /// Field name on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(LeaderField::$req_variant => stringify!($req),)*
                    $(LeaderField::$opt_variant => stringify!($opt),)*
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $(LeaderField::$req_variant => $req_label,)*
                    $(LeaderField::$opt_variant => $opt_label,)*
                }
            }

            pub fn from_wire(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($req) => Some(LeaderField::$req_variant),)*
                    $(stringify!($opt) => Some(LeaderField::$opt_variant),)*
                    _ => None,
                }
            }
        }

        impl TraditionalLeader {
            /// Current value of a field, `None` when unset or blank.
            pub fn get(&self, field: LeaderField) -> Option<&str> {
                let value = match field {
                    $(LeaderField::$req_variant => Some(self.$req.as_str()),)*
                    $(LeaderField::$opt_variant => self.$opt.as_deref(),)*
                };
                value.filter(|v| !v.trim().is_empty())
            }

            /// Overwrite a field locally, e.g. after a successful save.
            pub fn set(&mut self, field: LeaderField, value: Option<String>) {
                match field {
                    $(LeaderField::$req_variant => self.$req = value.unwrap_or_default(),)*
                    $(LeaderField::$opt_variant => self.$opt = value,)*
                }
            }
        }
    };
}

leader_fields! {
    required {
        incumbent: Incumbent => "Incumbent Name",
        district: District => "District",
        province: Province => "Province",
    }
    optional {
        chief_id: ChiefId => "Chief ID",
        headman_id: HeadmanId => "Headman ID",
        villagehead_id: VillageheadId => "Village Head ID",
        id_number: IdNumber => "ID Number",
        chieftainship: Chieftainship => "Chieftainship",
        headmanship: Headmanship => "Headmanship",
        villageship: Villageship => "Villageship",
        villagemanship: Villagemanship => "Village Name",
        mutupo: Mutupo => "Mutupo",
        ecnumber: EcNumber => "EC Number",
        gender: Gender => "Gender",
        dateofbirth: DateOfBirth => "Date of Birth",
        dateofappointment: DateOfAppointment => "Date of Appointment",
        status: Status => "Appointment Status",
        bank: Bank => "Bank",
        accountnumber: AccountNumber => "Account Number",
        contactnumber: ContactNumber => "Contact Number",
        nextofkin: NextOfKin => "Next of Kin",
        biosignature: Biosignature => "Biosignature",
        picture: Picture => "Picture",
        spouses: Spouses => "Spouses",
        offspring: Offspring => "Offspring",
        car_reg_no: CarRegNo => "Car Registration Number",
        dateofissue: DateOfIssue => "Date of Issue",
        dateofdeathorremoval: DateOfDeathOrRemoval => "Date of Death or Removal",
        physicalladdress: PhysicalAddress => "Physical Address",
        relationshiptolastincumbent: RelationshipToLastIncumbent => "Relationship to Last Incumbent",
        lastincumbentname: LastIncumbentName => "Last Incumbent Name",
        lastincumbentidnumber: LastIncumbentIdNumber => "Last Incumbent ID Number",
        dateofvacancy: DateOfVacancy => "Date of Vacancy",
        reasonofvacancy: ReasonOfVacancy => "Reason for Vacancy",
        personalattributesandqualifications: PersonalAttributes => "Personal Attributes and Qualifications",
        disagreements: Disagreements => "Disagreements",
        otherinfo: OtherInfo => "Additional Information",
        recommendationsfromheadman: RecommendationsFromHeadman => "Recommendations from Headman",
        recommendationsfromchief: RecommendationsFromChief => "Recommendations from Chief",
        supporting_document_ddc: SupportingDocumentDdc => "Supporting Document (DDC)",
        appointed_by: AppointedBy => "Appointed By",
    }
}

impl LeaderField {
    /// Document-valued fields hold relay paths and are edited by upload.
    pub fn document_kind(&self) -> Option<DocumentKind> {
        DocumentKind::ALL.iter().copied().find(|kind| kind.field() == *self)
    }
}

impl fmt::Display for LeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeaderField::from_wire(s.trim()).ok_or_else(|| format!("unknown leader field '{}'", s))
    }
}

impl TraditionalLeader {
    /// Identifier for this record under its role (`chief_id` etc).
    pub fn record_id(&self, role: LeaderRole) -> Option<&str> {
        self.get(role.id_field())
    }

    /// Role as tagged by the server, or inferred from the populated id field.
    pub fn role(&self) -> Option<LeaderRole> {
        if let Some(role) = self.leader_type {
            return Some(role);
        }
        LeaderRole::ALL
            .iter()
            .copied()
            .find(|role| self.record_id(*role).is_some())
    }

    /// Innermost jurisdiction name for the role.
    pub fn jurisdiction(&self, role: LeaderRole) -> Option<&str> {
        role.jurisdiction_fields()
            .iter()
            .rev()
            .find_map(|field| self.get(*field))
    }
}
