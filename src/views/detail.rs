use serde::Serialize;

use crate::models::{LeaderField, LeaderRole, TraditionalLeader};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSection {
    pub title: &'static str,
    /// (label, value) pairs; unset values are shown as "N/A".
    pub rows: Vec<(&'static str, String)>,
}

/// Read-only grouping of a leader record for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub heading: String,
    pub sections: Vec<DetailSection>,
}

const NOT_SET: &str = "N/A";

impl DetailView {
    pub fn new(role: LeaderRole, leader: &TraditionalLeader) -> Self {
        use LeaderField::*;

        let mut jurisdiction = vec![Province, District];
        jurisdiction.extend_from_slice(role.jurisdiction_fields());

        let groups: Vec<(&'static str, Vec<LeaderField>)> = vec![
            ("Identity", vec![role.id_field(), Incumbent, IdNumber, Gender, DateOfBirth, Mutupo, EcNumber]),
            ("Jurisdiction", jurisdiction),
            ("Appointment", vec![Status, DateOfAppointment, AppointedBy, DateOfIssue, DateOfDeathOrRemoval]),
            (
                "Succession",
                vec![
                    LastIncumbentName,
                    LastIncumbentIdNumber,
                    RelationshipToLastIncumbent,
                    DateOfVacancy,
                    ReasonOfVacancy,
                ],
            ),
            (
                "Banking & Contact",
                vec![Bank, AccountNumber, ContactNumber, PhysicalAddress, CarRegNo, NextOfKin],
            ),
            ("Family", vec![Spouses, Offspring]),
            ("Notes", vec![PersonalAttributes, Disagreements, OtherInfo]),
            (
                "Documents",
                std::iter::once(Picture)
                    .chain(role.document_slots().iter().map(|kind| kind.field()))
                    .collect(),
            ),
        ];

        let sections = groups
            .into_iter()
            .map(|(title, fields)| DetailSection {
                title,
                rows: fields
                    .into_iter()
                    .map(|field| (field.label(), leader.get(field).unwrap_or(NOT_SET).to_string()))
                    .collect(),
            })
            .collect();

        let heading = match leader.jurisdiction(role) {
            Some(place) => format!("{} {} ({})", role.label(), leader.incumbent, place),
            None => format!("{} {}", role.label(), leader.incumbent),
        };

        Self { heading, sections }
    }

    pub fn section(&self, title: &str) -> Option<&DetailSection> {
        self.sections.iter().find(|section| section.title == title)
    }
}
