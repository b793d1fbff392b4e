//! In-progress registration form state.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::api::{CategoryId, EventId, GroupId, NewContestant};

/// Contestant gender as accepted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every input of the form, used to report which ones are missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftField {
    FullName,
    Email,
    State,
    Gender,
    Group,
    Category,
    Course,
    PhoneNumber,
}

impl DraftField {
    /// Fields required before leaving the personal-details step, in form order.
    pub const PERSONAL: [DraftField; 7] = [
        DraftField::FullName,
        DraftField::Email,
        DraftField::State,
        DraftField::Gender,
        DraftField::Group,
        DraftField::Course,
        DraftField::PhoneNumber,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::FullName => "Full Name",
            DraftField::Email => "Email",
            DraftField::State => "State",
            DraftField::Gender => "Gender",
            DraftField::Group => "School of Studies",
            DraftField::Category => "Your Category",
            DraftField::Course => "Course",
            DraftField::PhoneNumber => "Phone Number",
        }
    }

    /// Whether the field is free text (as opposed to a choice).
    pub fn is_text(self) -> bool {
        matches!(
            self,
            DraftField::FullName
                | DraftField::Email
                | DraftField::State
                | DraftField::Course
                | DraftField::PhoneNumber
        )
    }
}

/// The registration form as typed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub full_name: String,
    pub email: String,
    pub state: String,
    pub gender: Option<Gender>,
    pub group_id: Option<GroupId>,
    pub category_id: Option<CategoryId>,
    pub course: String,
    pub phone_number: String,
    /// Selected competitions. Always a subset of the loaded eligible events.
    pub events: BTreeSet<EventId>,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of a free-text field. Choice fields return `None`.
    pub fn text(&self, field: DraftField) -> Option<&str> {
        match field {
            DraftField::FullName => Some(&self.full_name),
            DraftField::Email => Some(&self.email),
            DraftField::State => Some(&self.state),
            DraftField::Course => Some(&self.course),
            DraftField::PhoneNumber => Some(&self.phone_number),
            DraftField::Gender | DraftField::Group | DraftField::Category => None,
        }
    }

    /// Overwrite a free-text field. Choice fields are ignored.
    pub fn set_text(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::FullName => &mut self.full_name,
            DraftField::Email => &mut self.email,
            DraftField::State => &mut self.state,
            DraftField::Course => &mut self.course,
            DraftField::PhoneNumber => &mut self.phone_number,
            DraftField::Gender | DraftField::Group | DraftField::Category => return,
        };
        *slot = value.into();
    }

    pub fn is_filled(&self, field: DraftField) -> bool {
        match field {
            DraftField::Gender => self.gender.is_some(),
            DraftField::Group => self.group_id.is_some(),
            DraftField::Category => self.category_id.is_some(),
            text => self
                .text(text)
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false),
        }
    }

    /// Required personal fields that are still empty, in form order.
    pub fn missing_personal_fields(&self) -> Vec<DraftField> {
        DraftField::PERSONAL
            .into_iter()
            .filter(|field| !self.is_filled(*field))
            .collect()
    }

    /// Build the `POST contestants/` body, or list what is missing.
    pub fn to_contestant(&self) -> Result<NewContestant, Vec<DraftField>> {
        let mut missing = self.missing_personal_fields();
        if self.category_id.is_none() {
            missing.push(DraftField::Category);
        }

        match (self.gender, self.group_id, self.category_id) {
            (Some(gender), Some(group), Some(category)) if missing.is_empty() => {
                Ok(NewContestant {
                    full_name: self.full_name.trim().to_string(),
                    email: self.email.trim().to_string(),
                    state: self.state.trim().to_string(),
                    gender: gender.as_str().to_string(),
                    group,
                    category,
                    course: self.course.trim().to_string(),
                    phone_number: self.phone_number.trim().to_string(),
                })
            }
            _ => Err(missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RegistrationDraft {
        RegistrationDraft {
            full_name: "A".into(),
            email: "a@b.com".into(),
            state: "X".into(),
            gender: Some(Gender::Male),
            group_id: Some(1),
            category_id: Some(2),
            course: "C".into(),
            phone_number: "123".into(),
            events: BTreeSet::new(),
        }
    }

    #[test]
    fn test_empty_draft_misses_all_personal_fields() {
        let draft = RegistrationDraft::new();
        assert_eq!(draft.missing_personal_fields(), DraftField::PERSONAL.to_vec());
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let mut draft = filled();
        draft.set_text(DraftField::Course, "   ");
        assert_eq!(draft.missing_personal_fields(), vec![DraftField::Course]);
    }

    #[test]
    fn test_set_text_ignores_choice_fields() {
        let mut draft = RegistrationDraft::new();
        draft.set_text(DraftField::Gender, "Male");
        assert!(draft.gender.is_none());
        assert_eq!(draft.text(DraftField::Gender), None);
    }

    #[test]
    fn test_to_contestant_trims_and_maps() {
        let mut draft = filled();
        draft.set_text(DraftField::FullName, "  Asha  ");
        let body = draft.to_contestant().unwrap();
        assert_eq!(body.full_name, "Asha");
        assert_eq!(body.gender, "Male");
        assert_eq!(body.group, 1);
        assert_eq!(body.category, 2);
    }

    #[test]
    fn test_to_contestant_requires_category() {
        let mut draft = filled();
        draft.category_id = None;
        assert_eq!(draft.to_contestant(), Err(vec![DraftField::Category]));
    }
}
