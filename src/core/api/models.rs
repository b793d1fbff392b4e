//! Wire types for the festival REST API.
//!
//! Field names follow the server's JSON (`snake_case`). Unknown fields in
//! responses are ignored so the client keeps working when the server adds
//! columns.

use serde::{Deserialize, Deserializer, Serialize};

pub type GroupId = u64;
pub type CategoryId = u64;
pub type EventId = u64;
pub type ContestantId = u64;

// ============================================================================
// Reference lists
// ============================================================================

/// A school/department that contestants compete for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

/// An eligibility category, e.g. "Category A (UG)".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// An event a contestant may register for, as returned by
/// `events-for-registration/{category}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleEvent {
    pub id: EventId,
    pub name: String,
}

/// An entry of the full event catalog (`events/`).
///
/// Older server builds send the owning category as `category` (its name),
/// newer ones as a `categories` list of names. Both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Event {
    /// Whether this event is listed under the category with the given name.
    pub fn belongs_to(&self, category_name: &str) -> bool {
        self.category.as_deref() == Some(category_name)
            || self.categories.iter().any(|c| c == category_name)
    }
}

// ============================================================================
// Registration writes
// ============================================================================

/// Body of `POST contestants/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContestant {
    pub full_name: String,
    pub email: String,
    pub state: String,
    pub gender: String,
    pub group: GroupId,
    pub category: CategoryId,
    pub course: String,
    pub phone_number: String,
}

/// A created contestant. Only the id is needed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contestant {
    pub id: ContestantId,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Body of `POST registrations/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRegistration {
    pub contestant: ContestantId,
    pub event: EventId,
}

/// A created contestant↔event link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: u64,
    pub contestant: ContestantId,
    pub event: EventId,
}

// ============================================================================
// Display data
// ============================================================================

/// Aggregated points for one group (`points/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPoints {
    pub group_name: String,
    /// Groups without any scored result come back as `null`.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_points: u64,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

/// A generated winners poster (`generate-event-posters/{event}/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poster {
    /// Template name the poster was rendered from, e.g. `template_black.png`.
    pub id: String,
    pub url: String,
}

impl Poster {
    /// File name used when saving the poster locally.
    pub fn file_name(&self) -> String {
        let stem = self
            .id
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.id);
        format!("result-poster-{stem}.png")
    }
}

/// A gallery photo (`gallery/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: u64,
    /// Absolute image URL. Missing when the upload never reached storage.
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
    pub caption: String,
    pub year: i32,
}

impl GalleryImage {
    /// File name used when saving the photo locally.
    pub fn file_name(&self) -> String {
        let safe: String = self
            .caption
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        if safe.is_empty() {
            format!("gallery-{}.png", self.id)
        } else {
            format!("{safe}.png")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accepts_single_category() {
        let event: Event =
            serde_json::from_str(r#"{"id": 3, "name": "Poetry", "category": "Category A"}"#)
                .unwrap();
        assert!(event.belongs_to("Category A"));
        assert!(!event.belongs_to("Category B"));
    }

    #[test]
    fn test_event_accepts_category_list() {
        let event: Event = serde_json::from_str(
            r#"{"id": 3, "name": "Quiz", "categories": ["Category A", "Girls"]}"#,
        )
        .unwrap();
        assert!(event.belongs_to("Girls"));
        assert!(event.category.is_none());
    }

    #[test]
    fn test_new_contestant_wire_names() {
        let body = NewContestant {
            full_name: "A".into(),
            email: "a@b.com".into(),
            state: "X".into(),
            gender: "Male".into(),
            group: 1,
            category: 2,
            course: "C".into(),
            phone_number: "123".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["full_name"], "A");
        assert_eq!(json["phone_number"], "123");
        assert_eq!(json["group"], 1);
        assert_eq!(json["category"], 2);
    }

    #[test]
    fn test_contestant_ignores_extra_fields() {
        let created: Contestant = serde_json::from_str(
            r#"{"id": 41, "full_name": "A", "email": "a@b.com", "course": "C"}"#,
        )
        .unwrap();
        assert_eq!(created.id, 41);
    }

    #[test]
    fn test_team_points_defaults_missing_total() {
        let team: TeamPoints = serde_json::from_str(r#"{"group_name": "School of Law"}"#).unwrap();
        assert_eq!(team.total_points, 0);
    }

    #[test]
    fn test_team_points_null_total_is_zero() {
        let team: TeamPoints =
            serde_json::from_str(r#"{"group_name": "School of Law", "total_points": null}"#)
                .unwrap();
        assert_eq!(team.total_points, 0);
    }

    #[test]
    fn test_gallery_image_url_alias() {
        let image: GalleryImage = serde_json::from_str(
            r#"{"id": 1, "image_url": "https://cdn/x.jpg", "caption": "Opening Day", "year": 2025}"#,
        )
        .unwrap();
        assert_eq!(image.image.as_deref(), Some("https://cdn/x.jpg"));
        assert_eq!(image.file_name(), "Opening_Day.png");
    }

    #[test]
    fn test_poster_file_name() {
        let poster = Poster {
            id: "template_pink.png".into(),
            url: "http://x/media/event_4_template_pink.png".into(),
        };
        assert_eq!(poster.file_name(), "result-poster-template_pink.png");
    }
}
