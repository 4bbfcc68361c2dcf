//! Entry domain models: one submitted improvement idea.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::user::UserInfo;

/// Estimated implementation effort for an entry.
///
/// Lower effort yields a higher priority multiplier, deliberately biasing the
/// ranking toward cheap high-value ideas. The enum is closed: any other value
/// fails at deserialization, which is where the contract wants it to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    /// The inverse-weighted priority multiplier: low=3, medium=2, high=1.
    pub fn factor(&self) -> f64 {
        match self {
            Effort::Low => 3.0,
            Effort::Medium => 2.0,
            Effort::High => 1.0,
        }
    }
}

impl FromStr for Effort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Effort::Low),
            "medium" => Ok(Effort::Medium),
            "high" => Ok(Effort::High),
            _ => Err(format!("Unknown effort level: {}", s)),
        }
    }
}

impl std::fmt::Display for Effort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effort::Low => write!(f, "low"),
            Effort::Medium => write!(f, "medium"),
            Effort::High => write!(f, "high"),
        }
    }
}

/// A submitted improvement idea, owned by a team and authored by a user.
///
/// `final_prio` is always the output of the priority engine over the other
/// four priority-relevant attributes; it is never mutated independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Entry {
    pub id: Uuid,
    pub team_id: Uuid,
    pub creator_id: Uuid,
    pub problem: String,
    pub solution: String,
    /// Short label grouping entries by business area.
    pub area: String,
    /// Hours saved per year, if estimated.
    pub time_saved_per_year: Option<i64>,
    /// Gross profit per year in currency units, if estimated.
    pub gross_profit_per_year: Option<i64>,
    pub effort: Option<Effort>,
    pub monetary_explanation: Option<String>,
    pub link: Option<String>,
    /// Anonymous entries hide the author nickname from listings and exports.
    pub anonymous: bool,
    pub manual_override_prio: i64,
    pub final_prio: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Whether the entry is currently soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Request to create an entry. Any team member may submit.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEntryRequest {
    #[validate(length(min = 1, message = "Problem description is required"))]
    pub problem: String,
    #[validate(length(min = 1, message = "Solution description is required"))]
    pub solution: String,
    #[validate(length(min = 1, max = 100, message = "Area must be 1-100 characters"))]
    pub area: String,
    #[validate(custom(function = "shared::validation::validate_time_saved"))]
    pub time_saved_per_year: Option<i64>,
    pub gross_profit_per_year: Option<i64>,
    pub effort: Option<Effort>,
    pub monetary_explanation: Option<String>,
    #[validate(custom(function = "shared::validation::validate_link"))]
    pub link: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub manual_override_prio: i64,
}

/// Partial update to an entry. `None` means "keep the existing value".
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEntryRequest {
    #[validate(length(min = 1, message = "Problem description cannot be empty"))]
    pub problem: Option<String>,
    #[validate(length(min = 1, message = "Solution description cannot be empty"))]
    pub solution: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Area must be 1-100 characters"))]
    pub area: Option<String>,
    #[validate(custom(function = "shared::validation::validate_time_saved"))]
    pub time_saved_per_year: Option<i64>,
    pub gross_profit_per_year: Option<i64>,
    pub effort: Option<Effort>,
    pub monetary_explanation: Option<String>,
    #[validate(custom(function = "shared::validation::validate_link"))]
    pub link: Option<String>,
    pub anonymous: Option<bool>,
    pub manual_override_prio: Option<i64>,
}

impl UpdateEntryRequest {
    /// Whether the payload touches any priority-relevant field.
    ///
    /// The ranking is recomputed only when this returns true; a rename of
    /// the area or a new solution text leaves `final_prio` untouched.
    pub fn touches_priority(&self) -> bool {
        self.time_saved_per_year.is_some()
            || self.gross_profit_per_year.is_some()
            || self.effort.is_some()
            || self.manual_override_prio.is_some()
    }
}

/// Query parameters for listing a team's entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListEntriesQuery {
    /// Include soft-deleted entries in the listing.
    #[serde(default)]
    pub include_deleted: bool,
    /// Restrict to one area label.
    pub area: Option<String>,
}

/// Entry as returned by the API, with the author resolved.
///
/// For anonymous entries the author is omitted entirely.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EntryResponse {
    #[serde(flatten)]
    pub entry: Entry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserInfo>,
}

impl EntryResponse {
    /// Builds a response, masking the author when the entry is anonymous.
    pub fn new(entry: Entry, author: UserInfo) -> Self {
        let author = if entry.anonymous { None } else { Some(author) };
        Self { entry, author }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(anonymous: bool) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            problem: "Manual invoice matching".to_string(),
            solution: "Automate via the ERP import".to_string(),
            area: "finance".to_string(),
            time_saved_per_year: Some(300),
            gross_profit_per_year: Some(6000),
            effort: Some(Effort::Low),
            monetary_explanation: None,
            link: None,
            anonymous,
            manual_override_prio: 0,
            final_prio: 27,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_effort_serialization() {
        assert_eq!(serde_json::to_string(&Effort::Low).unwrap(), "\"low\"");
        let e: Effort = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(e, Effort::Medium);
    }

    #[test]
    fn test_effort_rejects_unknown_values() {
        let result: Result<Effort, _> = serde_json::from_str("\"herculean\"");
        assert!(result.is_err());
        assert!(Effort::from_str("herculean").is_err());
    }

    #[test]
    fn test_effort_from_str_case_insensitive() {
        assert_eq!(Effort::from_str("LOW").unwrap(), Effort::Low);
        assert_eq!(Effort::from_str("Medium").unwrap(), Effort::Medium);
        assert_eq!(Effort::from_str("high").unwrap(), Effort::High);
    }

    #[test]
    fn test_effort_factor_ordering() {
        assert!(Effort::Low.factor() > Effort::Medium.factor());
        assert!(Effort::Medium.factor() > Effort::High.factor());
    }

    #[test]
    fn test_effort_display_roundtrip() {
        for effort in [Effort::Low, Effort::Medium, Effort::High] {
            assert_eq!(Effort::from_str(&effort.to_string()).unwrap(), effort);
        }
    }

    #[test]
    fn test_touches_priority() {
        assert!(!UpdateEntryRequest::default().touches_priority());

        let area_only = UpdateEntryRequest {
            area: Some("logistics".to_string()),
            ..Default::default()
        };
        assert!(!area_only.touches_priority());

        let effort_change = UpdateEntryRequest {
            effort: Some(Effort::High),
            ..Default::default()
        };
        assert!(effort_change.touches_priority());

        let override_change = UpdateEntryRequest {
            manual_override_prio: Some(10),
            ..Default::default()
        };
        assert!(override_change.touches_priority());
    }

    #[test]
    fn test_create_entry_request_validation() {
        let ok = CreateEntryRequest {
            problem: "p".to_string(),
            solution: "s".to_string(),
            area: "ops".to_string(),
            time_saved_per_year: Some(100),
            gross_profit_per_year: Some(1000),
            effort: Some(Effort::Medium),
            monetary_explanation: None,
            link: Some("https://example.com/doc".to_string()),
            anonymous: false,
            manual_override_prio: 0,
        };
        assert!(ok.validate().is_ok());

        let negative_time = CreateEntryRequest {
            time_saved_per_year: Some(-5),
            ..ok.clone()
        };
        assert!(negative_time.validate().is_err());

        let bad_link = CreateEntryRequest {
            link: Some("not a url".to_string()),
            ..ok.clone()
        };
        assert!(bad_link.validate().is_err());

        let empty_problem = CreateEntryRequest {
            problem: String::new(),
            ..ok
        };
        assert!(empty_problem.validate().is_err());
    }

    #[test]
    fn test_entry_is_deleted() {
        let mut e = entry(false);
        assert!(!e.is_deleted());
        e.deleted_at = Some(Utc::now());
        assert!(e.is_deleted());
    }

    #[test]
    fn test_anonymous_entry_masks_author() {
        let author = UserInfo {
            id: Uuid::new_v4(),
            nickname: "ada".to_string(),
        };
        let visible = EntryResponse::new(entry(false), author.clone());
        assert!(visible.author.is_some());

        let masked = EntryResponse::new(entry(true), author);
        assert!(masked.author.is_none());
        let json = serde_json::to_string(&masked).unwrap();
        assert!(!json.contains("ada"));
    }
}
