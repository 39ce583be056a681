use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    /// Must be between 1 and 255 characters.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
}

/// Request body for a partial project update. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProjectUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ProjectUpdate {
    /// True when no recognised field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_input_validation() {
        let valid = ProjectInput {
            name: "Launch".to_string(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let empty_name = ProjectInput {
            name: String::new(),
            description: Some("no name".to_string()),
        };
        assert!(empty_name.validate().is_err());

        let long_name = ProjectUpdate {
            name: Some("p".repeat(256)),
            description: None,
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_project_update_is_empty() {
        assert!(ProjectUpdate::default().is_empty());
        assert!(!ProjectUpdate {
            name: None,
            description: Some(String::new()),
        }
        .is_empty());
    }
}
