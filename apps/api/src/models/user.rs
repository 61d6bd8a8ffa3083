use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub resume: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The slice of a user the round engine needs: identity plus what goes into a notice.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<&User> for Candidate {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

impl Candidate {
    /// "First Last" when either part is present, otherwise the username.
    pub fn display_name(&self) -> String {
        let name = full_name(self.first_name.as_deref(), self.last_name.as_deref());
        if name.is_empty() {
            self.username.clone()
        } else {
            name
        }
    }
}

pub fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    format!("{} {}", first.unwrap_or(""), last.unwrap_or(""))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(first: Option<&str>, last: Option<&str>) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn test_display_name_joins_first_and_last() {
        assert_eq!(
            candidate(Some("Alice"), Some("Liddell")).display_name(),
            "Alice Liddell"
        );
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(candidate(None, None).display_name(), "alice");
        assert_eq!(candidate(Some(""), Some("  ")).display_name(), "alice");
    }

    #[test]
    fn test_full_name_trims_missing_half() {
        assert_eq!(full_name(None, Some("Liddell")), "Liddell");
        assert_eq!(full_name(Some("Alice"), None), "Alice");
    }
}
