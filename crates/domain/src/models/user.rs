//! User account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::driver::DriverInfo;

/// Represents a user account in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Stored lowercase.
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    /// Listed as available to drive.
    pub driver_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_info: Option<DriverInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalizes an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Public profile of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub driver_available: bool,
    pub driver_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            driver_available: user.driver_available,
            driver_enabled: user.driver_info.is_some(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "rider@campus.edu".to_string(),
            display_name: "Rider".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            driver_available: false,
            driver_info: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_string(&user()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Rider@Campus.EDU "), "rider@campus.edu");
    }

    #[test]
    fn test_user_response_from_user() {
        let user = user();
        let response = UserResponse::from(&user);
        assert_eq!(response.id, user.id);
        assert!(!response.driver_enabled);
    }
}
