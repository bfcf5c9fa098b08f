/// User domain type
use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Display name, when the identity provider supplies one
    pub display_name: Option<String>,

    /// Account email, when the identity provider supplies one
    pub email: Option<String>,
}

impl User {
    /// Create a user with just an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            display_name: None,
            email: None,
        }
    }
}
