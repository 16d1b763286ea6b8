use serde::{Deserialize, Serialize};

/// A back-office user. The credential list is built from environment
/// configuration at startup and lives in process memory only.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    /// bcrypt hash, never the plaintext password
    pub password_hash: String,
    pub name: String,
}

/// Public view of a user, returned on login and token verification.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
