use crate::models::{User, UserInfo};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_TTL_HOURS: i64 = 24;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub name: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

/// Fixed in-memory credential list, built from the environment at startup.
/// Passwords are held as bcrypt hashes only.
pub struct CredentialStore {
    users: Vec<User>,
}

impl CredentialStore {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn from_env() -> Result<Self, String> {
        let email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
        let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());

        let password_hash = match std::env::var("ADMIN_PASSWORD_HASH") {
            Ok(hashed) => hashed,
            Err(_) => {
                let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
                    log::warn!("⚠️  ADMIN_PASSWORD not set, using the development default");
                    "changeme".to_string()
                });
                hash(&password, DEFAULT_COST)
                    .map_err(|e| format!("Failed to hash admin password: {}", e))?
            }
        };

        Ok(Self::new(vec![User {
            id: "1".to_string(),
            email,
            password_hash,
            name,
        }]))
    }

    /// Linear scan plus bcrypt check. Every failure collapses to the same
    /// generic message so callers cannot probe which part was wrong.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<&User, String> {
        let user = self
            .users
            .iter()
            .find(|user| user.email == email)
            .ok_or_else(|| "Invalid credentials".to_string())?;

        let valid = verify(password, &user.password_hash)
            .map_err(|e| format!("Password verification error: {}", e))?;

        if !valid {
            return Err("Invalid credentials".to_string());
        }

        Ok(user)
    }
}

// User login
pub fn login(credentials: &CredentialStore, request: &LoginRequest) -> Result<LoginResponse, String> {
    let user = credentials.authenticate(&request.email, &request.password)?;
    let token = issue_token(user)?;

    Ok(LoginResponse {
        token,
        user: UserInfo::from(user),
    })
}

// Generate JWT token
pub fn issue_token(user: &User) -> Result<String, String> {
    issue_token_with_secret(
        user,
        &get_jwt_secret(),
        Utc::now() + Duration::hours(TOKEN_TTL_HOURS),
    )
}

pub fn issue_token_with_secret(
    user: &User,
    secret: &str,
    expires_at: DateTime<Utc>,
) -> Result<String, String> {
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        iat: Utc::now().timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

// Verify JWT token. Expired, malformed and forged tokens are all reported
// the same way; the underlying cause is only visible in the server log.
pub fn verify_token(token: &str) -> Result<Claims, String> {
    verify_token_with_secret(token, &get_jwt_secret())
}

pub fn verify_token_with_secret(token: &str, secret: &str) -> Result<Claims, String> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "1".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hash("s3cret", 4).unwrap(),
            name: "Admin".to_string(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let user = test_user();
        let token =
            issue_token_with_secret(&user, "unit-secret", Utc::now() + Duration::hours(24))
                .unwrap();

        let claims = verify_token_with_secret(&token, "unit-secret").unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.name, "Admin");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let user = test_user();
        let token =
            issue_token_with_secret(&user, "unit-secret", Utc::now() + Duration::hours(24))
                .unwrap();

        assert!(verify_token_with_secret(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let user = test_user();
        let token =
            issue_token_with_secret(&user, "unit-secret", Utc::now() - Duration::hours(25))
                .unwrap();

        assert!(verify_token_with_secret(&token, "unit-secret").is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token_with_secret("not-a-jwt", "unit-secret").is_err());
    }

    #[test]
    fn test_authenticate_success() {
        let store = CredentialStore::new(vec![test_user()]);
        let user = store.authenticate("admin@example.com", "s3cret").unwrap();
        assert_eq!(user.id, "1");
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let store = CredentialStore::new(vec![test_user()]);
        let err = store.authenticate("admin@example.com", "nope").unwrap_err();
        assert_eq!(err, "Invalid credentials");
    }

    #[test]
    fn test_authenticate_unknown_email() {
        let store = CredentialStore::new(vec![test_user()]);
        let err = store.authenticate("ghost@example.com", "s3cret").unwrap_err();
        assert_eq!(err, "Invalid credentials");
    }
}
