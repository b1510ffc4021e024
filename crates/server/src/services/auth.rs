//! Registration, login, and bearer token issuance.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use thiserror::Error;

use lustra_core::{Email, EmailError, Role};

use crate::db::{RepositoryError, UserRepository};
use crate::middleware::Claims;
use crate::models::user::User;
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password verification failed.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account for the given email. Collapsed into `InvalidCredentials`
    /// at the response boundary so login never leaks which emails exist.
    #[error("user not found")]
    UserNotFound,

    /// Registration with an email that already has an account.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password fails the strength requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Underlying repository failure.
    #[error("repository error: {0}")]
    Repository(RepositoryError),

    /// Hashing or token signing failed.
    #[error("token issue: {0}")]
    TokenIssue(String),
}

/// Register a new account and sign them in.
///
/// New accounts always start as customers; roles are only elevated through
/// the approval workflow or an explicit admin action.
///
/// # Errors
///
/// Returns `AuthError` for invalid email, weak password, duplicate email,
/// or repository failure.
pub async fn register(
    state: &AppState,
    email: &str,
    name: &str,
    password: &str,
) -> Result<(User, String), AuthError> {
    let email = Email::parse(email)?;
    validate_password(password)?;

    let hash = hash_password(password)?;

    let users = UserRepository::new(state.pool());
    let user = users
        .create(&email, name, &hash, Role::Customer)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

    let token = issue_token(state, &user)?;
    Ok((user, token))
}

/// Verify credentials and issue a bearer token.
///
/// # Errors
///
/// Returns `AuthError::UserNotFound` or `AuthError::InvalidCredentials` on
/// bad credentials (both map to 401).
pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<(User, String), AuthError> {
    let email = Email::parse(email)?;

    let users = UserRepository::new(state.pool());
    let (user, stored_hash) = users
        .get_password_hash(&email)
        .await
        .map_err(AuthError::Repository)?
        .ok_or(AuthError::UserNotFound)?;

    verify_password(password, &stored_hash)?;

    let token = issue_token(state, &user)?;
    Ok((user, token))
}

/// Sign a bearer token for a user with the configured TTL.
///
/// # Errors
///
/// Returns `AuthError::TokenIssue` if signing fails.
pub fn issue_token(state: &AppState, user: &User) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    #[allow(clippy::cast_possible_wrap)] // TTL is bounded by config validation
    let claims = Claims {
        sub: user.id.as_i64(),
        role: user.role,
        iat: now,
        exp: now + state.config().token_ttl_secs as i64,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        state.encoding_key(),
    )
    .map_err(|e| AuthError::TokenIssue(e.to_string()))
}

/// Check password strength requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` when the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::TokenIssue(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::TokenIssue(format!("stored hash unreadable: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_minimum_length() {
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }
}
