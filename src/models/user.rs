// src/models/user.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'user' or 'admin'.
    pub role: String,

    pub phone_number: Option<String>,
    pub dob: Option<NaiveDate>,
    pub bio: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for signup. Field names follow the signup form.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        length(min = 1, max = 100, message = "First name is required."),
        custom(function = validate_not_blank)
    )]
    pub firstname: String,
    #[validate(
        length(min = 1, max = 100, message = "Last name is required."),
        custom(function = validate_not_blank)
    )]
    pub lastname: String,
    #[validate(email(message = "Email address is invalid."))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub confirm_password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for editing the caller's own profile.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProfileRequest {
    #[validate(length(min = 1, max = 100), custom(function = validate_not_blank))]
    pub firstname: String,
    #[validate(length(min = 1, max = 100), custom(function = validate_not_blank))]
    pub lastname: String,
    #[validate(email(message = "Email address is invalid."))]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    pub dob: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 128))]
    pub current_password: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub new_password: String,
}

/// Names are stored trimmed, so whitespace-only input would become "".
fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank")
            .with_message("Must not be blank.".into()));
    }
    Ok(())
}
