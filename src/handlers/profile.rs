// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::{AppError, is_unique_violation},
    handlers::auth::USER_COLUMNS,
    models::user::{ChangePasswordRequest, EditProfileRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        html::clean_optional_html,
        jwt::Claims,
    },
};

/// Updates the caller's profile fields.
pub async fn edit_profile(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<EditProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let email = payload.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET first_name = $1, last_name = $2, email = $3, phone_number = $4, dob = $5, bio = $6
        WHERE id = $7
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(payload.firstname.trim())
    .bind(payload.lastname.trim())
    .bind(&email)
    .bind(payload.phone_number.as_deref().map(str::trim).filter(|p| !p.is_empty()))
    .bind(payload.dob)
    .bind(clean_optional_html(payload.bio.as_deref()))
    .bind(user_id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Email '{}' is already registered", email))
        } else {
            tracing::error!("Failed to update profile: {:?}", e);
            AppError::from(e)
        }
    })?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": user
    })))
}

/// Deletes the caller's account. Quiz history is kept with the user detached.
pub async fn delete_profile(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!("User {} deleted their profile", user_id);
    Ok(Json(json!({ "message": "Profile deleted successfully" })))
}

/// Changes the caller's password after checking the current one.
pub async fn change_password(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    let stored = sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if !verify_password(&payload.current_password, &stored) {
        return Err(AppError::AuthError("Current password is incorrect".to_string()));
    }

    let hashed_password = hash_password(&payload.new_password)?;

    sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
        .bind(hashed_password)
        .bind(user_id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

/// Lists all users. Admin only.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(users))
}
