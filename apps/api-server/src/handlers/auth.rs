//! Authentication handlers: registration and login.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::domain::User;
use quill_core::ports::{PasswordService, TokenService};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn validate_registration(req: &RegisterRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.username.trim().is_empty() {
        errors.push("username must not be empty".to_string());
    }
    if req.username.len() > 150 {
        errors.push("username must be at most 150 characters".to_string());
    }
    if !req.email.contains('@') {
        errors.push("email is not a valid address".to_string());
    }
    if req.password.len() < 8 {
        errors.push("password must be at least 8 characters".to_string());
    }

    errors
}

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    token_service: web::Data<Arc<dyn TokenService>>,
    payload: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let payload = payload.into_inner();

    let errors = validate_registration(&payload);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if state.users.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Conflict("username is already taken".to_string()));
    }
    if state.users.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("email is already registered".to_string()));
    }

    let password_hash = password_service
        .hash(&payload.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User::new(
        payload.username,
        payload.first_name,
        payload.last_name,
        payload.email,
        password_hash,
    );
    let user = state.users.save(user).await?;

    tracing::info!(username = %user.username, "user registered");

    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    token_service: web::Data<Arc<dyn TokenService>>,
    payload: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let payload = payload.into_inner();

    let user = state
        .users
        .find_by_username(&payload.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        tracing::warn!(username = %payload.username, "failed login attempt");
        return Err(AppError::Unauthorized);
    }

    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}
