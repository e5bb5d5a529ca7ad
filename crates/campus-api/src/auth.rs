use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};

use campus_db::Database;
use campus_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("All fields are required"));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|_| ApiError::Internal("Registration"))?
        .to_string();

    let user_id = state
        .db
        .create_user(&req.email, &req.username, &password_hash)
        .map_err(|e| ApiError::from_store(e, "Registration"))?;

    // Seeded after the user row commits; a partial seed is not rolled back.
    state
        .db
        .seed_missions(user_id)
        .map_err(|e| ApiError::from_store(e, "Registration"))?;

    let token = create_token(&state.jwt_secret, user_id)
        .map_err(|_| ApiError::Internal("Registration"))?;

    Ok(Json(AuthResponse { token, user_id }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("Email and password are required"));
    }

    let user = state
        .db
        .get_user_by_email(&req.email)
        .map_err(|e| ApiError::from_store(e, "Login"))?
        .ok_or(ApiError::InvalidCredentials)?;

    let parsed_hash =
        PasswordHash::new(&user.password_hash).map_err(|_| ApiError::Internal("Login"))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let token =
        create_token(&state.jwt_secret, user.id).map_err(|_| ApiError::Internal("Login"))?;

    Ok(Json(AuthResponse {
        token,
        user_id: user.id,
    }))
}

pub fn create_token(secret: &str, user_id: i64) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        exp: (chrono::Utc::now() + chrono::Duration::days(7)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
