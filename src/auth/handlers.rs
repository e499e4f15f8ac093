use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::models::{Role, StudentAccount, User};
use crate::error::{AppError, AuthError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Sanitized account view; the password hash never leaves the db layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectView {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl SubjectView {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            user_id: None,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }

    fn from_student(account: &StudentAccount, include_user_id: bool) -> Self {
        Self {
            id: account.student.id,
            user_id: include_user_id.then_some(account.student.user_id),
            email: account.user.email.clone(),
            name: account.user.name.clone(),
            role: account.user.role,
        }
    }
}

fn require_credentials(req: &LoginRequest) -> Result<(), AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

/// Pulls the bearer token out of the Authorization header. A missing header
/// is its own error; a present-but-malformed value is handed to verification
/// and fails there as an invalid token.
fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or(AuthError::MissingToken)?;

    // The header exists; anything unreadable in it is an invalid token, not
    // a missing one.
    let header = header.to_str().map_err(|_| AuthError::InvalidToken)?;

    Ok(header.strip_prefix("Bearer ").unwrap_or(header))
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_credentials(&req)?;

    info!("Login attempt for {}", req.email);
    match state.auth_service.authenticate(&req.email, &req.password).await {
        Ok((token, user)) => {
            info!("Login successful for {}", req.email);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "token": token,
                "user": SubjectView::from_user(&user),
            })))
        }
        Err(e) => {
            error!("Login failed for {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn profile(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let claims = state.auth_service.verify_token(token)?;

    let user = state
        .db
        .get_user_by_id(claims.subject_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({ "user": SubjectView::from_user(&user) })))
}

pub async fn student_login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_credentials(&req)?;

    info!("Student login attempt for {}", req.email);
    match state
        .auth_service
        .authenticate_student(&req.email, &req.password)
        .await
    {
        Ok((token, account)) => {
            info!("Student login successful for {}", req.email);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "token": token,
                "student": SubjectView::from_student(&account, true),
            })))
        }
        Err(e) => {
            error!("Student login failed for {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn student_profile(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let claims = state.auth_service.verify_token(token)?;

    let account = state
        .db
        .get_student_account_by_id(claims.subject_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "student": SubjectView::from_student(&account, false),
    })))
}
