use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::AppState;

/// `GET /api/users` — sanitized account listing (id, name, email, role).
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = state.db.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}
