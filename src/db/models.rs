use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::password;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// An account row. The password hash stays inside the db layer; response
/// bodies are built from sanitized views, never by serializing this struct.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password: &str, name: String, role: Role) -> Result<Self, AppError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            email,
            password_hash: password::hash_password(password)?,
            name,
            role,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Student role-profile, 1:1 with a student-role account.
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub student_code: String,
    pub class_name: String,
    pub section: String,
    pub year: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct StaffProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub employee_id: String,
    pub department: String,
    pub position: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct AdminProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub admin_level: String,
}

/// A student profile joined with its linked account.
#[derive(Debug, Clone)]
pub struct StudentAccount {
    pub student: Student,
    pub user: User,
}

/// Role-specific attributes created alongside an account.
#[derive(Debug, Clone)]
pub enum RoleProfile {
    Admin(AdminProfile),
    Staff(StaffProfile),
    Student(Student),
}

/// Sanitized listing row for `GET /api/users`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}
