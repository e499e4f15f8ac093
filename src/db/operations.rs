use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::models::{
    AccountStatus, Role, RoleProfile, Student, StudentAccount, User, UserSummary,
};
use crate::error::AppError;

#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<PgPool>,
}

/// Flat row for the students-join-users lookups. Column aliases keep the two
/// id columns apart.
#[derive(FromRow)]
struct StudentUserRow {
    student_id: Uuid,
    user_id: Uuid,
    student_code: String,
    class_name: String,
    section: String,
    year: String,
    email: String,
    password_hash: String,
    name: String,
    role: Role,
    status: AccountStatus,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<StudentUserRow> for StudentAccount {
    fn from(row: StudentUserRow) -> Self {
        StudentAccount {
            student: Student {
                id: row.student_id,
                user_id: row.user_id,
                student_code: row.student_code,
                class_name: row.class_name,
                section: row.section,
                year: row.year,
            },
            user: User {
                id: row.user_id,
                email: row.email,
                password_hash: row.password_hash,
                name: row.name,
                role: row.role,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const STUDENT_USER_SELECT: &str = r#"
    SELECT s.id AS student_id, s.user_id, s.student_code, s.class_name, s.section, s.year,
           u.email, u.password_hash, u.name, u.role, u.status, u.created_at, u.updated_at
    FROM students s
    JOIN users u ON u.id = s.user_id
"#;

impl DbOperations {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, role, status, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, role, status, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    /// Student login lookup: keyed through the role-profile relation, so only
    /// accounts that actually have a student profile resolve.
    pub async fn get_student_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StudentAccount>, AppError> {
        let row = sqlx::query_as::<_, StudentUserRow>(
            &format!("{STUDENT_USER_SELECT} WHERE u.email = $1"),
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(StudentAccount::from))
    }

    pub async fn get_student_account_by_id(
        &self,
        student_id: Uuid,
    ) -> Result<Option<StudentAccount>, AppError> {
        let row = sqlx::query_as::<_, StudentUserRow>(
            &format!("{STUDENT_USER_SELECT} WHERE s.id = $1"),
        )
        .bind(student_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(StudentAccount::from))
    }

    /// Creates an account together with its role-profile in one transaction,
    /// so a profile never exists without its account or vice versa.
    pub async fn create_account(
        &self,
        user: &User,
        profile: &RoleProfile,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, role, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .bind(user.status)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        match profile {
            RoleProfile::Student(student) => {
                sqlx::query(
                    "INSERT INTO students (id, user_id, student_code, class_name, section, year) \
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(student.id)
                .bind(student.user_id)
                .bind(&student.student_code)
                .bind(&student.class_name)
                .bind(&student.section)
                .bind(&student.year)
                .execute(&mut *tx)
                .await?;
            }
            RoleProfile::Staff(staff) => {
                sqlx::query(
                    "INSERT INTO staff (id, user_id, employee_id, department, position) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(staff.id)
                .bind(staff.user_id)
                .bind(&staff.employee_id)
                .bind(&staff.department)
                .bind(&staff.position)
                .execute(&mut *tx)
                .await?;
            }
            RoleProfile::Admin(admin) => {
                sqlx::query(
                    "INSERT INTO admins (id, user_id, admin_level) VALUES ($1, $2, $3)",
                )
                .bind(admin.id)
                .bind(admin.user_id)
                .bind(&admin.admin_level)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, role FROM users ORDER BY created_at",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(users)
    }
}
