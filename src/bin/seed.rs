//! Seeds the database with the default admin, staff and student accounts.
//! Safe to re-run: existing emails are skipped.

use dotenv::dotenv;
use rollcall_server::db::models::{AdminProfile, Role, RoleProfile, StaffProfile, Student, User};
use rollcall_server::{AppState, Settings};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

const SEED_PASSWORD: &str = "123456";

#[tokio::main]
async fn main() -> rollcall_server::Result<()> {
    dotenv().ok();

    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = Settings::new()?;
    let state = AppState::new(config).await?;

    info!("Running migrations");
    sqlx::migrate!("./migrations")
        .run(state.db.pool())
        .await
        .map_err(|e| rollcall_server::AppError::Internal(e.to_string()))?;

    info!("Seeding database");

    seed_account(
        &state,
        "admin@example.com",
        "System Admin",
        Role::Admin,
        |user_id| {
            RoleProfile::Admin(AdminProfile {
                id: Uuid::new_v4(),
                user_id,
                admin_level: "system".to_string(),
            })
        },
    )
    .await?;

    seed_account(
        &state,
        "staff@example.com",
        "John Staff",
        Role::Staff,
        |user_id| {
            RoleProfile::Staff(StaffProfile {
                id: Uuid::new_v4(),
                user_id,
                employee_id: "EMP001".to_string(),
                department: "Engineering".to_string(),
                position: "Lecturer".to_string(),
            })
        },
    )
    .await?;

    for i in 1..=5u32 {
        let email = format!("student{}@example.com", i);
        let code = format!("STU00{}", i);
        seed_account(
            &state,
            &email,
            &format!("Student {}", i),
            Role::Student,
            |user_id| {
                RoleProfile::Student(Student {
                    id: Uuid::new_v4(),
                    user_id,
                    student_code: code,
                    class_name: "A".to_string(),
                    section: "CS".to_string(),
                    year: "2025".to_string(),
                })
            },
        )
        .await?;
    }

    info!("All data seeded");
    state.shutdown().await
}

async fn seed_account<F>(
    state: &AppState,
    email: &str,
    name: &str,
    role: Role,
    profile: F,
) -> rollcall_server::Result<()>
where
    F: FnOnce(Uuid) -> RoleProfile,
{
    if state.db.get_user_by_email(email).await?.is_some() {
        info!("Skipping {} (already exists)", email);
        return Ok(());
    }

    let user = User::new(email.to_string(), SEED_PASSWORD, name.to_string(), role)?;
    state.db.create_account(&user, &profile(user.id)).await?;
    info!("Created {} ({:?})", email, role);
    Ok(())
}
