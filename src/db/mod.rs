//! Data-access layer: account and role-profile lookups over Postgres.

pub mod models;
pub mod operations;

pub use models::{
    AccountStatus, AdminProfile, Role, RoleProfile, StaffProfile, Student, StudentAccount, User,
    UserSummary,
};
pub use operations::DbOperations;
