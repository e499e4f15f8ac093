//! Credential & session service: password verification against stored bcrypt
//! hashes and stateless JWT issuance/verification.

pub mod handlers;
pub mod password;
mod service;

pub use service::{AuthService, Claims};
