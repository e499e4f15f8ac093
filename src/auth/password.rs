use crate::error::AppError;

/// bcrypt work factor. 10 rounds keeps login latency reasonable while staying
/// expensive enough to brute-force; raising it invalidates nothing, old
/// hashes verify with the cost embedded in them.
pub const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, hash)?)
}
