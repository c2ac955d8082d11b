//! bcrypt hashing off the async runtime

use crate::errors::{RestError, RestResult};

pub async fn hash_password(password: String, cost: u32) -> RestResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| RestError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| RestError::internal(format!("Failed to hash password: {}", e)))
}

/// False for a wrong password and for a hash bcrypt cannot parse
pub async fn verify_password(password: String, hash: String) -> RestResult<bool> {
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| RestError::internal(format!("Password verification task failed: {}", e)))?;

    match outcome {
        Ok(valid) => Ok(valid),
        Err(e) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("correct horse".to_string(), 4).await.unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("correct horse".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("battery staple".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_garbage_hash_does_not_verify() {
        assert!(!verify_password("anything".to_string(), "not-a-hash".to_string()).await.unwrap());
    }
}
