//! Password hashing and verification using Argon2id

use crate::{config::SecurityConfig, error::AppError};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher with configurable cost parameters.
///
/// Both operations run on the blocking thread pool; the calling task is
/// suspended until the digest work completes.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher from explicit Argon2 parameters.
    ///
    /// `work_factor` is the Argon2 time cost (number of passes over memory).
    pub fn new(work_factor: u32, memory_kib: u32, parallelism: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, work_factor, parallelism, None)
            .map_err(|e| AppError::Config(format!("Invalid Argon2 params: {}", e)))?;

        Ok(Self { params })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, AppError> {
        Self::new(
            config.hash_work_factor,
            config.hash_memory_kib,
            config.hash_parallelism,
        )
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let params = self.params.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| {
                    tracing::error!("Failed to hash password: {:?}", e);
                    AppError::Internal(format!("Failed to hash password: {}", e))
                })
        })
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
    }

    /// Compare a candidate password against a stored digest.
    ///
    /// The salt and cost are read from the digest itself. Returns `false` for
    /// a mismatch and for a digest that cannot be parsed.
    pub async fn compare(&self, password: &str, digest: &str) -> bool {
        let password = password.to_owned();
        let digest = digest.to_owned();

        let outcome = tokio::task::spawn_blocking(move || {
            let parsed_hash = match PasswordHash::new(&digest) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::debug!("Failed to parse password hash: {:?}", e);
                    return false;
                }
            };

            // 验证时使用摘要中记录的参数，而非当前配置
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await;

        match outcome {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!("Password comparison task failed: {}", e);
                false
            }
        }
    }
}
