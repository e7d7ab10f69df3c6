//! 认证服务：注册、登录

use crate::{
    auth::{
        jwt::{Claims, JwtService},
        password::PasswordHasher,
    },
    error::{AppError, AuthFailure},
    models::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        user::{NewUser, UserResponse},
    },
    repository::UserStore,
};
use std::sync::Arc;

pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            hasher,
            jwt_service,
        }
    }

    /// 用户注册
    ///
    /// 邮箱重复时存储层返回 `AppError::Conflict`，不做重试。
    pub async fn register(&self, req: RegisterRequest) -> Result<UserResponse, AppError> {
        let password_hash = self.hasher.hash(&req.password).await?;

        let user = self
            .users
            .create(NewUser {
                name: &req.name,
                email: &req.email,
                password_hash: &password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(UserResponse::from(user))
    }

    /// 用户登录
    ///
    /// 用户不存在与密码错误返回同一个 `CredentialMismatch`。
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user = match self.users.find_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login for unknown email");
                return Err(AuthFailure::CredentialMismatch.into());
            }
        };

        // 验证密码
        if !self.hasher.compare(&req.password, &user.password_hash).await {
            tracing::debug!(user_id = %user.id, "Login password mismatch");
            return Err(AuthFailure::CredentialMismatch.into());
        }

        let claims = Claims {
            id: user.id,
            email: user.email,
        };
        let token = self.jwt_service.issue(&claims)?;

        tracing::info!(user_id = %claims.id, "User logged in");

        Ok(LoginResponse {
            user: claims,
            token,
        })
    }
}
