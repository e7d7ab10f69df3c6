//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::{
    extract_bearer_middleware, extract_token, verify_token_middleware, AuthContext, BearerToken,
};
pub use password::PasswordHasher;
