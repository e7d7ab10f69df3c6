//! 数据访问层
//! PostgreSQL 实现用于生产环境，内存实现用于本地开发与测试

pub mod memory;
pub mod post_repo;
pub mod user_repo;

pub use memory::{MemoryPostStore, MemoryUserStore};
pub use post_repo::{PgPostStore, PostStore};
pub use user_repo::{PgUserStore, UserStore};
