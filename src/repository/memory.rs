//! 内存存储实现
//! 进程退出即丢失，适用于本地开发和测试

use crate::{
    error::AppError,
    models::{
        post::Post,
        user::{NewUser, User},
    },
    repository::{post_repo::PostStore, user_repo::UserStore},
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

/// Users keyed by email. The entry API makes insert-if-absent atomic, so
/// concurrent registrations of one email yield exactly one success.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, User>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn create(&self, new_user: NewUser<'_>) -> Result<User, AppError> {
        match self.users.entry(new_user.email.to_string()) {
            Entry::Occupied(_) => Err(AppError::Conflict("Email already registered".to_string())),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    name: new_user.name.to_string(),
                    email: new_user.email.to_string(),
                    password_hash: new_user.password_hash.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }
}

#[derive(Default)]
pub struct MemoryPostStore {
    posts: DashMap<Uuid, Post>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list(&self) -> Result<Vec<Post>, AppError> {
        let mut posts: Vec<Post> = self.posts.iter().map(|p| p.value().clone()).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        Ok(self.posts.get(&id).map(|p| p.value().clone()))
    }

    async fn create(&self, author_id: Uuid, title: &str, body: &str) -> Result<Post, AppError> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            title: title.to_string(),
            body: body.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<Option<Post>, AppError> {
        let Some(mut post) = self.posts.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = title {
            post.title = title.to_string();
        }
        if let Some(body) = body {
            post.body = body.to_string();
        }
        post.updated_at = Utc::now();

        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.posts.remove(&id).is_some())
    }
}
