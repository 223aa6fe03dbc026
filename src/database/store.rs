use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::post::post_model::Post;
use crate::user::model::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("duplicate key: {0}")]
    Duplicate(String),
}

/// Persistence for posts. Each post is one document that embeds its likes and
/// comments, so every write replaces the whole document.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find_post(&self, id: &ObjectId) -> Result<Option<Post>, StoreError>;

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError>;

    /// Replaces the stored post only while its version still equals
    /// `expected_version`. Returns `false` when nothing matched, meaning the post
    /// was written by someone else in between or no longer exists.
    async fn replace_post(&self, post: &Post, expected_version: u64)
    -> Result<bool, StoreError>;

    async fn delete_post(&self, id: &ObjectId) -> Result<bool, StoreError>;

    /// Posts ordered by `created_at` descending, optionally restricted to one author.
    async fn list_posts(
        &self,
        author: Option<&ObjectId>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, StoreError>;

    async fn count_posts(&self, author: Option<&ObjectId>) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError>;

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the username or email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
}
