use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::database::store::{PostStore, StoreError, UserStore};
use crate::post::post_model::Post;
use crate::user::model::User;

/// Process-local store for running without MongoDB and for tests.
/// Applies the same version check on replace as the MongoDB store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<HashMap<ObjectId, Post>>,
    users: RwLock<HashMap<ObjectId, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn find_post(&self, id: &ObjectId) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(StoreError::Duplicate(format!("post {}", post.id)));
        }
        posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn replace_post(
        &self,
        post: &Post,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post.id) {
            Some(stored) if stored.version == expected_version => {
                *stored = post.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_post(&self, id: &ObjectId) -> Result<bool, StoreError> {
        Ok(self.posts.write().await.remove(id).is_some())
    }

    async fn list_posts(
        &self,
        author: Option<&ObjectId>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        let mut matching: Vec<&Post> = posts
            .values()
            .filter(|post| author.is_none_or(|author| post.author == *author))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(matching
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count_posts(&self, author: Option<&ObjectId>) -> Result<u64, StoreError> {
        let posts = self.posts.read().await;
        let count = posts
            .values()
            .filter(|post| author.is_none_or(|author| post.author == *author))
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if let Some(taken) = users
            .values()
            .find(|existing| existing.username == user.username || existing.email == user.email)
        {
            let field = if taken.username == user.username {
                "username"
            } else {
                "email"
            };
            return Err(StoreError::Duplicate(field.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}
