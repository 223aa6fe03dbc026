use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::database::store::PostStore;
use crate::post::post_model::{Post, PostRequest};
use crate::utils::error::CustomError;
use crate::utils::pagination::{Page, PageQuery};
use crate::utils::validation::{POST_CONTENT, validate_text};

/// Attempts of one load-mutate-save cycle before giving up on a contended post.
pub const MAX_WRITE_ATTEMPTS: usize = 3;

pub fn parse_post_id(raw: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(raw).map_err(|_| CustomError::NotFoundError("Post not found".into()))
}

pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        PostService { store }
    }

    pub async fn create_post(
        &self,
        author: ObjectId,
        request: PostRequest,
    ) -> Result<Post, CustomError> {
        let content = validate_text(&POST_CONTENT, request.content.as_deref())?;
        let image = request
            .image
            .map(|image| image.trim().to_string())
            .unwrap_or_default();

        let mut post = Post::new(author, content, image);
        post.refresh_counters();

        self.store
            .insert_post(&post)
            .await
            .map_err(|e| CustomError::internal("Server error while creating post", e))?;

        log::info!("Post {} created by {}", post.id, author);
        Ok(post)
    }

    pub async fn get_post(&self, id: &ObjectId) -> Result<Post, CustomError> {
        self.store
            .find_post(id)
            .await
            .map_err(|e| CustomError::internal("Server error while fetching post", e))?
            .ok_or_else(|| CustomError::NotFoundError("Post not found".into()))
    }

    /// Newest posts first, optionally only those written by `author`.
    pub async fn list_posts(
        &self,
        author: Option<&ObjectId>,
        query: &PageQuery,
    ) -> Result<Page<Post>, CustomError> {
        let params = query.params();

        let total = self
            .store
            .count_posts(author)
            .await
            .map_err(|e| CustomError::internal("Server error while fetching posts", e))?;
        let posts = self
            .store
            .list_posts(author, params.skip(), params.limit)
            .await
            .map_err(|e| CustomError::internal("Server error while fetching posts", e))?;

        Ok(Page::new(posts, params, total))
    }

    pub async fn update_post(
        &self,
        id: &ObjectId,
        actor: &ObjectId,
        request: PostRequest,
    ) -> Result<Post, CustomError> {
        let content = validate_text(&POST_CONTENT, request.content.as_deref())?;
        let image = request.image.map(|image| image.trim().to_string());

        let (post, ()) = self
            .mutate(id, |post| {
                if !post.is_authored_by(actor) {
                    return Err(CustomError::ForbiddenError(
                        "Not authorized to update this post".into(),
                    ));
                }
                post.content = content.clone();
                if let Some(image) = &image {
                    post.image = image.clone();
                }
                Ok(())
            })
            .await?;

        Ok(post)
    }

    pub async fn delete_post(&self, id: &ObjectId, actor: &ObjectId) -> Result<(), CustomError> {
        let post = self.get_post(id).await?;
        if !post.is_authored_by(actor) {
            return Err(CustomError::ForbiddenError(
                "Not authorized to delete this post".into(),
            ));
        }

        let deleted = self
            .store
            .delete_post(id)
            .await
            .map_err(|e| CustomError::internal("Server error while deleting post", e))?;
        if !deleted {
            return Err(CustomError::NotFoundError("Post not found".into()));
        }

        log::info!("Post {} deleted by {}", id, actor);
        Ok(())
    }

    /// The one way a loaded post is written back: counters are recomputed from the
    /// embedded sequences, `updated_at` is bumped and the write only lands if nobody
    /// saved the post since it was loaded. Returns `false` on a lost race.
    pub async fn save(&self, post: &mut Post) -> Result<bool, CustomError> {
        let expected_version = post.version;
        post.refresh_counters();
        post.updated_at = Utc::now();
        post.version = expected_version + 1;

        let saved = self
            .store
            .replace_post(post, expected_version)
            .await
            .map_err(|e| CustomError::internal("Server error while saving post", e))?;

        if !saved {
            post.version = expected_version;
        }
        Ok(saved)
    }

    /// Runs load → `apply` → save, re-running the whole cycle on fresh state when
    /// another writer got there first. Errors from `apply` abort without writing.
    pub async fn mutate<T, F>(&self, id: &ObjectId, mut apply: F) -> Result<(Post, T), CustomError>
    where
        F: FnMut(&mut Post) -> Result<T, CustomError>,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let mut post = self.get_post(id).await?;
            let outcome = apply(&mut post)?;

            if self.save(&mut post).await? {
                return Ok((post, outcome));
            }

            log::warn!(
                "Concurrent write on post {} (attempt {}/{})",
                id,
                attempt,
                MAX_WRITE_ATTEMPTS
            );
        }

        Err(CustomError::ConflictError(
            "Post was modified concurrently, please retry".into(),
        ))
    }
}
