use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::like::model::{LikeStatus, LikeToggle};
use crate::post::post_model::Like;
use crate::post::post_service::{PostService, parse_post_id};
use crate::utils::error::CustomError;

pub struct LikeService {
    posts: Arc<PostService>,
}

impl LikeService {
    pub fn new(posts: Arc<PostService>) -> Self {
        LikeService { posts }
    }

    /// Likes the post for `user`, or removes the like if it is already there.
    pub async fn toggle_like(&self, post_id: &str, user: ObjectId) -> Result<LikeToggle, CustomError> {
        let post_id = parse_post_id(post_id)?;
        let (post, liked) = self
            .posts
            .mutate(&post_id, |post| Ok(post.toggle_like(user)))
            .await?;

        log::debug!(
            "User {} {} post {}",
            user,
            if liked { "liked" } else { "unliked" },
            post_id
        );

        Ok(LikeToggle {
            liked,
            like_count: post.like_count,
        })
    }

    pub async fn has_liked(&self, post_id: &str, user: &ObjectId) -> Result<LikeStatus, CustomError> {
        let post = self.posts.get_post(&parse_post_id(post_id)?).await?;
        Ok(LikeStatus {
            has_liked: post.has_liked(user),
            like_count: post.like_count,
        })
    }

    /// Likes in the order they were given, with the post's like count.
    pub async fn list_likers(&self, post_id: &str) -> Result<(Vec<Like>, u64), CustomError> {
        let post = self.posts.get_post(&parse_post_id(post_id)?).await?;
        Ok((post.likes, post.like_count))
    }
}
