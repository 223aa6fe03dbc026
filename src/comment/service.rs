use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::post::post_model::Comment;
use crate::post::post_service::{PostService, parse_post_id};
use crate::utils::error::CustomError;
use crate::utils::pagination::{Page, PageQuery};
use crate::utils::validation::{COMMENT_CONTENT, validate_text};

pub struct CommentService {
    posts: Arc<PostService>,
}

fn comment_not_found() -> CustomError {
    CustomError::NotFoundError("Comment not found".to_string())
}

impl CommentService {
    pub fn new(posts: Arc<PostService>) -> Self {
        CommentService { posts }
    }

    /// Add a new comment to a post. Returns the comment and the post's new comment count.
    pub async fn add_comment(
        &self,
        post_id: &str,
        user: ObjectId,
        content: Option<&str>,
    ) -> Result<(Comment, u64), CustomError> {
        let content = validate_text(&COMMENT_CONTENT, content)?;
        let post_id = parse_post_id(post_id)?;

        let (post, comment) = self
            .posts
            .mutate(&post_id, |post| Ok(post.add_comment(user, content.clone())))
            .await?;

        log::debug!("User {} commented on post {}", user, post_id);
        Ok((comment, post.comment_count))
    }

    /// Get the comments of a post, newest first
    pub async fn list_comments(
        &self,
        post_id: &str,
        query: &PageQuery,
    ) -> Result<Page<Comment>, CustomError> {
        let post = self.posts.get_post(&parse_post_id(post_id)?).await?;
        Ok(Page::from_all(post.comments_newest_first(), query.params()))
    }

    /// Update a comment (only author can update)
    pub async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        user: &ObjectId,
        content: Option<&str>,
    ) -> Result<Comment, CustomError> {
        let content = validate_text(&COMMENT_CONTENT, content)?;
        let post_id = parse_post_id(post_id)?;
        let comment_id = ObjectId::parse_str(comment_id).ok();

        let (_, comment) = self
            .posts
            .mutate(&post_id, |post| {
                let comment = comment_id
                    .as_ref()
                    .and_then(|id| post.find_comment_mut(id))
                    .ok_or_else(comment_not_found)?;

                if comment.user != *user {
                    return Err(CustomError::ForbiddenError(
                        "Not authorized to update this comment".to_string(),
                    ));
                }

                comment.content = content.clone();
                Ok(comment.clone())
            })
            .await?;

        Ok(comment)
    }

    /// Delete a comment (only author can delete). Returns the post's new comment count.
    pub async fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        user: &ObjectId,
    ) -> Result<u64, CustomError> {
        let post_id = parse_post_id(post_id)?;
        let comment_id = ObjectId::parse_str(comment_id).ok();

        let (post, ()) = self
            .posts
            .mutate(&post_id, |post| {
                let id = comment_id.ok_or_else(comment_not_found)?;
                let comment = post.find_comment(&id).ok_or_else(comment_not_found)?;

                if comment.user != *user {
                    return Err(CustomError::ForbiddenError(
                        "Not authorized to delete this comment".to_string(),
                    ));
                }

                post.remove_comment(&id);
                Ok(())
            })
            .await?;

        log::debug!("User {} deleted a comment on post {}", user, post_id);
        Ok(post.comment_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::post::post_model::PostRequest;

    struct Fixture {
        comments: CommentService,
        posts: Arc<PostService>,
        post_id: String,
    }

    async fn fixture() -> Fixture {
        let posts = Arc::new(PostService::new(Arc::new(MemoryStore::new())));
        let post = posts
            .create_post(
                ObjectId::new(),
                PostRequest {
                    content: Some("hi".into()),
                    image: None,
                },
            )
            .await
            .unwrap();
        Fixture {
            comments: CommentService::new(posts.clone()),
            posts,
            post_id: post.id.to_hex(),
        }
    }

    impl Fixture {
        async fn stored_comments(&self) -> Vec<Comment> {
            let id = parse_post_id(&self.post_id).unwrap();
            let post = self.posts.get_post(&id).await.unwrap();
            assert_eq!(post.comment_count as usize, post.comments.len());
            post.comments
        }
    }

    #[actix_web::test]
    async fn add_comment_bumps_count() {
        let f = fixture().await;
        let author = ObjectId::new();

        let (comment, count) = f
            .comments
            .add_comment(&f.post_id, author, Some("  nice "))
            .await
            .unwrap();
        assert_eq!(comment.content, "nice");
        assert_eq!(comment.user, author);
        assert_eq!(count, 1);
        assert_eq!(f.stored_comments().await, vec![comment]);
    }

    #[actix_web::test]
    async fn overlong_comment_leaves_post_untouched() {
        let f = fixture().await;
        let long = "a".repeat(201);

        let result = f
            .comments
            .add_comment(&f.post_id, ObjectId::new(), Some(&long))
            .await;
        assert!(matches!(result, Err(CustomError::ValidationError(_))));
        assert!(f.stored_comments().await.is_empty());
    }

    #[actix_web::test]
    async fn validation_runs_before_post_lookup() {
        let f = fixture().await;
        let result = f
            .comments
            .add_comment(&ObjectId::new().to_hex(), ObjectId::new(), Some(""))
            .await;
        assert!(matches!(result, Err(CustomError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn comment_on_missing_post_is_not_found() {
        let f = fixture().await;
        let result = f
            .comments
            .add_comment(&ObjectId::new().to_hex(), ObjectId::new(), Some("hello"))
            .await;
        assert!(matches!(result, Err(CustomError::NotFoundError(_))));
    }

    #[actix_web::test]
    async fn only_author_may_edit_or_delete() {
        let f = fixture().await;
        let author = ObjectId::new();
        let other = ObjectId::new();
        let (comment, _) = f
            .comments
            .add_comment(&f.post_id, author, Some("nice"))
            .await
            .unwrap();
        let comment_id = comment.id.to_hex();

        let result = f
            .comments
            .update_comment(&f.post_id, &comment_id, &other, Some("mine now"))
            .await;
        assert!(matches!(result, Err(CustomError::ForbiddenError(_))));

        let result = f.comments.delete_comment(&f.post_id, &comment_id, &other).await;
        assert!(matches!(result, Err(CustomError::ForbiddenError(_))));
        assert_eq!(f.stored_comments().await, vec![comment.clone()]);

        let updated = f
            .comments
            .update_comment(&f.post_id, &comment_id, &author, Some("edited"))
            .await
            .unwrap();
        assert_eq!(updated.content, "edited");
        assert_eq!(updated.created_at, comment.created_at);

        let count = f
            .comments
            .delete_comment(&f.post_id, &comment_id, &author)
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(f.stored_comments().await.is_empty());
    }

    #[actix_web::test]
    async fn unknown_comment_is_not_found() {
        let f = fixture().await;
        for comment_id in [ObjectId::new().to_hex(), "nope".to_string()] {
            let result = f
                .comments
                .delete_comment(&f.post_id, &comment_id, &ObjectId::new())
                .await;
            assert!(matches!(result, Err(CustomError::NotFoundError(_))));

            let result = f
                .comments
                .update_comment(&f.post_id, &comment_id, &ObjectId::new(), Some("x"))
                .await;
            assert!(matches!(result, Err(CustomError::NotFoundError(_))));
        }
    }

    #[actix_web::test]
    async fn lists_newest_first_in_pages() {
        let f = fixture().await;
        for n in 0..15 {
            f.comments
                .add_comment(&f.post_id, ObjectId::new(), Some(&format!("comment {n}")))
                .await
                .unwrap();
        }

        let first = f
            .comments
            .list_comments(&f.post_id, &PageQuery::new(1, 10))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_items, 15);
        assert!(first.has_next);
        assert!(!first.has_prev);
        assert_eq!(first.items[0].content, "comment 14");

        let second = f
            .comments
            .list_comments(&f.post_id, &PageQuery::new(2, 10))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 5);
        assert!(!second.has_next);
        assert!(second.has_prev);
        assert_eq!(second.items[4].content, "comment 0");
    }
}
