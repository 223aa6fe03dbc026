use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::user::model::UserRef;
use crate::utils::helpers::serialize_object_id;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(serialize_with = "serialize_object_id")]
    pub user: ObjectId,
    pub liked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_object_id")]
    pub user: ObjectId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post with its embedded likes and comments.
///
/// `like_count` and `comment_count` mirror the lengths of `likes` and `comments`;
/// they are only brought up to date by [`Post::refresh_counters`], which the
/// persist path calls before every write.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: ObjectId,
    pub content: String,
    pub author: ObjectId,
    pub image: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub like_count: u64,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Write version, bumped on every successful save.
    pub version: u64,
}

impl Post {
    pub fn new(author: ObjectId, content: String, image: String) -> Self {
        let now = Utc::now();
        Post {
            id: ObjectId::new(),
            content,
            author,
            image,
            likes: Vec::new(),
            comments: Vec::new(),
            like_count: 0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn refresh_counters(&mut self) {
        self.like_count = self.likes.len() as u64;
        self.comment_count = self.comments.len() as u64;
    }

    pub fn is_authored_by(&self, user: &ObjectId) -> bool {
        self.author == *user
    }

    pub fn has_liked(&self, user: &ObjectId) -> bool {
        self.likes.iter().any(|like| like.user == *user)
    }

    /// Removes the user's like if present, otherwise appends one. Returns whether
    /// the post is liked by `user` afterwards.
    pub fn toggle_like(&mut self, user: ObjectId) -> bool {
        if self.has_liked(&user) {
            self.likes.retain(|like| like.user != user);
            false
        } else {
            self.likes.push(Like {
                user,
                liked_at: Utc::now(),
            });
            true
        }
    }

    pub fn add_comment(&mut self, user: ObjectId, content: String) -> Comment {
        let comment = Comment {
            id: ObjectId::new(),
            user,
            content,
            created_at: Utc::now(),
        };
        self.comments.push(comment.clone());
        comment
    }

    pub fn find_comment(&self, id: &ObjectId) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == *id)
    }

    pub fn find_comment_mut(&mut self, id: &ObjectId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|comment| comment.id == *id)
    }

    pub fn remove_comment(&mut self, id: &ObjectId) -> Option<Comment> {
        let index = self.comments.iter().position(|comment| comment.id == *id)?;
        Some(self.comments.remove(index))
    }

    /// Comments newest first. Comments sharing a timestamp keep the later insertion first.
    pub fn comments_newest_first(&self) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self.comments.iter().rev().cloned().collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostRequest {
    pub content: Option<String>,
    pub image: Option<String>,
}

/// Post as returned by the API, with the author populated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub content: String,
    pub author: UserRef,
    pub image: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub like_count: u64,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, author: UserRef) -> Self {
        PostView {
            id: post.id,
            content: post.content,
            author,
            image: post.image,
            likes: post.likes,
            comments: post.comments,
            like_count: post.like_count,
            comment_count: post.comment_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post() -> Post {
        Post::new(ObjectId::new(), "hi".to_string(), String::new())
    }

    #[test]
    fn new_post_starts_empty() {
        let post = post();
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
        assert_eq!(post.like_count, 0);
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.version, 0);
    }

    #[test]
    fn counters_follow_sequences_after_refresh() {
        let mut post = post();
        post.toggle_like(ObjectId::new());
        post.toggle_like(ObjectId::new());
        post.add_comment(ObjectId::new(), "one".into());
        assert_eq!(post.like_count, 0);

        post.refresh_counters();
        assert_eq!(post.like_count, 2);
        assert_eq!(post.comment_count, 1);
    }

    #[test]
    fn toggling_twice_restores_likes() {
        let mut post = post();
        let existing = ObjectId::new();
        post.toggle_like(existing);
        let before = post.likes.clone();

        let user = ObjectId::new();
        assert!(post.toggle_like(user));
        assert!(post.has_liked(&user));
        assert!(!post.toggle_like(user));
        assert!(!post.has_liked(&user));
        assert_eq!(post.likes, before);
    }

    #[test]
    fn remove_comment_by_id() {
        let mut post = post();
        let keep = post.add_comment(ObjectId::new(), "keep".into());
        let gone = post.add_comment(ObjectId::new(), "drop".into());

        assert_eq!(post.remove_comment(&gone.id), Some(gone.clone()));
        assert_eq!(post.remove_comment(&gone.id), None);
        assert_eq!(post.comments, vec![keep]);
    }

    #[test]
    fn newest_first_ignores_insertion_order() {
        let mut post = post();
        let base = Utc::now();
        for (offset, text) in [(5, "middle"), (10, "newest"), (0, "oldest")] {
            let mut comment = post.add_comment(ObjectId::new(), text.into());
            comment.created_at = base + Duration::seconds(offset);
            let id = comment.id;
            *post.find_comment_mut(&id).unwrap() = comment;
        }

        let order: Vec<_> = post
            .comments_newest_first()
            .into_iter()
            .map(|c| c.content)
            .collect();
        assert_eq!(order, ["newest", "middle", "oldest"]);
    }
}
