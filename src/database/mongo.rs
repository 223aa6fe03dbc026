use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{DateTime as BsonDateTime, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use crate::database::store::{PostStore, StoreError, UserStore};
use crate::post::post_model::{Comment, Like, Post};
use crate::user::model::User;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikeRecord {
    user: ObjectId,
    liked_at: BsonDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    user: ObjectId,
    content: String,
    created_at: BsonDateTime,
}

/// Stored shape of a post document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    content: String,
    author: ObjectId,
    #[serde(default)]
    image: String,
    #[serde(default)]
    likes: Vec<LikeRecord>,
    #[serde(default)]
    comments: Vec<CommentRecord>,
    #[serde(default)]
    like_count: i64,
    #[serde(default)]
    comment_count: i64,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
    #[serde(rename = "__v", default)]
    version: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    username: String,
    email: String,
    password: String,
    #[serde(default)]
    profile_picture: String,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

fn to_bson(time: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(time.timestamp_millis())
}

fn from_bson(time: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(time.timestamp_millis()).unwrap_or_default()
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        PostRecord {
            id: post.id,
            content: post.content.clone(),
            author: post.author,
            image: post.image.clone(),
            likes: post
                .likes
                .iter()
                .map(|like| LikeRecord {
                    user: like.user,
                    liked_at: to_bson(like.liked_at),
                })
                .collect(),
            comments: post
                .comments
                .iter()
                .map(|comment| CommentRecord {
                    id: comment.id,
                    user: comment.user,
                    content: comment.content.clone(),
                    created_at: to_bson(comment.created_at),
                })
                .collect(),
            like_count: post.like_count as i64,
            comment_count: post.comment_count as i64,
            created_at: to_bson(post.created_at),
            updated_at: to_bson(post.updated_at),
            version: post.version as i64,
        }
    }
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Post {
            id: record.id,
            content: record.content,
            author: record.author,
            image: record.image,
            likes: record
                .likes
                .into_iter()
                .map(|like| Like {
                    user: like.user,
                    liked_at: from_bson(like.liked_at),
                })
                .collect(),
            comments: record
                .comments
                .into_iter()
                .map(|comment| Comment {
                    id: comment.id,
                    user: comment.user,
                    content: comment.content,
                    created_at: from_bson(comment.created_at),
                })
                .collect(),
            like_count: record.like_count.max(0) as u64,
            comment_count: record.comment_count.max(0) as u64,
            created_at: from_bson(record.created_at),
            updated_at: from_bson(record.updated_at),
            version: record.version.max(0) as u64,
        }
    }
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        UserRecord {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            profile_picture: user.profile_picture.clone(),
            created_at: to_bson(user.created_at),
            updated_at: to_bson(user.updated_at),
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            username: record.username,
            email: record.email,
            password: record.password,
            profile_picture: record.profile_picture,
            created_at: from_bson(record.created_at),
            updated_at: from_bson(record.updated_at),
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write)) if write.code == DUPLICATE_KEY
    )
}

fn author_filter(author: Option<&ObjectId>) -> mongodb::bson::Document {
    match author {
        Some(author) => doc! { "author": author },
        None => doc! {},
    }
}

#[derive(Clone)]
pub struct MongoStore {
    posts: Collection<PostRecord>,
    users: Collection<UserRecord>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        MongoStore {
            posts: db.collection::<PostRecord>("posts"),
            users: db.collection::<UserRecord>("users"),
        }
    }

    /// Listing indexes for posts and uniqueness for usernames and emails.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.posts
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "author": 1, "createdAt": -1 })
                    .build(),
                IndexModel::builder().keys(doc! { "createdAt": -1 }).build(),
            ])
            .await?;

        let unique = IndexOptions::builder().unique(true).build();
        self.users
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique.clone())
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique)
                    .build(),
            ])
            .await?;

        log::info!("MongoDB indexes are in place");
        Ok(())
    }
}

#[async_trait]
impl PostStore for MongoStore {
    async fn find_post(&self, id: &ObjectId) -> Result<Option<Post>, StoreError> {
        let record = self.posts.find_one(doc! { "_id": id }).await?;
        Ok(record.map(Post::from))
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        self.posts.insert_one(PostRecord::from(post)).await?;
        Ok(())
    }

    async fn replace_post(
        &self,
        post: &Post,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        let result = self
            .posts
            .replace_one(
                doc! { "_id": post.id, "__v": expected_version as i64 },
                PostRecord::from(post),
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_post(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self.posts.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_posts(
        &self,
        author: Option<&ObjectId>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, StoreError> {
        let cursor = self
            .posts
            .find(author_filter(author))
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?;

        let records: Vec<PostRecord> = cursor.try_collect().await?;
        Ok(records.into_iter().map(Post::from).collect())
    }

    async fn count_posts(&self, author: Option<&ObjectId>) -> Result<u64, StoreError> {
        Ok(self.posts.count_documents(author_filter(author)).await?)
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        let record = self.users.find_one(doc! { "_id": id }).await?;
        Ok(record.map(User::from))
    }

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .users
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        let records: Vec<UserRecord> = cursor.try_collect().await?;
        Ok(records.into_iter().map(User::from).collect())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let record = self.users.find_one(doc! { "username": username }).await?;
        Ok(record.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let record = self.users.find_one(doc! { "email": email }).await?;
        Ok(record.map(User::from))
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        match self.users.insert_one(UserRecord::from(user)).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::Duplicate(err.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_record_keeps_embedded_sequences() {
        let mut post = Post::new(ObjectId::new(), "hello".into(), "pic.png".into());
        post.toggle_like(ObjectId::new());
        post.add_comment(ObjectId::new(), "first".into());
        post.refresh_counters();
        post.version = 4;

        let record = PostRecord::from(&post);
        assert_eq!(record.like_count, 1);
        assert_eq!(record.comment_count, 1);
        assert_eq!(record.version, 4);

        let restored = Post::from(record);
        assert_eq!(restored.likes.len(), 1);
        assert_eq!(restored.comments[0].content, "first");
        assert_eq!(restored.comments[0].id, post.comments[0].id);
        assert_eq!(restored.version, 4);
        assert_eq!(
            restored.created_at.timestamp_millis(),
            post.created_at.timestamp_millis()
        );
    }

    #[test]
    fn record_uses_document_field_names() {
        let post = Post::new(ObjectId::new(), "hello".into(), String::new());
        let document = mongodb::bson::to_document(&PostRecord::from(&post)).unwrap();
        for key in [
            "_id",
            "content",
            "author",
            "image",
            "likes",
            "comments",
            "likeCount",
            "commentCount",
            "createdAt",
            "updatedAt",
            "__v",
        ] {
            assert!(document.contains_key(key), "missing {key}");
        }
    }
}
