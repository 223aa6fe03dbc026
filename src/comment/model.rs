use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::post::post_model::Comment;
use crate::user::model::UserRef;
use crate::utils::helpers::serialize_object_id;

#[derive(Debug, Default, Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
}

/// Comment as returned by the API, with its author populated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub user: UserRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, user: UserRef) -> Self {
        CommentView {
            id: comment.id,
            user,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}
