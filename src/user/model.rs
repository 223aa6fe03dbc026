use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::helpers::serialize_object_id;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    /// bcrypt hash, never serialized into responses.
    pub password: String,
    pub profile_picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            profile_picture: self.profile_picture.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public fields used wherever a post, like or comment references a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub username: String,
    pub profile_picture: String,
}

/// The authenticated user's own account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub profile_picture: String,
    pub created_at: DateTime<Utc>,
}

/// A user reference in a response: the summary when the user exists, the bare id
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated(UserSummary),
    Unresolved(String),
}

impl UserRef {
    pub fn resolve(id: &ObjectId, users: &HashMap<ObjectId, UserSummary>) -> Self {
        match users.get(id) {
            Some(summary) => UserRef::Populated(summary.clone()),
            None => UserRef::Unresolved(id.to_hex()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}
