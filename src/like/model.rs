use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::user::model::UserRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeStatus {
    pub has_liked: bool,
    pub like_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikerView {
    pub user: UserRef,
    pub liked_at: DateTime<Utc>,
}
