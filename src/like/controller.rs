use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::like::model::LikerView;
use crate::like::service::LikeService;
use crate::middleware::auth::get_user_id_from_request;
use crate::user::model::UserRef;
use crate::user::service::UserService;
use crate::utils::error::CustomError;

/// Like or unlike a post
/// POST /likes/{post_id}
pub async fn toggle_like(
    req: HttpRequest,
    like_service: web::Data<LikeService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    let toggle = like_service.toggle_like(&path.into_inner(), user_id).await?;

    let message = if toggle.liked {
        "Post liked successfully"
    } else {
        "Post unliked successfully"
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": message,
        "liked": toggle.liked,
        "likeCount": toggle.like_count
    })))
}

/// Check if the caller has liked a post
/// GET /likes/{post_id}
pub async fn like_status(
    req: HttpRequest,
    like_service: web::Data<LikeService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    let status = like_service.has_liked(&path.into_inner(), &user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "hasLiked": status.has_liked,
        "likeCount": status.like_count
    })))
}

/// Users who liked a post
/// GET /likes/{post_id}/users
pub async fn liked_users(
    like_service: web::Data<LikeService>,
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let (likes, like_count) = like_service.list_likers(&path.into_inner()).await?;
    let users = user_service.summaries(likes.iter().map(|like| like.user)).await?;

    let liked_users: Vec<LikerView> = likes
        .into_iter()
        .map(|like| LikerView {
            user: UserRef::resolve(&like.user, &users),
            liked_at: like.liked_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "likedUsers": liked_users,
        "likeCount": like_count
    })))
}
