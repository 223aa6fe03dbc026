use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::comment::model::{CommentRequest, CommentView};
use crate::comment::service::CommentService;
use crate::middleware::auth::get_user_id_from_request;
use crate::post::post_model::Comment;
use crate::user::model::UserRef;
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use crate::utils::pagination::PageQuery;

async fn populate(
    user_service: &UserService,
    comments: Vec<Comment>,
) -> Result<Vec<CommentView>, CustomError> {
    let users = user_service
        .summaries(comments.iter().map(|comment| comment.user))
        .await?;

    Ok(comments
        .into_iter()
        .map(|comment| {
            let user = UserRef::resolve(&comment.user, &users);
            CommentView::new(comment, user)
        })
        .collect())
}

/// Add a comment to a post
/// POST /comments/{post_id}
pub async fn create_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;

    let (comment, comment_count) = comment_service
        .add_comment(&path.into_inner(), user_id, body.content.as_deref())
        .await?;
    let comment = populate(&user_service, vec![comment]).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Comment added successfully",
        "comment": comment.first(),
        "commentCount": comment_count
    })))
}

/// Get all comments for a post, newest first
/// GET /comments/{post_id}?page=&limit=
pub async fn get_post_comments(
    comment_service: web::Data<CommentService>,
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let page = comment_service
        .list_comments(&path.into_inner(), &query)
        .await?;
    let pagination = page.pagination_json("totalComments");
    let comments = populate(&user_service, page.items).await?;

    Ok(HttpResponse::Ok().json(json!({
        "comments": comments,
        "pagination": pagination
    })))
}

/// Update a comment
/// PUT /comments/{post_id}/{comment_id}
pub async fn update_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    user_service: web::Data<UserService>,
    path: web::Path<(String, String)>,
    body: web::Json<CommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    let (post_id, comment_id) = path.into_inner();

    let comment = comment_service
        .update_comment(&post_id, &comment_id, &user_id, body.content.as_deref())
        .await?;
    let comment = populate(&user_service, vec![comment]).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Comment updated successfully",
        "comment": comment.first()
    })))
}

/// Delete a comment
/// DELETE /comments/{post_id}/{comment_id}
pub async fn delete_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    let (post_id, comment_id) = path.into_inner();

    let comment_count = comment_service
        .delete_comment(&post_id, &comment_id, &user_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Comment deleted successfully",
        "commentCount": comment_count
    })))
}
