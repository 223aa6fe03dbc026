use actix_web::{HttpRequest, HttpResponse, web};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::middleware::auth::get_user_id_from_request;
use crate::post::post_model::{Post, PostRequest, PostView};
use crate::post::post_service::{PostService, parse_post_id};
use crate::user::model::UserRef;
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use crate::utils::pagination::PageQuery;

async fn populate(
    user_service: &UserService,
    posts: Vec<Post>,
) -> Result<Vec<PostView>, CustomError> {
    let users = user_service
        .summaries(posts.iter().map(|post| post.author))
        .await?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let author = UserRef::resolve(&post.author, &users);
            PostView::new(post, author)
        })
        .collect())
}

async fn populate_one(user_service: &UserService, post: Post) -> Result<PostView, CustomError> {
    let author = match user_service.find_user(&post.author).await? {
        Some(user) => UserRef::Populated(user.summary()),
        None => UserRef::Unresolved(post.author.to_hex()),
    };
    Ok(PostView::new(post, author))
}

/// Create a post
/// POST /posts
pub async fn create_post(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    user_service: web::Data<UserService>,
    body: web::Json<PostRequest>,
) -> Result<HttpResponse, CustomError> {
    let author = get_user_id_from_request(&req)?;
    let post = post_service.create_post(author, body.into_inner()).await?;
    let post = populate_one(&user_service, post).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Post created successfully",
        "post": post
    })))
}

/// Get all posts, newest first
/// GET /posts?page=&limit=
pub async fn get_posts(
    post_service: web::Data<PostService>,
    user_service: web::Data<UserService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let page = post_service.list_posts(None, &query).await?;
    let pagination = page.pagination_json("totalPosts");
    let posts = populate(&user_service, page.items).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": pagination
    })))
}

/// Get posts written by one user
/// GET /posts/user/{user_id}?page=&limit=
pub async fn get_user_posts(
    post_service: web::Data<PostService>,
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let user_id = ObjectId::parse_str(path.into_inner())
        .map_err(|_| CustomError::NotFoundError("User not found".into()))?;

    let page = post_service.list_posts(Some(&user_id), &query).await?;
    let pagination = page.pagination_json("totalPosts");
    let posts = populate(&user_service, page.items).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": pagination
    })))
}

/// Get a single post
/// GET /posts/{id}
pub async fn get_post(
    post_service: web::Data<PostService>,
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service.get_post(&parse_post_id(&path)?).await?;
    let post = populate_one(&user_service, post).await?;

    Ok(HttpResponse::Ok().json(json!({ "post": post })))
}

/// Update a post (author only)
/// PUT /posts/{id}
pub async fn update_post(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<PostRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    let post = post_service
        .update_post(&parse_post_id(&path)?, &user_id, body.into_inner())
        .await?;
    let post = populate_one(&user_service, post).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Post updated successfully",
        "post": post
    })))
}

/// Delete a post (author only)
/// DELETE /posts/{id}
pub async fn delete_post(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    post_service
        .delete_post(&parse_post_id(&path)?, &user_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Post deleted successfully" })))
}
