use std::sync::Arc;

use actix_web::web;

use crate::comment::service::CommentService;
use crate::config::AppConfig;
use crate::database::store::{PostStore, UserStore};
use crate::like::service::LikeService;
use crate::middleware::auth::TokenService;
use crate::middleware::error_handler::json_config;
use crate::post::post_service::PostService;
use crate::router::index::routes;
use crate::user::service::UserService;

/// Services shared by every worker. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub posts: web::Data<PostService>,
    pub likes: web::Data<LikeService>,
    pub comments: web::Data<CommentService>,
    pub users: web::Data<UserService>,
    pub tokens: web::Data<TokenService>,
}

impl AppState {
    pub fn new(
        post_store: Arc<dyn PostStore>,
        user_store: Arc<dyn UserStore>,
        config: &AppConfig,
    ) -> Self {
        let posts = Arc::new(PostService::new(post_store));

        AppState {
            likes: web::Data::new(LikeService::new(posts.clone())),
            comments: web::Data::new(CommentService::new(posts.clone())),
            posts: web::Data::from(posts),
            users: web::Data::new(UserService::new(user_store, config.bcrypt_cost)),
            tokens: web::Data::new(TokenService::new(&config.jwt_secret, config.jwt_expiry)),
        }
    }
}

/// Registers shared services, the JSON body config and all routes.
pub fn app_config(state: &AppState, cfg: &mut web::ServiceConfig) {
    cfg.app_data(state.posts.clone())
        .app_data(state.likes.clone())
        .app_data(state.comments.clone())
        .app_data(state.users.clone())
        .app_data(state.tokens.clone())
        .app_data(json_config())
        .configure(routes);
}
