use super::controller::{like_status, liked_users, toggle_like};
use crate::middleware::auth::verify_token;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn like_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/likes")
            .route("/{post_id}/users", web::get().to(liked_users))
            .service(
                web::resource("/{post_id}")
                    .wrap(HttpAuthentication::bearer(verify_token))
                    .route(web::post().to(toggle_like))
                    .route(web::get().to(like_status)),
            ),
    );
}
