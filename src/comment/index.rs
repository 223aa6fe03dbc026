use super::controller::{create_comment, delete_comment, get_post_comments, update_comment};
use crate::middleware::auth::verify_token;
use actix_web::{guard, web};
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .service(
                web::resource("/{post_id}")
                    .guard(guard::Get())
                    .route(web::get().to(get_post_comments)),
            )
            .service(
                web::resource("/{post_id}")
                    .guard(guard::Post())
                    .wrap(HttpAuthentication::bearer(verify_token))
                    .route(web::post().to(create_comment)),
            )
            .service(
                web::resource("/{post_id}/{comment_id}")
                    .wrap(HttpAuthentication::bearer(verify_token))
                    .route(web::put().to(update_comment))
                    .route(web::delete().to(delete_comment)),
            ),
    );
}
