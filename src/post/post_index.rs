use super::post_controller::{
    create_post, delete_post, get_post, get_posts, get_user_posts, update_post,
};
use crate::middleware::auth::verify_token;
use actix_web::{guard, web};
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .route("/user/{user_id}", web::get().to(get_user_posts))
            .service(
                web::resource("")
                    .guard(guard::Get())
                    .route(web::get().to(get_posts)),
            )
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .wrap(HttpAuthentication::bearer(verify_token))
                    .route(web::post().to(create_post)),
            )
            .service(
                web::resource("/{id}")
                    .guard(guard::Get())
                    .route(web::get().to(get_post)),
            )
            .service(
                web::resource("/{id}")
                    .wrap(HttpAuthentication::bearer(verify_token))
                    .route(web::put().to(update_post))
                    .route(web::delete().to(delete_post)),
            ),
    );
}
