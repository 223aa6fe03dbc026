use crate::comment::index::comment_routes;
use crate::like::index::like_routes;
use crate::post::post_index::post_routes;
use crate::user::index::user_routes;
use crate::utils::helpers::service_name;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

#[get("/")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Social Media API is running!",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
    cfg.service(
        web::scope("/api")
            .configure(user_routes)
            .configure(post_routes)
            .configure(like_routes)
            .configure(comment_routes),
    );
}
