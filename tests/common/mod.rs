#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, Error, test};
use serde_json::{Value, json};

use social_media_api::config::AppConfig;
use social_media_api::database::MemoryStore;
use social_media_api::middleware::cors::cors;
use social_media_api::middleware::error_handler::error_handlers;
use social_media_api::state::{AppState, app_config};

pub const ALLOWED_ORIGINS: &str = "*";

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "test-secret".to_string(),
        bcrypt_cost: 4,
        ..AppConfig::default()
    }
}

pub async fn app()
-> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), store, &test_config());

    test::init_service(
        App::new()
            .wrap(error_handlers())
            .wrap(cors(ALLOWED_ORIGINS))
            .configure(move |cfg| app_config(&state, cfg)),
    )
    .await
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Sends the request and returns the status code with the parsed JSON body.
pub async fn send<S, B>(app: &S, req: Request) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

/// Registers a user and returns their id and token.
pub async fn register<S, B>(app: &S, username: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123"
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, 201, "register failed: {body}");

    (
        body["user"]["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

/// Creates a post as the given user and returns its id.
pub async fn create_post<S, B>(app: &S, token: &str, content: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(token))
        .set_json(json!({ "content": content }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, 201, "create post failed: {body}");

    body["post"]["_id"].as_str().unwrap().to_string()
}
