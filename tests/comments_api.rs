mod common;

use actix_web::http::header::ContentType;
use actix_web::test;
use common::{app, bearer, create_post, register, send};
use serde_json::json;

#[actix_web::test]
async fn comment_lifecycle_respects_ownership() {
    let app = app().await;
    let (alice_id, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let post_id = create_post(&app, &alice, "hello").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/comments/{post_id}"))
        .insert_header(bearer(&alice))
        .set_json(json!({ "content": "first!" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 201);
    assert_eq!(body["message"], "Comment added successfully");
    assert_eq!(body["commentCount"], 1);
    assert_eq!(body["comment"]["user"]["_id"], alice_id);
    let comment_id = body["comment"]["_id"].as_str().unwrap().to_string();
    let uri = format!("/api/comments/{post_id}/{comment_id}");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&bob))
        .set_json(json!({ "content": "mine" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 403);
    assert_eq!(body["message"], "Not authorized to update this comment");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&bob))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 403);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&alice))
        .set_json(json!({ "content": "edited" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Comment updated successfully");
    assert_eq!(body["comment"]["content"], "edited");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&alice))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["commentCount"], 0);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&alice))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Comment not found");
}

#[actix_web::test]
async fn overlong_comment_is_rejected() {
    let app = app().await;
    let (_, token) = register(&app, "alice").await;
    let post_id = create_post(&app, &token, "hello").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/comments/{post_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "a".repeat(201) }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"][0]["message"], "Comment cannot exceed 200 characters");

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["post"]["commentCount"], 0);
}

#[actix_web::test]
async fn comments_are_paginated_newest_first() {
    let app = app().await;
    let (_, token) = register(&app, "alice").await;
    let post_id = create_post(&app, &token, "hello").await;

    for n in 0..15 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/comments/{post_id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "content": format!("comment {n}") }))
            .to_request();
        send(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/{post_id}?page=2&limit=10"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["comments"].as_array().unwrap().len(), 5);
    assert_eq!(body["comments"][4]["content"], "comment 0");
    assert_eq!(
        body["pagination"],
        json!({
            "currentPage": 2,
            "totalPages": 2,
            "totalComments": 15,
            "hasNext": false,
            "hasPrev": true
        })
    );
}

#[actix_web::test]
async fn listing_comments_of_missing_post_is_not_found() {
    let app = app().await;

    let req = test::TestRequest::get()
        .uri("/api/comments/0123456789abcdef01234567")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Post not found");
}

#[actix_web::test]
async fn unreadable_body_is_a_bad_request() {
    let app = app().await;
    let (_, token) = register(&app, "alice").await;
    let post_id = create_post(&app, &token, "hello").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/comments/{post_id}"))
        .insert_header(bearer(&token))
        .insert_header(ContentType::json())
        .set_payload("{not json")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "BAD_REQUEST_ERROR");
    assert_eq!(body["success"], false);

    let req = test::TestRequest::post()
        .uri(&format!("/api/comments/{post_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "content": 5 }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "BAD_REQUEST_ERROR");

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["post"]["commentCount"], 0);
}
