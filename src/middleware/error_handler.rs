use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpRequest, HttpResponse, Result, error::JsonPayloadError, web};
use serde_json::json;

use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;

/// Rewrites framework-generated 404/401 responses (unknown route, missing bearer
/// token) into the JSON error shape. Responses that already carry JSON pass through.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found)
        .handler(StatusCode::UNAUTHORIZED, unauthorized)
}

/// Malformed or non-JSON request bodies become a 400 in the usual error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    CustomError::BadRequestError(format!("Invalid request body: {err}")).into()
}

fn not_found<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    json_fallback(res, "Route does not exist", "NOT_FOUND_ERROR")
}

fn unauthorized<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    json_fallback(res, "No token, authorization denied", "UNAUTHORIZED_ERROR")
}

fn json_fallback<B>(
    res: ServiceResponse<B>,
    message: &str,
    error: &str,
) -> Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = res.status();
    let mut new_response = HttpResponse::build(status).json(json!({
        "success": false,
        "message": message,
        "httpStatusCode": status.as_u16(),
        "error": error,
        "service": service_name(),
    }));
    // Carry over headers set further in, such as WWW-Authenticate.
    for (name, value) in res.headers() {
        if *name != header::CONTENT_TYPE && *name != header::CONTENT_LENGTH {
            new_response
                .headers_mut()
                .append(name.clone(), value.clone());
        }
    }
    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, new_response).map_into_right_body();

    Ok(ErrorHandlerResponse::Response(res))
}
