pub mod autocomplete;
pub mod filters;

use actix_web::HttpResponse;

use crate::utils::error::AppError;

/// JSON error body with a status matching the error kind
pub fn error_response(err: &AppError) -> HttpResponse {
    // validation reasons are shown to the user verbatim
    let message = match err {
        AppError::Validation(e) => e.reason.clone(),
        _ => err.to_string(),
    };
    let body = serde_json::json!({
        "status": "error",
        "message": message,
    });
    match err {
        AppError::Validation(_) => HttpResponse::BadRequest().json(body),
        AppError::UnknownFilter(_) => HttpResponse::NotFound().json(body),
        AppError::DuplicateFilter => HttpResponse::Conflict().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
