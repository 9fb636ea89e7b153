use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::api::handlers::{
    autocomplete::{clear_cache, set_kinds, set_names, set_namespaces},
    filters::{
        add_filter, compile_filters, complete_value, get_options, list_definitions, validate_value,
    },
};

/// Root endpoint to provide information about the API
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "FlowFilter API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Network flow filter catalog and query compiler",
        "endpoints": [
            {
                "path": "/api/filters/definitions",
                "method": "GET",
                "description": "List filter definitions"
            },
            {
                "path": "/api/filters/{id}/options",
                "method": "GET",
                "description": "Autocomplete suggestions for a filter (query param q)"
            },
            {
                "path": "/api/filters/{id}/validate",
                "method": "POST",
                "description": "Validate and normalize a raw value"
            },
            {
                "path": "/api/filters/{id}/complete",
                "method": "POST",
                "description": "Apply a selected suggestion to the typed text"
            },
            {
                "path": "/api/filters/compile",
                "method": "POST",
                "description": "Compile a URL filter list into the backend query"
            },
            {
                "path": "/api/filters/add",
                "method": "POST",
                "description": "Add a value to a URL filter list"
            },
            {
                "path": "/api/autocomplete/namespaces",
                "method": "PUT",
                "description": "Replace cached namespaces"
            },
            {
                "path": "/api/autocomplete/kinds",
                "method": "PUT",
                "description": "Replace cached kinds"
            },
            {
                "path": "/api/autocomplete/names/{kind}/{namespace}",
                "method": "PUT",
                "description": "Replace cached names of a kind in a namespace"
            },
            {
                "path": "/api/autocomplete",
                "method": "DELETE",
                "description": "Clear the autocomplete cache"
            }
        ]
    }))
}

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Root endpoint
        .route("/", web::get().to(index))
        .service(
            web::scope("/api")
                // Filter catalog and compiler
                .service(
                    web::scope("/filters")
                        .route("/definitions", web::get().to(list_definitions))
                        .route("/compile", web::post().to(compile_filters))
                        .route("/add", web::post().to(add_filter))
                        .route("/{id}/options", web::get().to(get_options))
                        .route("/{id}/validate", web::post().to(validate_value))
                        .route("/{id}/complete", web::post().to(complete_value))
                )
                // Autocomplete cache
                .service(
                    web::scope("/autocomplete")
                        .route("", web::delete().to(clear_cache))
                        .route("/namespaces", web::put().to(set_namespaces))
                        .route("/kinds", web::put().to(set_kinds))
                        .route("/names/{kind}/{namespace}", web::put().to(set_names))
                )
        );
}
