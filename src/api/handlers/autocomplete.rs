use actix_web::{web, HttpResponse, Responder};
use log::info;

use crate::api::state::AppState;

/// Replace cached namespaces
pub async fn set_namespaces(
    state: web::Data<AppState>,
    req: web::Json<Vec<String>>,
) -> impl Responder {
    let namespaces = req.into_inner();
    let count = namespaces.len();
    state.cache.set_namespaces(namespaces);
    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "count": count
    }))
}

/// Replace cached kinds
pub async fn set_kinds(
    state: web::Data<AppState>,
    req: web::Json<Vec<String>>,
) -> impl Responder {
    let kinds = req.into_inner();
    let count = kinds.len();
    state.cache.set_kinds(kinds);
    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "count": count
    }))
}

/// Replace cached names of a kind in a namespace
pub async fn set_names(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    req: web::Json<Vec<String>>,
) -> impl Responder {
    let (kind, namespace) = path.into_inner();
    let names = req.into_inner();
    let count = names.len();
    state.cache.set_names(&kind, &namespace, names);
    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "count": count
    }))
}

/// Drop all cached autocomplete data
pub async fn clear_cache(state: web::Data<AppState>) -> impl Responder {
    state.cache.clear();
    info!("Autocomplete cache cleared");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "message": "Autocomplete cache cleared"
    }))
}
