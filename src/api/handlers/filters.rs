use actix_web::{web, HttpResponse, Responder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::handlers::error_response;
use crate::api::state::AppState;
use crate::filters::catalog::FilterDefinition;
use crate::filters::{list, options, query, url};
use crate::models::filter::{Filter, Match};
use crate::utils::error::{AppError, AppResult};

/// Query parameters for option lookups
#[derive(Deserialize)]
pub struct OptionsQuery {
    /// Text typed so far
    #[serde(default)]
    q: String,
}

/// Request for validating a raw value
#[derive(Deserialize)]
pub struct ValidateRequest {
    value: String,
}

/// Request for applying a selected suggestion
#[derive(Deserialize)]
pub struct CompleteRequest {
    text: String,
    selected: String,
}

/// Request for compiling a URL filter list
#[derive(Deserialize)]
pub struct CompileRequest {
    /// Percent-encoded `filters` URL value
    #[serde(default)]
    filters: String,

    /// Match mode, server default when absent
    #[serde(rename = "match")]
    match_mode: Option<Match>,
}

/// Request for adding one value to a URL filter list
#[derive(Deserialize)]
pub struct AddFilterRequest {
    /// Percent-encoded `filters` URL value
    #[serde(default)]
    filters: String,
    id: String,
    #[serde(default)]
    negated: bool,
    value: String,
}

/// Response for a compiled filter list
#[derive(Serialize)]
struct CompileResponse {
    /// Percent-encoded backend query
    query: String,
    #[serde(rename = "match")]
    match_mode: Match,
    /// Page URL query string
    url: String,
    filters: Vec<Filter>,
}

/// Response for an updated filter list
#[derive(Serialize)]
struct FiltersResponse {
    /// Percent-encoded `filters` URL value
    filters: String,
    list: Vec<Filter>,
}

fn find_definition(state: &AppState, id: &str) -> AppResult<Arc<FilterDefinition>> {
    state
        .catalog
        .find(id)
        .ok_or_else(|| AppError::UnknownFilter(id.to_string()))
}

/// List filter definitions
pub async fn list_definitions(state: web::Data<AppState>) -> impl Responder {
    let definitions: Vec<&FilterDefinition> = state
        .catalog
        .definitions()
        .iter()
        .map(|def| def.as_ref())
        .collect();
    HttpResponse::Ok().json(definitions)
}

/// Autocomplete suggestions for a definition
pub async fn get_options(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<OptionsQuery>,
) -> impl Responder {
    let definition = match find_definition(&state, &path.into_inner()) {
        Ok(definition) => definition,
        Err(e) => return error_response(&e),
    };
    let options = definition.suggestions(&params.q, &state.cache, state.config.max_options);
    debug!("{} options for {}={:?}", options.len(), definition.id, params.q);
    HttpResponse::Ok().json(options)
}

/// Validate and normalize a raw value
pub async fn validate_value(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ValidateRequest>,
) -> impl Responder {
    let result = find_definition(&state, &path.into_inner())
        .and_then(|definition| definition.validate(&req.value).map_err(AppError::from));
    match result {
        Ok(value) => HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "value": value,
        })),
        Err(e) => error_response(&e),
    }
}

/// Apply a selected suggestion to the typed text
pub async fn complete_value(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<CompleteRequest>,
) -> impl Responder {
    match find_definition(&state, &path.into_inner()) {
        Ok(definition) => {
            HttpResponse::Ok().json(definition.check_completion(&req.text, &req.selected))
        }
        Err(e) => error_response(&e),
    }
}

/// Compile a URL filter list into the backend query
pub async fn compile_filters(
    state: web::Data<AppState>,
    req: web::Json<CompileRequest>,
) -> impl Responder {
    let match_mode = req.match_mode.unwrap_or(state.config.default_match);
    let filters = url::deserialize(&req.filters, &state.catalog, state.cache.as_ref()).await;
    let query = query::compile(&filters, match_mode);
    info!("Compiled {} filters with match {}", filters.len(), match_mode);

    HttpResponse::Ok().json(CompileResponse {
        query,
        match_mode,
        url: url::page_query(&filters, match_mode),
        filters,
    })
}

/// Validate a raw value and add it to a URL filter list
pub async fn add_filter(
    state: web::Data<AppState>,
    req: web::Json<AddFilterRequest>,
) -> impl Responder {
    match add_to_list(&state, &req).await {
        Ok(list) => HttpResponse::Ok().json(FiltersResponse {
            filters: url::serialize(&list),
            list,
        }),
        Err(e) => error_response(&e),
    }
}

async fn add_to_list(state: &AppState, req: &AddFilterRequest) -> AppResult<Vec<Filter>> {
    let definition = find_definition(state, &req.id)?;
    let normalized = definition.validate(&req.value)?;
    let value = options::create_filter_value(&definition, &normalized, state.cache.as_ref()).await;
    let mut filters = url::deserialize(&req.filters, &state.catalog, state.cache.as_ref()).await;
    list::add_filter_value(&mut filters, &definition, req.negated, value)?;
    Ok(filters)
}
