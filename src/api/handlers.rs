use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::logic::conceptos::{self, ConceptoError};
use crate::model::{Concepto, ConceptoStats, ConceptoUpdate, NewConcepto};
use crate::store::traits::ConceptoStore;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub mensaje: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub mensaje: String,
    pub cantidad: u64,
}

fn not_found_response(id: i64) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Concepto no encontrado", "id": id })),
    )
}

fn validation_response(contexto: &str, mensaje: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": contexto, "mensaje": mensaje })),
    )
}

// Fallthrough for storage and other unexpected faults: generic body, detail
// stays in the server log, the process keeps serving.
fn internal_error_response(e: ConceptoError) -> (StatusCode, Json<serde_json::Value>) {
    match &e {
        ConceptoError::Storage(inner) => log::error!("Storage backend failure: {:#}", inner),
        other => log::error!("Unexpected error: {}", other),
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Error interno del servidor" })),
    )
}

fn route_not_found(metodo: &Method, ruta: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Ruta no encontrada",
            "ruta": ruta,
            "metodo": metodo.as_str(),
        })),
    )
}

// The :id segment must be all digits; anything else ("buscar" aside, which
// has its own route) is answered like an unknown route, not a bad request.
fn parse_id_segment(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

pub async fn list_conceptos<S: ConceptoStore>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<Concepto>>, (StatusCode, Json<serde_json::Value>)> {
    match conceptos::get_all(&*store).await {
        Ok(items) => Ok(Json(items)),
        Err(e) => Err(internal_error_response(e)),
    }
}

pub async fn create_concepto<S: ConceptoStore>(
    State(store): State<AppState<S>>,
    payload: Result<RequestJson<NewConcepto>, JsonRejection>,
) -> Result<(StatusCode, Json<Concepto>), (StatusCode, Json<serde_json::Value>)> {
    let RequestJson(input) = payload.map_err(|_| {
        validation_response("Error al crear concepto", "JSON inválido".to_string())
    })?;

    match conceptos::create(&*store, input).await {
        Ok(concepto) => Ok((StatusCode::CREATED, Json(concepto))),
        Err(ConceptoError::Validation(mensaje)) => {
            Err(validation_response("Error al crear concepto", mensaje))
        }
        Err(e) => Err(internal_error_response(e)),
    }
}

pub async fn get_concepto<S: ConceptoStore>(
    State(store): State<AppState<S>>,
    method: Method,
    Path(id): Path<String>,
) -> Result<Json<Concepto>, (StatusCode, Json<serde_json::Value>)> {
    let Some(id) = parse_id_segment(&id) else {
        return Err(route_not_found(&method, &format!("/api/conceptos/{}", id)));
    };

    match conceptos::get_by_id(&*store, id).await {
        Ok(concepto) => Ok(Json(concepto)),
        Err(ConceptoError::NotFound { id }) => Err(not_found_response(id)),
        Err(e) => Err(internal_error_response(e)),
    }
}

pub async fn update_concepto<S: ConceptoStore>(
    State(store): State<AppState<S>>,
    method: Method,
    Path(id): Path<String>,
    payload: Result<RequestJson<ConceptoUpdate>, JsonRejection>,
) -> Result<Json<Concepto>, (StatusCode, Json<serde_json::Value>)> {
    let Some(id) = parse_id_segment(&id) else {
        return Err(route_not_found(&method, &format!("/api/conceptos/{}", id)));
    };

    let RequestJson(patch) = payload.map_err(|_| {
        validation_response("Error al actualizar concepto", "JSON inválido".to_string())
    })?;

    match conceptos::update(&*store, id, patch).await {
        Ok(concepto) => Ok(Json(concepto)),
        Err(ConceptoError::Validation(mensaje)) => {
            Err(validation_response("Error al actualizar concepto", mensaje))
        }
        Err(ConceptoError::NotFound { id }) => Err(not_found_response(id)),
        Err(e) => Err(internal_error_response(e)),
    }
}

pub async fn delete_concepto<S: ConceptoStore>(
    State(store): State<AppState<S>>,
    method: Method,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, (StatusCode, Json<serde_json::Value>)> {
    let Some(id) = parse_id_segment(&id) else {
        return Err(route_not_found(&method, &format!("/api/conceptos/{}", id)));
    };

    match conceptos::delete_one(&*store, id).await {
        Ok(()) => Ok(Json(DeleteResponse {
            mensaje: "Concepto eliminado".to_string(),
            id,
        })),
        Err(ConceptoError::NotFound { id }) => Err(not_found_response(id)),
        Err(e) => Err(internal_error_response(e)),
    }
}

pub async fn delete_all_conceptos<S: ConceptoStore>(
    State(store): State<AppState<S>>,
) -> Result<Json<DeleteAllResponse>, (StatusCode, Json<serde_json::Value>)> {
    match conceptos::delete_all(&*store).await {
        Ok(cantidad) => Ok(Json(DeleteAllResponse {
            mensaje: "Todos los conceptos eliminados".to_string(),
            cantidad,
        })),
        Err(e) => Err(internal_error_response(e)),
    }
}

pub async fn search_conceptos<S: ConceptoStore>(
    State(store): State<AppState<S>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Concepto>>, (StatusCode, Json<serde_json::Value>)> {
    match conceptos::search(&*store, params.q.as_deref()).await {
        Ok(items) => Ok(Json(items)),
        Err(ConceptoError::Validation(mensaje)) => {
            Err((StatusCode::BAD_REQUEST, Json(json!({ "error": mensaje }))))
        }
        Err(e) => Err(internal_error_response(e)),
    }
}

pub async fn get_stats<S: ConceptoStore>(
    State(store): State<AppState<S>>,
) -> Result<Json<ConceptoStats>, (StatusCode, Json<serde_json::Value>)> {
    match conceptos::stats(&*store).await {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => Err(internal_error_response(e)),
    }
}

/// CORS preflight for the registered routes.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Anything not in the routing table: 200 for preflight, JSON 404 otherwise.
pub async fn route_fallback(method: Method, uri: Uri) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    route_not_found(&method, uri.path()).into_response()
}
