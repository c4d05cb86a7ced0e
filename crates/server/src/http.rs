use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clientes_core::{
    api::{DeleteResponse, ErrorResponse},
    Cliente, ClienteError, ClientePayload,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{flash::FlashStore, forms, service::ClienteService};

#[derive(Clone)]
pub struct AppState {
    pub svc: ClienteService,
    pub flashes: Arc<FlashStore>,
}

impl AppState {
    pub fn new(svc: ClienteService) -> Self {
        Self {
            svc,
            flashes: Arc::new(FlashStore::new()),
        }
    }
}

/// Full application: JSON API under `/api`, HTML forms everywhere else.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/clientes", get(list_clientes).post(create_cliente))
        .route(
            "/api/clientes/{id}",
            get(get_cliente)
                .put(update_cliente)
                .patch(update_cliente)
                .delete(delete_cliente),
        )
        .merge(forms::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

pub async fn list_clientes(State(st): State<AppState>) -> Result<Json<Vec<Cliente>>, AppError> {
    Ok(Json(st.svc.list().await?))
}

pub async fn get_cliente(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cliente>, AppError> {
    Ok(Json(st.svc.get(&id).await?))
}

/// The body is read leniently; see [`ClientePayload::from_json_bytes`].
pub async fn create_cliente(
    State(st): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Cliente>), AppError> {
    let raw = ClientePayload::from_json_bytes(&body);
    let created = st.svc.create(&raw).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Serves both PUT and PATCH with partial-update semantics.
pub async fn update_cliente(
    State(st): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Cliente>, AppError> {
    let raw = ClientePayload::from_json_bytes(&body);
    Ok(Json(st.svc.patch(&id, &raw).await?))
}

pub async fn delete_cliente(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    if !st.svc.delete(&id).await? {
        return Err(ClienteError::NotFound.into());
    }
    Ok(Json(DeleteResponse { deleted: true }))
}

#[derive(Debug)]
pub struct AppError(pub ClienteError);

impl From<ClienteError> for AppError {
    fn from(value: ClienteError) -> Self {
        Self(value)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClienteError::Validation(_) | ClienteError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ClienteError::NotFound => StatusCode::NOT_FOUND,
            ClienteError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }
        let body = Json(ErrorResponse::new(self.0.api_message()));
        (status, body).into_response()
    }
}
