//! Browser surface: HTML pages, redirect-after-post and flash messages.
//!
//! Expected failures never surface as error pages here; they become flashes
//! on a `303 See Other`. Only store failures render the generic error page.

use std::collections::HashMap;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use clientes_core::{ClienteError, ClientePayload};

use crate::{
    flash::{flash_cookie, flash_key, Flash},
    http::AppState,
    views,
};

const MSG_CREATED: &str = "Cliente creado correctamente";
const MSG_UPDATED: &str = "Cliente actualizado";
const MSG_DELETED: &str = "Cliente eliminado";
const MSG_NOT_FOUND: &str = "Cliente no encontrado";
const MSG_INVALID_ID: &str = "ID inválido";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/cliente/nuevo", get(new_form).post(create))
        .route("/cliente/editar/{id}", get(edit_form).post(update))
        .route("/cliente/eliminar/{id}", post(delete))
}

type RawForm = Result<Form<HashMap<String, String>>, FormRejection>;

/// A body that is not a url-encoded form reads as an empty form.
fn payload(form: RawForm) -> ClientePayload {
    match form {
        Ok(Form(fields)) => ClientePayload::from_form(&fields),
        Err(e) => {
            tracing::debug!(error = %e, "unreadable form body; treating as empty");
            ClientePayload::default()
        }
    }
}

pub async fn index(State(st): State<AppState>, headers: HeaderMap) -> Response {
    let flashes = st.flashes.take(flash_key(&headers)).await;
    match st.svc.list().await {
        Ok(clientes) => Html(views::list_page(&clientes, &flashes)).into_response(),
        Err(e) => server_error(e),
    }
}

pub async fn new_form(State(st): State<AppState>, headers: HeaderMap) -> Response {
    let flashes = st.flashes.take(flash_key(&headers)).await;
    Html(views::new_page(&flashes)).into_response()
}

pub async fn create(State(st): State<AppState>, headers: HeaderMap, form: RawForm) -> Response {
    match st.svc.create(&payload(form)).await {
        Ok(_) => redirect_with(&st, &headers, "/", vec![Flash::success(MSG_CREATED)]).await,
        Err(ClienteError::Validation(errors)) => {
            let flashes = errors.iter().map(|e| Flash::error(e.form_message())).collect();
            redirect_with(&st, &headers, "/cliente/nuevo", flashes).await
        }
        Err(e) => server_error(e),
    }
}

pub async fn edit_form(
    State(st): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    match st.svc.get(&id).await {
        Ok(cliente) => {
            let flashes = st.flashes.take(flash_key(&headers)).await;
            Html(views::edit_page(&cliente, &flashes)).into_response()
        }
        Err(e) => lookup_failed(&st, &headers, e).await,
    }
}

pub async fn update(
    State(st): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    form: RawForm,
) -> Response {
    match st.svc.replace(&id, &payload(form)).await {
        Ok(_) => redirect_with(&st, &headers, "/", vec![Flash::success(MSG_UPDATED)]).await,
        Err(ClienteError::Validation(errors)) => {
            let flashes = errors.iter().map(|e| Flash::error(e.form_message())).collect();
            let back = format!("/cliente/editar/{}", id.trim());
            redirect_with(&st, &headers, &back, flashes).await
        }
        Err(e) => lookup_failed(&st, &headers, e).await,
    }
}

/// Always answers with a redirect; a missing record is only a flash.
pub async fn delete(
    State(st): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let flash = match st.svc.delete(&id).await {
        Ok(true) => Flash::success(MSG_DELETED),
        // Informational: the record is gone either way.
        Ok(false) => Flash::success(MSG_NOT_FOUND),
        Err(ClienteError::InvalidId(_)) => Flash::error(MSG_INVALID_ID),
        Err(e) => return server_error(e),
    };
    redirect_with(&st, &headers, "/", vec![flash]).await
}

async fn lookup_failed(st: &AppState, headers: &HeaderMap, err: ClienteError) -> Response {
    let flash = match err {
        ClienteError::InvalidId(_) => Flash::error(MSG_INVALID_ID),
        ClienteError::NotFound => Flash::error(MSG_NOT_FOUND),
        e => return server_error(e),
    };
    redirect_with(st, headers, "/", vec![flash]).await
}

async fn redirect_with(
    st: &AppState,
    headers: &HeaderMap,
    to: &str,
    flashes: Vec<Flash>,
) -> Response {
    let key = st.flashes.push(flash_key(headers), flashes).await;
    let mut resp = Redirect::to(to).into_response();
    resp.headers_mut()
        .insert(header::SET_COOKIE, flash_cookie(key));
    resp
}

fn server_error(err: ClienteError) -> Response {
    tracing::error!(error = %err, "form request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Html(views::error_page())).into_response()
}
