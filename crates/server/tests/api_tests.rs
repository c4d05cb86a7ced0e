use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use clientes_core::new_cliente_id;
use clientes_server::{
    http::{self, AppState},
    service::ClienteService,
    store::InMemoryStore,
};
use serde_json::{json, Value};

fn state() -> AppState {
    AppState::new(ClienteService::new(Arc::new(InMemoryStore::new())))
}

async fn read(resp: impl IntoResponse) -> (StatusCode, Value) {
    let resp = resp.into_response();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn body(v: Value) -> Bytes {
    Bytes::from(serde_json::to_vec(&v).unwrap())
}

async fn create(st: &AppState, v: Value) -> (StatusCode, Value) {
    read(http::create_cliente(State(st.clone()), body(v)).await).await
}

#[tokio::test]
async fn create_normalizes_and_assigns_id() {
    let st = state();
    let (status, rec) = create(
        &st,
        json!({"nombre": "Ana", "dni": "123", "email": "a@b.com", "fecha_nacimiento": "17/05/2020"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rec["fecha_nacimiento"], "2020-05-17");
    assert_eq!(rec["nombre"], "Ana");
    assert_eq!(rec["dni"], "123");
    assert!(!rec["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_non_numeric_dni() {
    let st = state();
    let (status, err) = create(&st, json!({"nombre": "Ana", "dni": "abc"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({"error": "dni debe ser numérico"}));
    let (_, all) = read(http::list_clientes(State(st)).await).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn create_reports_first_failure_only() {
    let st = state();
    let (status, err) = create(&st, json!({"email": "sin-arroba"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({"error": "nombre es requerido"}));
}

#[tokio::test]
async fn create_rejects_bad_date() {
    let st = state();
    let (status, err) = create(&st, json!({"nombre": "Ana", "fecha_nacimiento": "2020/05/17"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({"error": "fecha inválida"}));
}

#[tokio::test]
async fn create_with_unparseable_body_asks_for_nombre() {
    let st = state();
    let (status, err) = read(
        http::create_cliente(State(st.clone()), Bytes::from_static(b"{not json")).await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "nombre es requerido");
}

#[tokio::test]
async fn list_returns_records_in_creation_order() {
    let st = state();
    let expected: Vec<Value> = (0..50).map(|i| json!(format!("c{i:02}"))).collect();
    for nombre in &expected {
        create(&st, json!({"nombre": nombre})).await;
    }
    let (status, all) = read(http::list_clientes(State(st)).await).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = all.as_array().unwrap().iter().map(|c| c["nombre"].clone()).collect();
    assert_eq!(names, expected);
    assert!(all[0]["dni"].is_null());
}

#[tokio::test]
async fn get_existing_record() {
    let st = state();
    let (_, rec) = create(&st, json!({"nombre": "Ana"})).await;
    let id = rec["id"].as_str().unwrap().to_string();
    let (status, fetched) = read(http::get_cliente(State(st), Path(id)).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, rec);
}

#[tokio::test]
async fn get_missing_record_is_404() {
    let st = state();
    let id = new_cliente_id().to_string();
    let (status, err) = read(http::get_cliente(State(st), Path(id)).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err, json!({"error": "cliente no encontrado"}));
}

#[tokio::test]
async fn get_malformed_id_is_400() {
    let st = state();
    let (status, err) = read(http::get_cliente(State(st), Path("123abc".into())).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({"error": "id inválido"}));
}

#[tokio::test]
async fn patch_updates_only_sent_fields() {
    let st = state();
    let (_, rec) = create(
        &st,
        json!({"nombre": "Ana", "dni": "123", "fecha_nacimiento": "2020-05-17"}),
    )
    .await;
    let id = rec["id"].as_str().unwrap().to_string();
    let (status, updated) = read(
        http::update_cliente(State(st.clone()), Path(id.clone()), body(json!({"email": "x@y.com"})))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "x@y.com");
    assert_eq!(updated["nombre"], "Ana");
    assert_eq!(updated["dni"], "123");
    assert_eq!(updated["fecha_nacimiento"], "2020-05-17");

    let (_, fetched) = read(http::get_cliente(State(st), Path(id)).await).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn patch_with_bad_field_commits_nothing() {
    let st = state();
    let (_, rec) = create(&st, json!({"nombre": "Ana"})).await;
    let id = rec["id"].as_str().unwrap().to_string();
    let (status, err) = read(
        http::update_cliente(
            State(st.clone()),
            Path(id.clone()),
            body(json!({"nombre": "Otra", "email": "sin-arroba"})),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({"error": "email inválido"}));
    let (_, fetched) = read(http::get_cliente(State(st), Path(id)).await).await;
    assert_eq!(fetched["nombre"], "Ana");
}

#[tokio::test]
async fn patch_accepts_empty_nombre() {
    let st = state();
    let (_, rec) = create(&st, json!({"nombre": "Ana"})).await;
    let id = rec["id"].as_str().unwrap().to_string();
    let (status, updated) =
        read(http::update_cliente(State(st), Path(id), body(json!({"nombre": ""}))).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["nombre"], "");
}

#[tokio::test]
async fn patch_unknown_or_malformed_id() {
    let st = state();
    let missing = new_cliente_id().to_string();
    let (status, _) = read(
        http::update_cliente(State(st.clone()), Path(missing), body(json!({"nombre": "x"}))).await,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, err) =
        read(http::update_cliente(State(st), Path("bad".into()), body(json!({}))).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "id inválido");
}

#[tokio::test]
async fn delete_then_delete_again() {
    let st = state();
    let (_, rec) = create(&st, json!({"nombre": "Ana"})).await;
    let id = rec["id"].as_str().unwrap().to_string();

    let (status, ok) = read(http::delete_cliente(State(st.clone()), Path(id.clone())).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ok, json!({"deleted": true}));

    let (status, err) = read(http::delete_cliente(State(st), Path(id)).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err, json!({"error": "cliente no encontrado"}));
}

#[tokio::test]
async fn delete_malformed_id_is_400() {
    let st = state();
    let (status, err) = read(http::delete_cliente(State(st), Path("x".into())).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({"error": "id inválido"}));
}
