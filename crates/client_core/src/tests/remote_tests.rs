use super::*;
use std::{collections::HashMap, num::NonZeroU32, sync::Arc};

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServiceState {
    list_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    created: Arc<Mutex<Vec<FreelancerFields>>>,
    updated: Arc<Mutex<Vec<(i64, Freelancer)>>>,
    deleted: Arc<Mutex<Vec<i64>>>,
}

fn sample(id: i64, username: &str) -> Freelancer {
    Freelancer {
        id: FreelancerId(id),
        fields: FreelancerFields {
            username: username.into(),
            email: format!("{username}@example.com"),
            phone_number: "0123456789".into(),
            skillsets: "rust".into(),
            hobby: "chess".into(),
        },
    }
}

async fn handle_list(
    State(state): State<ServiceState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Freelancer>> {
    state.list_queries.lock().await.push(params);
    Json(vec![sample(1, "alice"), sample(2, "bob")])
}

async fn handle_create(
    State(state): State<ServiceState>,
    Json(fields): Json<FreelancerFields>,
) -> Response {
    match fields.username.as_str() {
        "taken" => {
            return (StatusCode::CONFLICT, "\"Username already exists\"").into_response();
        }
        "boom" => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "silent" => return StatusCode::CREATED.into_response(),
        _ => {}
    }
    state.created.lock().await.push(fields.clone());
    (
        StatusCode::CREATED,
        Json(Freelancer {
            id: FreelancerId(7),
            fields,
        }),
    )
        .into_response()
}

async fn handle_update(
    State(state): State<ServiceState>,
    Path(id): Path<i64>,
    Json(record): Json<Freelancer>,
) -> Response {
    match id {
        404 => return StatusCode::NOT_FOUND.into_response(),
        422 => return (StatusCode::OK, "updated").into_response(),
        _ => {}
    }
    state.updated.lock().await.push((id, record.clone()));
    if id == 204 {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(record).into_response()
}

async fn handle_delete(State(state): State<ServiceState>, Path(id): Path<i64>) -> Response {
    if id == 404 {
        return (StatusCode::NOT_FOUND, "User not found").into_response();
    }
    state.deleted.lock().await.push(id);
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_record_server() -> Result<(String, ServiceState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServiceState::default();
    let app = Router::new()
        .route("/api/User", get(handle_list).post(handle_create))
        .route("/api/User/:id", put(handle_update).delete(handle_delete))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn query(username: &str, page_number: u32) -> ListQuery {
    ListQuery {
        username: username.into(),
        phone_number: String::new(),
        email: String::new(),
        page_number: NonZeroU32::new(page_number).expect("non-zero"),
        page_size: NonZeroU32::new(5).expect("non-zero"),
    }
}

#[tokio::test]
async fn list_sends_every_filter_parameter() {
    let (server_url, state) = spawn_record_server().await.expect("spawn server");
    let service = HttpRecordService::new(&server_url).expect("service");

    let records = service.list(&query("bob", 2)).await.expect("list");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].fields.username, "bob");

    let queries = state.list_queries.lock().await.clone();
    assert_eq!(queries.len(), 1);
    let params = &queries[0];
    assert_eq!(params.get("username").map(String::as_str), Some("bob"));
    assert_eq!(params.get("phoneNumber").map(String::as_str), Some(""));
    assert_eq!(params.get("email").map(String::as_str), Some(""));
    assert_eq!(params.get("pageNumber").map(String::as_str), Some("2"));
    assert_eq!(params.get("pageSize").map(String::as_str), Some("5"));
}

#[tokio::test]
async fn create_returns_server_assigned_record() {
    let (server_url, state) = spawn_record_server().await.expect("spawn server");
    let service = HttpRecordService::new(&format!("{server_url}/")).expect("service");

    let fields = sample(0, "carol").fields;
    let created = service.create(&fields).await.expect("create");
    assert_eq!(created.id, FreelancerId(7));
    assert_eq!(created.fields, fields);
    assert_eq!(state.created.lock().await.clone(), vec![fields]);
}

#[tokio::test]
async fn create_rejection_carries_unquoted_server_message() {
    let (server_url, _state) = spawn_record_server().await.expect("spawn server");
    let service = HttpRecordService::new(&server_url).expect("service");

    let err = service
        .create(&sample(0, "taken").fields)
        .await
        .expect_err("must fail");
    assert_eq!(
        err,
        RemoteError::Server {
            status: 409,
            body: Some("Username already exists".into()),
        }
    );
    assert_eq!(err.display_message("fallback"), "Username already exists");
}

#[tokio::test]
async fn empty_error_body_falls_back_to_generic_message() {
    let (server_url, _state) = spawn_record_server().await.expect("spawn server");
    let service = HttpRecordService::new(&server_url).expect("service");

    let err = service
        .create(&sample(0, "boom").fields)
        .await
        .expect_err("must fail");
    assert_eq!(
        err,
        RemoteError::Server {
            status: 500,
            body: None
        }
    );
    assert_eq!(err.display_message("fallback"), "fallback");
}

#[tokio::test]
async fn update_puts_full_record_and_reports_unknown_id() {
    let (server_url, state) = spawn_record_server().await.expect("spawn server");
    let service = HttpRecordService::new(&server_url).expect("service");

    let record = sample(3, "dave");
    let updated = service.update(record.id, &record).await.expect("update");
    assert_eq!(updated, record);
    assert_eq!(state.updated.lock().await.clone(), vec![(3, record)]);

    let missing = sample(404, "ghost");
    let err = service
        .update(missing.id, &missing)
        .await
        .expect_err("unknown id");
    assert!(
        matches!(err, RemoteError::Server { status: 404, .. }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn update_with_no_content_reply_returns_the_sent_record() {
    let (server_url, state) = spawn_record_server().await.expect("spawn server");
    let service = HttpRecordService::new(&server_url).expect("service");

    let record = sample(204, "erin");
    let updated = service.update(record.id, &record).await.expect("update");
    assert_eq!(updated, record);
    assert_eq!(state.updated.lock().await.clone(), vec![(204, record)]);
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_error() {
    let (server_url, _state) = spawn_record_server().await.expect("spawn server");
    let service = HttpRecordService::new(&server_url).expect("service");

    let record = sample(422, "frank");
    let err = service
        .update(record.id, &record)
        .await
        .expect_err("plain text body");
    assert!(matches!(err, RemoteError::Decode(_)), "unexpected error: {err}");

    let err = service
        .create(&sample(0, "silent").fields)
        .await
        .expect_err("empty body");
    assert!(matches!(err, RemoteError::Decode(_)), "unexpected error: {err}");
    assert_eq!(err.display_message("fallback"), "fallback");
}

#[tokio::test]
async fn delete_accepts_no_content_and_surfaces_text_errors() {
    let (server_url, state) = spawn_record_server().await.expect("spawn server");
    let service = HttpRecordService::new(&server_url).expect("service");

    service.delete(FreelancerId(5)).await.expect("delete");
    assert_eq!(state.deleted.lock().await.clone(), vec![5]);

    let err = service
        .delete(FreelancerId(404))
        .await
        .expect_err("unknown id");
    assert_eq!(err.display_message("fallback"), "User not found");
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpRecordService::new(&format!("http://{addr}")).expect("service");
    let err = service.list(&query("", 1)).await.expect_err("must fail");
    assert!(matches!(err, RemoteError::Network(_)), "unexpected error: {err}");
    assert_eq!(err.display_message("fallback"), "fallback");
}

#[test]
fn base_url_is_validated_and_normalized() {
    let service = HttpRecordService::new(" http://localhost:5192/ ").expect("service");
    assert_eq!(service.collection_url(), "http://localhost:5192/api/User");
    assert_eq!(service.item_url(FreelancerId(9)), "http://localhost:5192/api/User/9");

    let nested = HttpRecordService::new("https://example.com/backend/").expect("service");
    assert_eq!(nested.collection_url(), "https://example.com/backend/api/User");

    for bad in ["", "localhost:5192", "ftp://example.com", "http://example.com/?a=1"] {
        let err = HttpRecordService::new(bad).expect_err(bad);
        assert!(matches!(err, RemoteError::InvalidBaseUrl { .. }), "{bad}: {err}");
    }
}

#[test]
fn error_body_keeps_structured_payloads_verbatim() {
    assert_eq!(error_body_text("   "), None);
    assert_eq!(error_body_text("\"\""), None);
    assert_eq!(error_body_text("plain words"), Some("plain words".into()));
    assert_eq!(
        error_body_text(r#"{"title":"One or more validation errors occurred."}"#),
        Some(r#"{"title":"One or more validation errors occurred."}"#.into())
    );
}
