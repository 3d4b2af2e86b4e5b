use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::execute;
use crate::msg::{
    AttributesParams, BalanceParams, CreateAttributesMsg, ExecuteMsg, MoveCallRequest,
    PageParams, QueryMsg, SubmitTransactionMsg, UpdateAttributesMsg,
};
use crate::query;
use crate::state::AppState;

pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    img-src 'self' data: blob: https:; \
    script-src 'self'; \
    style-src 'self' 'unsafe-inline'; \
    connect-src 'self' https:; \
    frame-ancestors 'none'";

/// Room for multipart boundaries and part headers on top of the image itself.
const MULTIPART_OVERHEAD: usize = 16 * 1024;

pub async fn execute(state: &AppState, msg: ExecuteMsg) -> Result<Response, ApiError> {
    match msg {
        ExecuteMsg::CreateAttributes(msg) => execute::create_attributes(state, msg)
            .await
            .map(|json| (StatusCode::CREATED, json).into_response()),
        ExecuteMsg::UpdateAttributes(msg) => execute::update_attributes(state, msg)
            .await
            .map(IntoResponse::into_response),
        ExecuteMsg::UploadImage { bytes } => execute::upload_image(state, bytes)
            .await
            .map(|json| (StatusCode::CREATED, json).into_response()),
        ExecuteMsg::BuildMoveCall(request) => {
            execute::build_move_call(state, request).map(IntoResponse::into_response)
        }
        ExecuteMsg::SubmitTransaction(msg) => execute::submit_transaction(state, msg)
            .await
            .map(IntoResponse::into_response),
    }
}

pub async fn query(state: &AppState, msg: QueryMsg) -> Result<Response, ApiError> {
    match msg {
        QueryMsg::Attributes { envelope_id } => query::query_attributes(state, envelope_id)
            .await
            .map(IntoResponse::into_response),
        QueryMsg::Envelope { id } => query::query_envelope(state, id)
            .await
            .map(IntoResponse::into_response),
        QueryMsg::Raffle { id } => query::query_raffle(state, id)
            .await
            .map(IntoResponse::into_response),
        QueryMsg::Claimed { id, cursor, limit } => query::query_claimed(state, id, cursor, limit)
            .await
            .map(IntoResponse::into_response),
        QueryMsg::Balance { owner, coin_type } => query::query_balance(state, owner, coin_type)
            .await
            .map(IntoResponse::into_response),
        QueryMsg::Image { filename } => query::query_image(state, filename).await,
    }
}

pub fn router(state: AppState) -> Router {
    let upload_limit = state.images.max_bytes() + MULTIPART_OVERHEAD;
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/envelope-attributes",
            get(get_attributes)
                .post(post_attributes)
                .patch(patch_attributes),
        )
        .route(
            "/api/upload",
            post(upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/app/images/:filename", get(get_image))
        .route("/api/envelopes/:id", get(get_envelope))
        .route("/api/envelopes/:id/claimed", get(get_claimed))
        .route("/api/raffles/:id", get(get_raffle))
        .route("/api/balance", get(get_balance))
        .route("/api/move-calls", post(post_move_call))
        .route("/api/transactions", post(post_transaction))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_attributes(
    State(state): State<AppState>,
    Query(params): Query<AttributesParams>,
) -> Result<Response, ApiError> {
    query(
        &state,
        QueryMsg::Attributes {
            envelope_id: params.envelope_id,
        },
    )
    .await
}

async fn post_attributes(
    State(state): State<AppState>,
    Json(msg): Json<CreateAttributesMsg>,
) -> Result<Response, ApiError> {
    execute(&state, ExecuteMsg::CreateAttributes(msg)).await
}

async fn patch_attributes(
    State(state): State<AppState>,
    Json(msg): Json<UpdateAttributesMsg>,
) -> Result<Response, ApiError> {
    execute(&state, ExecuteMsg::UpdateAttributes(msg)).await
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::bad_request(err.body_text())
    }
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let limit = state.images.max_bytes();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        return execute(
            &state,
            ExecuteMsg::UploadImage {
                bytes: bytes.to_vec(),
            },
        )
        .await;
    }
    Err(ApiError::bad_request("multipart field `file` is missing"))
}

async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    query(&state, QueryMsg::Image { filename }).await
}

async fn get_envelope(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    query(&state, QueryMsg::Envelope { id }).await
}

async fn get_claimed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
    query(
        &state,
        QueryMsg::Claimed {
            id,
            cursor: page.cursor,
            limit: page.limit,
        },
    )
    .await
}

async fn get_raffle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    query(&state, QueryMsg::Raffle { id }).await
}

async fn get_balance(
    State(state): State<AppState>,
    Query(params): Query<BalanceParams>,
) -> Result<Response, ApiError> {
    query(
        &state,
        QueryMsg::Balance {
            owner: params.owner,
            coin_type: params.coin_type,
        },
    )
    .await
}

async fn post_move_call(
    State(state): State<AppState>,
    Json(request): Json<MoveCallRequest>,
) -> Result<Response, ApiError> {
    execute(&state, ExecuteMsg::BuildMoveCall(request)).await
}

async fn post_transaction(
    State(state): State<AppState>,
    Json(msg): Json<SubmitTransactionMsg>,
) -> Result<Response, ApiError> {
    execute(&state, ExecuteMsg::SubmitTransaction(msg)).await
}
