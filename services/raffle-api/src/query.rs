use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use rooch_raffle_common::coin::{format_units, normalize_address};
use rooch_raffle_common::types::ClaimedPage;
use sea_orm::EntityTrait;

use crate::error::ApiError;
use crate::execute::validate_object_id;
use crate::msg::{AttributesResponse, BalanceResponse, EnvelopeResponse, RaffleResponse};
use crate::state::{envelope_attributes, AppState};

/// Current wall-clock time in milliseconds; statuses are derived against it.
pub fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

async fn find_attributes(
    state: &AppState,
    envelope_id: &str,
) -> Result<Option<AttributesResponse>, ApiError> {
    let model = envelope_attributes::Entity::find_by_id(envelope_id.to_string())
        .one(&state.db)
        .await?;
    Ok(model.map(Into::into))
}

pub async fn query_attributes(
    state: &AppState,
    envelope_id: String,
) -> Result<Json<AttributesResponse>, ApiError> {
    let envelope_id = validate_object_id(&envelope_id)?;
    let attributes = find_attributes(state, &envelope_id).await?;
    attributes.map(Json).ok_or(ApiError::NotFound {
        kind: "attributes",
        id: envelope_id,
    })
}

pub async fn query_envelope(state: &AppState, id: String) -> Result<Json<EnvelopeResponse>, ApiError> {
    let id = validate_object_id(&id)?;
    let envelope = state
        .rooch
        .get_envelope(&id, now_ms())
        .await?
        .ok_or_else(|| ApiError::NotFound {
            kind: "envelope",
            id: id.clone(),
        })?;
    let attributes = find_attributes(state, &normalize_address(&envelope.id)).await?;
    Ok(Json(EnvelopeResponse {
        envelope,
        attributes,
    }))
}

pub async fn query_raffle(state: &AppState, id: String) -> Result<Json<RaffleResponse>, ApiError> {
    let id = validate_object_id(&id)?;
    let raffle = state
        .rooch
        .get_raffle(&id, now_ms())
        .await?
        .ok_or_else(|| ApiError::NotFound {
            kind: "raffle",
            id: id.clone(),
        })?;
    let attributes = find_attributes(state, &normalize_address(&raffle.id)).await?;
    Ok(Json(RaffleResponse { raffle, attributes }))
}

pub async fn query_claimed(
    state: &AppState,
    id: String,
    cursor: Option<String>,
    limit: Option<u32>,
) -> Result<Json<ClaimedPage>, ApiError> {
    let id = validate_object_id(&id)?;
    let envelope = state
        .rooch
        .get_envelope(&id, now_ms())
        .await?
        .ok_or_else(|| ApiError::NotFound {
            kind: "envelope",
            id: id.clone(),
        })?;
    let page = state
        .rooch
        .envelope_claimed(&envelope, cursor.as_deref(), limit)
        .await?;
    Ok(Json(page))
}

pub async fn query_balance(
    state: &AppState,
    owner: String,
    coin_type: String,
) -> Result<Json<BalanceResponse>, ApiError> {
    if coin_type.trim().is_empty() {
        return Err(ApiError::bad_request("coin_type is required"));
    }
    let info = state.rooch.get_balance(&owner, &coin_type).await?;
    let formatted = format_units(info.balance, info.decimals);
    Ok(Json(BalanceResponse { info, formatted }))
}

pub async fn query_image(state: &AppState, filename: String) -> Result<Response, ApiError> {
    let stored = state.images.get(&filename).await?;
    let (bytes, kind) = stored.ok_or(ApiError::NotFound {
        kind: "image",
        id: filename,
    })?;
    Ok((
        [
            (header::CONTENT_TYPE, kind.content_type()),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        bytes,
    )
        .into_response())
}
