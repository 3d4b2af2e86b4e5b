use axum::Json;
use chrono::Utc;
use rooch_client::ExecutionSummary;
use rooch_raffle_common::form::{self, MoveCall};
use rooch_raffle_common::normalize_address;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, SqlErr};

use crate::error::ApiError;
use crate::msg::{
    AttributesResponse, CreateAttributesMsg, MoveCallRequest, SubmitTransactionMsg,
    UpdateAttributesMsg, UploadResponse,
};
use crate::query::now_ms;
use crate::state::{envelope_attributes, AppState};

pub const IMAGE_ROUTE_PREFIX: &str = "/app/images";

/// Object ids are `0x` followed by up to 64 hex digits. Returns the short
/// lowercase form, which is the key attributes are stored under.
pub fn validate_object_id(id: &str) -> Result<String, ApiError> {
    let digits = id.strip_prefix("0x").unwrap_or("");
    if digits.is_empty() || digits.len() > 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ApiError::bad_request(format!("invalid object id {:?}", id)));
    }
    Ok(normalize_address(id))
}

/// Colours are stored as `#rrggbb`.
fn validate_color(field: &str, color: &str) -> Result<(), ApiError> {
    let valid = color
        .strip_prefix('#')
        .map(|digits| digits.len() == 6 && hex::decode(digits).is_ok())
        .unwrap_or(false);
    if !valid {
        return Err(ApiError::bad_request(format!(
            "{} must look like #rrggbb, got {:?}",
            field, color
        )));
    }
    Ok(())
}

/// `Some("")` clears a field, `Some(v)` sets it.
fn cleared(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

pub async fn create_attributes(
    state: &AppState,
    msg: CreateAttributesMsg,
) -> Result<Json<AttributesResponse>, ApiError> {
    let envelope_id = validate_object_id(&msg.envelope_id)?;
    if let Some(color) = &msg.cover_color {
        validate_color("cover_color", color)?;
    }
    if let Some(color) = &msg.text_color {
        validate_color("text_color", color)?;
    }

    // the primary key decides duplicates, so concurrent creates cannot both win
    let now = Utc::now();
    let model = envelope_attributes::ActiveModel {
        envelope_id: Set(envelope_id.clone()),
        envelope_type: Set(msg.envelope_type.as_str().to_string()),
        cover_image: Set(msg.cover_image.and_then(cleared)),
        cover_color: Set(msg.cover_color),
        text_color: Set(msg.text_color),
        greeting: Set(msg.greeting.and_then(cleared)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::AlreadyExists { envelope_id },
        _ => ApiError::Db(err),
    })?;

    tracing::info!(envelope_id = %model.envelope_id, kind = %model.envelope_type, "attributes created");
    Ok(Json(model.into()))
}

pub async fn update_attributes(
    state: &AppState,
    msg: UpdateAttributesMsg,
) -> Result<Json<AttributesResponse>, ApiError> {
    let envelope_id = validate_object_id(&msg.envelope_id)?;
    let model = envelope_attributes::Entity::find_by_id(envelope_id.clone())
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound {
            kind: "attributes",
            id: envelope_id,
        })?;

    let mut active: envelope_attributes::ActiveModel = model.into();
    if let Some(image) = msg.cover_image {
        active.cover_image = Set(cleared(image));
    }
    if let Some(color) = msg.cover_color {
        if !color.is_empty() {
            validate_color("cover_color", &color)?;
        }
        active.cover_color = Set(cleared(color));
    }
    if let Some(color) = msg.text_color {
        if !color.is_empty() {
            validate_color("text_color", &color)?;
        }
        active.text_color = Set(cleared(color));
    }
    if let Some(greeting) = msg.greeting {
        active.greeting = Set(cleared(greeting));
    }
    active.updated_at = Set(Utc::now());

    let model = active.update(&state.db).await?;
    tracing::info!(envelope_id = %model.envelope_id, "attributes updated");
    Ok(Json(model.into()))
}

pub async fn upload_image(state: &AppState, bytes: Vec<u8>) -> Result<Json<UploadResponse>, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::bad_request("empty upload"));
    }
    let filename = state.images.put(&bytes).await?;
    Ok(Json(UploadResponse {
        url: format!("{}/{}", IMAGE_ROUTE_PREFIX, filename),
    }))
}

pub fn build_move_call(state: &AppState, request: MoveCallRequest) -> Result<Json<MoveCall>, ApiError> {
    let package = state.package.as_ref();
    let now = now_ms();
    let call = match request {
        MoveCallRequest::CreateCoinEnvelope(form) => form.to_move_call(package, now)?,
        MoveCallRequest::CreateNftEnvelope(form) => form.to_move_call(package, now)?,
        MoveCallRequest::CreateRaffle(form) => form.to_move_call(package, now)?,
        MoveCallRequest::ClaimCoinEnvelope {
            envelope_id,
            coin_type,
        } => {
            let envelope_id = validate_object_id(&envelope_id)?;
            form::claim_coin_envelope(package, &envelope_id, &coin_type)
        }
        MoveCallRequest::ClaimNftEnvelope {
            envelope_id,
            nft_type,
        } => {
            let envelope_id = validate_object_id(&envelope_id)?;
            form::claim_nft_envelope(package, &envelope_id, &nft_type)
        }
        MoveCallRequest::ClaimBox { box_id, coin_type } => {
            let box_id = validate_object_id(&box_id)?;
            form::claim_box(package, &box_id, &coin_type)
        }
        MoveCallRequest::OpenBox { box_id, coin_type } => {
            let box_id = validate_object_id(&box_id)?;
            form::open_box(package, &box_id, &coin_type)
        }
    };
    Ok(Json(call))
}

pub async fn submit_transaction(
    state: &AppState,
    msg: SubmitTransactionMsg,
) -> Result<Json<ExecutionSummary>, ApiError> {
    let raw = msg.tx_hex.trim();
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() || hex::decode(digits).is_err() {
        return Err(ApiError::bad_request("tx_hex is not valid hex"));
    }
    let summary = state.rooch.execute_raw_transaction(raw).await?;
    Ok(Json(summary))
}
