use axum::{
    extract::{Path, State},
    Extension,
};

use crate::api::{CreatedResponse, CtrlVocPayload, DeleteQuery, ListQuery, MessageResponse};
use crate::auth::Principal;
use crate::database::models::ControlledVocabulary;
use crate::database::{EntryFilter, Record};
use crate::middleware::{ApiJson, ApiQuery, ApiResponse, ApiResult};
use crate::state::AppState;

use super::{parse_id, retire};

/// GET /ctrl_voc/
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<Record<ControlledVocabulary>>> {
    let filter = if query.deprecated {
        EntryFilter::all()
    } else {
        EntryFilter::active()
    };

    Ok(ApiResponse::success(state.vocabularies.list(filter).await?))
}

/// POST /ctrl_voc/
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(payload): ApiJson<CtrlVocPayload>,
) -> ApiResult<CreatedResponse> {
    let entry = payload.into_vocabulary()?;
    let record = state.vocabularies.insert(entry).await?;
    tracing::info!(
        "{} added controlled vocabulary '{}' ({}) with {} items",
        principal.user,
        record.document.name,
        record.id,
        record.document.items.len()
    );

    Ok(ApiResponse::created(CreatedResponse {
        message: format!("Add entry '{}'", record.document.name),
        id: record.id,
    }))
}

/// GET /ctrl_voc/id/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Record<ControlledVocabulary>> {
    let record = state.vocabularies.get_by_id(parse_id(&id)?).await?;
    Ok(ApiResponse::success(record))
}

/// PUT /ctrl_voc/id/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CtrlVocPayload>,
) -> ApiResult<MessageResponse> {
    let mut record = state.vocabularies.get_by_id(parse_id(&id)?).await?;
    payload.apply_to(record.id, &mut record.document)?;

    state.vocabularies.save(&record).await?;
    tracing::info!(
        "{} updated controlled vocabulary '{}' ({})",
        principal.user,
        record.document.name,
        record.id
    );

    Ok(ApiResponse::success(MessageResponse::new(format!(
        "Update entry '{}'",
        record.document.name
    ))))
}

/// DELETE /ctrl_voc/id/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<DeleteQuery>,
) -> ApiResult<MessageResponse> {
    let message = retire(
        state.vocabularies.as_ref(),
        parse_id(&id)?,
        &query,
        &principal.user,
    )
    .await?;

    Ok(ApiResponse::success(message))
}
