//! Gift API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{ClaimGiftRequest, CreateGiftRequest, Gift, UpdateGiftRequest};
use crate::AppState;

/// GET /api/gifts - List the catalog in id order.
pub async fn list_gifts(State(state): State<AppState>) -> ApiResult<Vec<Gift>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_gifts().await {
        Ok(gifts) => success(gifts, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/gifts/:id - Get a single gift.
pub async fn get_gift(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Gift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_gift(id).await {
        Ok(Some(gift)) => success(gift, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Gift {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/gifts/:id/claim - Claim a gift for a guest.
///
/// Success means the guarded update applied: this caller is the one purchaser.
/// A 409 means someone else got there first; the body carries the winning row.
pub async fn claim_gift(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<ClaimGiftRequest>>,
) -> ApiResult<Gift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let purchaser_name = body
        .map(|Json(request)| request.purchaser_name.unwrap_or_default())
        .unwrap_or_default();

    match state.repo.claim_gift(id, purchaser_name.trim()).await {
        Ok(gift) => {
            tracing::info!(gift_id = id, "Gift claimed");
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(gift, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/gifts - Create a new gift.
pub async fn create_gift(
    State(state): State<AppState>,
    Json(request): Json<CreateGiftRequest>,
) -> ApiResult<Gift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.store.trim().is_empty() {
        return error(
            AppError::Validation("Store is required".to_string()),
            revision_id,
        );
    }
    if request.item.trim().is_empty() {
        return error(
            AppError::Validation("Item is required".to_string()),
            revision_id,
        );
    }
    if request.quantity < 1 {
        return error(
            AppError::Validation("Quantity must be at least 1".to_string()),
            revision_id,
        );
    }
    if !request.price.is_finite() || request.price < 0.0 {
        return error(
            AppError::Validation("Price must be non-negative".to_string()),
            revision_id,
        );
    }

    match state.repo.create_gift(&request).await {
        Ok(gift) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(gift, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/gifts/:id - Edit gift fields.
pub async fn update_gift(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateGiftRequest>,
) -> ApiResult<Gift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Some(store) = &request.store {
        if store.trim().is_empty() {
            return error(
                AppError::Validation("Store cannot be empty".to_string()),
                revision_id,
            );
        }
    }
    if let Some(item) = &request.item {
        if item.trim().is_empty() {
            return error(
                AppError::Validation("Item cannot be empty".to_string()),
                revision_id,
            );
        }
    }
    if let Some(quantity) = request.quantity {
        if quantity < 1 {
            return error(
                AppError::Validation("Quantity must be at least 1".to_string()),
                revision_id,
            );
        }
    }
    if let Some(price) = request.price {
        if !price.is_finite() || price < 0.0 {
            return error(
                AppError::Validation("Price must be non-negative".to_string()),
                revision_id,
            );
        }
    }

    match state.repo.update_gift(id, &request).await {
        Ok(gift) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(gift, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/gifts/:id - Remove a gift from the catalog.
pub async fn delete_gift(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_gift(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/gifts/:id/reset - Put a gift back in the catalog.
pub async fn reset_gift(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Gift> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.reset_gift(id).await {
        Ok(gift) => {
            tracing::info!(gift_id = id, "Gift reset to available");
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(gift, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
