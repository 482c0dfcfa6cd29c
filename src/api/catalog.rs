//! Catalog API endpoints: full snapshot, revision polling, and CSV export.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::{success, ApiResult};
use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::{Catalog, Gift, RevisionInfo};
use crate::AppState;

/// GET /api/catalog - Get the full catalog snapshot.
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<Catalog> {
    let catalog = state
        .repo
        .get_catalog()
        .await
        .map_err(|e| AppErrorWithRevision {
            error: e,
            revision_id: 0,
        })?;

    success(catalog.clone(), catalog.revision_id)
}

/// GET /api/catalog/revision - Get the current revision info.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_info = state
        .repo
        .get_revision_info()
        .await
        .map_err(|e| AppErrorWithRevision {
            error: e,
            revision_id: 0,
        })?;

    success(revision_info.clone(), revision_info.revision_id)
}

/// GET /api/admin/export - Download the catalog as CSV.
pub async fn export_catalog(
    State(state): State<AppState>,
) -> Result<Response, AppErrorWithRevision> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let gifts = state
        .repo
        .list_gifts()
        .await
        .map_err(|e| AppErrorWithRevision {
            error: e,
            revision_id,
        })?;

    let body = render_csv(&gifts).map_err(|e| AppErrorWithRevision {
        error: e,
        revision_id,
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"gift_registry.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// Serialize the catalog as CSV: header row first, one record per gift,
/// in id order (the order `list_gifts` returns).
fn render_csv(gifts: &[Gift]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "id",
        "store",
        "item",
        "description",
        "quantity",
        "price",
        "status",
        "purchased_at",
        "purchaser_name",
        "image_url",
    ])?;

    for gift in gifts {
        writer.write_record([
            gift.id.to_string(),
            gift.store.clone(),
            gift.item.clone(),
            gift.description.clone().unwrap_or_default(),
            gift.quantity.to_string(),
            gift.price.to_string(),
            gift.status.as_str().to_string(),
            gift.purchased_at.clone().unwrap_or_default(),
            gift.purchaser_name.clone(),
            gift.image_url.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Export error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("Export error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GiftStatus;

    fn sample_gift(id: i64) -> Gift {
        Gift {
            id,
            store: "Amazon".to_string(),
            store_link: Some("https://amazon.com".to_string()),
            item: "Juego de copas".to_string(),
            description: Some("Para brindar, \"salud\"".to_string()),
            quantity: 1,
            price: 45.99,
            status: GiftStatus::Available,
            purchased_at: None,
            purchaser_name: String::new(),
            image_url: None,
        }
    }

    #[test]
    fn test_csv_header_row_first() {
        let csv = render_csv(&[sample_gift(1)]).unwrap();
        let first_line = csv.lines().next().unwrap();
        assert_eq!(
            first_line,
            "id,store,item,description,quantity,price,status,purchased_at,purchaser_name,image_url"
        );
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_csv_quotes_embedded_commas_and_quotes() {
        let csv = render_csv(&[sample_gift(7)]).unwrap();
        // The description contains a comma and quotes; the record must still
        // parse back into exactly ten fields.
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 10);
        assert_eq!(&record[0], "7");
        assert_eq!(&record[3], "Para brindar, \"salud\"");
    }

    #[test]
    fn test_csv_empty_catalog_is_header_only() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
