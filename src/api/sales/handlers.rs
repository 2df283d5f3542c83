use crate::api::models::*;
use crate::storage::{Sale, SaleFilter};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

/// Run `filter`, turning an empty result into a 404.
pub async fn find_or_not_found(
    state: &AppState,
    filter: &SaleFilter,
    not_found: &str,
) -> Result<Json<Vec<Sale>>, AppError> {
    let sales = state.store.find(filter).await?;

    info!(found = sales.len(), "Sales query complete");

    if sales.is_empty() {
        return Err(AppError::NotFound(not_found.to_string()));
    }
    Ok(Json(sales))
}

pub async fn list_sales_handler(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> Result<Json<Vec<Sale>>, AppError> {
    let filter = query.to_filter();

    info!(
        region = ?filter.region,
        date = ?filter.date,
        min = filter.price.lower(),
        max = filter.price.upper(),
        "Listing sales"
    );

    find_or_not_found(&state, &filter, "No sales data found matching the given filters").await
}

pub async fn get_sale_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Sale>, AppError> {
    let not_found = || AppError::NotFound(format!("No sale found with id {}", raw_id));

    // Non-numeric ids cannot match any record
    let id: i64 = raw_id.trim().parse().map_err(|_| not_found())?;

    info!(id, "Fetching sale");

    state
        .store
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}
