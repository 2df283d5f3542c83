//! Path-style lookups kept for clients of the first API revision. Each is a
//! single-predicate form of `GET /avocado-sales`.

use crate::api::models::*;
use crate::api::sales::handlers::find_or_not_found;
use crate::storage::{Sale, SaleFilter};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

pub async fn sales_by_region_handler(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<Vec<Sale>>, AppError> {
    info!(region = %region, "Listing sales by region");
    find_or_not_found(
        &state,
        &SaleFilter::by_region(region),
        "No sales data found for this region",
    )
    .await
}

pub async fn sales_by_date_handler(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Sale>>, AppError> {
    info!(date = %date, "Listing sales by date");
    find_or_not_found(
        &state,
        &SaleFilter::by_date(date),
        "No sales data found for this date",
    )
    .await
}

pub async fn sales_by_price_handler(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> Result<Json<Vec<Sale>>, AppError> {
    let price = query.price_range();
    info!(min = price.lower(), max = price.upper(), "Listing sales by price range");
    find_or_not_found(
        &state,
        &SaleFilter::by_price(price),
        "No sales data found in this price range",
    )
    .await
}
