use crate::api::legacy::handlers::{
    sales_by_date_handler, sales_by_price_handler, sales_by_region_handler,
};
use crate::api::models::AppState;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/avocado-sales/region/{region}", get(sales_by_region_handler))
        .route("/avocado-sales/date/{date}", get(sales_by_date_handler))
        .route("/avocado-sales/price-range", get(sales_by_price_handler))
}
