use crate::api::models::AppState;
use crate::api::sales::handlers::{get_sale_handler, list_sales_handler};
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/avocado-sales", get(list_sales_handler))
        .route("/avocado-sales/{id}", get(get_sale_handler))
}
