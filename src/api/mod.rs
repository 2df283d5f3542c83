pub mod legacy;
pub mod models;
pub mod sales;

// Re-exports
pub use models::*;

use axum::{extract::State, routing::get, Json, Router};

const ENDPOINTS: &[(&str, &str)] = &[
    ("/", "GET"),
    ("/health", "GET"),
    ("/avocado-sales", "GET"),
    ("/avocado-sales/{id}", "GET"),
    ("/avocado-sales/region/{region}", "GET"),
    ("/avocado-sales/date/{date}", "GET"),
    ("/avocado-sales/price-range", "GET"),
];

/// All routes, without middleware layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(sales::routes())
        .merge(legacy::routes())
        .with_state(state)
}

pub async fn root_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Welcome to the Avocado Sales API!".to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|&(path, method)| Endpoint {
                path,
                methods: vec![method],
            })
            .collect(),
    })
}

pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let total_sales = state.store.count().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_sales,
    }))
}
