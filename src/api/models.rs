use crate::storage::{PriceRange, SaleFilter, SalesStore, StorageError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SalesStore>,
}

/// Query string accepted by `GET /avocado-sales`
///
/// Bounds stay raw strings so a non-numeric `min`/`max` falls back to
/// unbounded instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub region: Option<String>,
    pub date: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

impl SalesQuery {
    pub fn to_filter(&self) -> SaleFilter {
        SaleFilter {
            region: non_empty(&self.region),
            date: non_empty(&self.date),
            price: self.price_range(),
        }
    }

    pub fn price_range(&self) -> PriceRange {
        PriceRange::from_raw(self.min.as_deref(), self.max.as_deref())
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A route listed by the root endpoint
#[derive(Debug, Serialize)]
pub struct Endpoint {
    pub path: &'static str,
    pub methods: Vec<&'static str>,
}

/// Root info response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: String,
    pub endpoints: Vec<Endpoint>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_sales: u64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Storage(err) => {
                error!(error = %err, "Storage request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
