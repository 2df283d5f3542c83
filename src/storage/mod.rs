pub mod memory;
pub mod mongo;

pub use memory::MemorySalesStore;
pub use mongo::MongoSalesStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One weekly avocado sales row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub date: String,
    pub average_price: f64,
    pub total_volume: f64,
    pub total_bags_sold: f64,
    pub small_bags_sold: f64,
    pub large_bags_sold: f64,
    pub x_large_bags_sold: f64,
    pub region: String,
}

/// Inclusive bounds on `averagePrice`. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    /// Lenient parse of raw query values: anything that is not a number
    /// (including NaN) leaves that side open.
    pub fn from_raw(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.and_then(parse_bound),
            max: max.and_then(parse_bound),
        }
    }

    pub fn lower(&self) -> f64 {
        self.min.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn upper(&self) -> f64 {
        self.max.unwrap_or(f64::INFINITY)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.lower() && price <= self.upper()
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Conjunction of the optional predicates a list request can carry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleFilter {
    /// Case-insensitive substring of `region`
    pub region: Option<String>,
    /// Exact `date`
    pub date: Option<String>,
    pub price: PriceRange,
}

impl SaleFilter {
    pub fn by_region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Self::default()
        }
    }

    pub fn by_date(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }

    pub fn by_price(price: PriceRange) -> Self {
        Self {
            price,
            ..Self::default()
        }
    }

    pub fn matches(&self, sale: &Sale) -> bool {
        if let Some(region) = &self.region {
            if !sale
                .region
                .to_lowercase()
                .contains(&region.to_lowercase())
            {
                return false;
            }
        }
        if let Some(date) = &self.date {
            if &sale.date != date {
                return false;
            }
        }
        self.price.contains(sale.average_price)
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Read and bulk-replace access to the sales collection
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Every record matching `filter`, in storage order.
    async fn find(&self, filter: &SaleFilter) -> Result<Vec<Sale>, StorageError>;

    /// The record whose `id` field equals `id`.
    async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, StorageError>;

    async fn count(&self) -> Result<u64, StorageError>;

    /// Removes every record, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, StorageError>;

    async fn insert_many(&self, sales: &[Sale]) -> Result<usize, StorageError>;
}

#[cfg(test)]
pub(crate) fn sample_sale(id: i64, date: &str, price: f64, region: &str) -> Sale {
    Sale {
        id,
        date: date.to_string(),
        average_price: price,
        total_volume: 1000.0,
        total_bags_sold: 100.0,
        small_bags_sold: 80.0,
        large_bags_sold: 15.0,
        x_large_bags_sold: 5.0,
        region: region.to_string(),
    }
}
