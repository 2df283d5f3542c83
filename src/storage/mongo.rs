use super::{Sale, SaleFilter, SalesStore, StorageError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};
use tracing::info;

/// Sales collection backed by MongoDB
pub struct MongoSalesStore {
    collection: Collection<Sale>,
}

impl MongoSalesStore {
    /// Connects and pings the server. Any failure here is fatal for startup.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("Invalid MongoDB connection string")?;

        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .context("Failed to reach MongoDB")?;

        info!(database, collection, "MongoDB connected");

        Ok(Self {
            collection: db.collection::<Sale>(collection),
        })
    }
}

/// Translate a filter into a MongoDB query document.
pub fn filter_document(filter: &SaleFilter) -> Document {
    let mut query = Document::new();

    if let Some(region) = &filter.region {
        query.insert(
            "region",
            doc! { "$regex": regex::escape(region), "$options": "i" },
        );
    }
    if let Some(date) = &filter.date {
        query.insert("date", date.as_str());
    }
    if !filter.price.is_unbounded() {
        let mut range = Document::new();
        if let Some(min) = filter.price.min {
            range.insert("$gte", min);
        }
        if let Some(max) = filter.price.max {
            range.insert("$lte", max);
        }
        query.insert("averagePrice", range);
    }

    query
}

#[async_trait]
impl SalesStore for MongoSalesStore {
    async fn find(&self, filter: &SaleFilter) -> Result<Vec<Sale>, StorageError> {
        let cursor = self.collection.find(filter_document(filter)).await?;
        Ok(cursor.try_collect::<Vec<Sale>>().await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, StorageError> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    async fn count(&self) -> Result<u64, StorageError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn delete_all(&self) -> Result<u64, StorageError> {
        let result = self.collection.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }

    async fn insert_many(&self, sales: &[Sale]) -> Result<usize, StorageError> {
        // The driver rejects an empty batch
        if sales.is_empty() {
            return Ok(0);
        }
        let result = self.collection.insert_many(sales).await?;
        Ok(result.inserted_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PriceRange;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(filter_document(&SaleFilter::default()).is_empty());
    }

    #[test]
    fn region_is_escaped_and_case_insensitive() {
        let query = filter_document(&SaleFilter::by_region("st. louis"));
        let region = query.get_document("region").unwrap();
        assert_eq!(region.get_str("$regex").unwrap(), r"st\. louis");
        assert_eq!(region.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn price_range_only_includes_present_bounds() {
        let query = filter_document(&SaleFilter::by_price(PriceRange::from_raw(
            Some("1.1"),
            Some("x"),
        )));
        let range = query.get_document("averagePrice").unwrap();
        assert_eq!(range.get_f64("$gte").unwrap(), 1.1);
        assert!(range.get("$lte").is_none());
    }

    #[test]
    fn combined_filter() {
        let filter = SaleFilter {
            region: Some("alb".into()),
            date: Some("2015-01-04".into()),
            price: PriceRange {
                min: Some(1.0),
                max: Some(2.0),
            },
        };
        let query = filter_document(&filter);
        assert_eq!(query.get_str("date").unwrap(), "2015-01-04");
        assert_eq!(query.len(), 3);
    }
}
