use crate::storage::{Sale, SalesStore};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Read the bundled dataset, a JSON array of sales.
pub fn load_dataset(path: &Path) -> Result<Vec<Sale>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed dataset {:?}", path))?;
    let sales: Vec<Sale> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid seed dataset {:?}", path))?;
    Ok(sales)
}

/// Replace the whole collection with `sales`.
///
/// Delete and insert are separate storage calls: a reader running alongside
/// may see the collection empty. `main` awaits this before binding the
/// listener, so no request can observe that window.
pub async fn seed(store: &dyn SalesStore, sales: &[Sale]) -> Result<usize> {
    let deleted = store
        .delete_all()
        .await
        .context("Failed to clear sales collection")?;
    info!(deleted, "Cleared sales collection");

    let inserted = store
        .insert_many(sales)
        .await
        .context("Failed to insert seed dataset")?;
    info!(inserted, "Database seeded with avocado sales data");

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{sample_sale, MemorySalesStore, SaleFilter};

    fn dataset_path() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data/avocado-sales.json")
    }

    #[test]
    fn bundled_dataset_loads() {
        let sales = load_dataset(&dataset_path()).unwrap();
        assert!(!sales.is_empty());
        let first = &sales[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.date, "2015-01-04");
        assert_eq!(first.average_price, 1.35);
        assert_eq!(first.region, "Albany");
    }

    #[test]
    fn missing_dataset_is_an_error() {
        assert!(load_dataset(Path::new("data/nope.json")).is_err());
    }

    #[tokio::test]
    async fn reseeding_replaces_instead_of_accumulating() {
        let store = MemorySalesStore::with_sales(vec![sample_sale(42, "2016-01-01", 2.0, "Boston")]);
        let sales = load_dataset(&dataset_path()).unwrap();

        seed(&store, &sales).await.unwrap();
        seed(&store, &sales).await.unwrap();

        assert_eq!(store.count().await.unwrap(), sales.len() as u64);
        assert!(store.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_dataset_clears_collection() {
        let store = MemorySalesStore::with_sales(vec![sample_sale(1, "2015-01-04", 1.35, "Albany")]);
        assert_eq!(seed(&store, &[]).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    /// A reader between the delete and the insert sees nothing. Startup
    /// avoids this by seeding before serving.
    #[tokio::test]
    async fn reader_can_observe_empty_collection_mid_reseed() {
        let store = MemorySalesStore::with_sales(vec![sample_sale(1, "2015-01-04", 1.35, "Albany")]);

        store.delete_all().await.unwrap();
        let seen = store.find(&SaleFilter::default()).await.unwrap();
        assert!(seen.is_empty());

        store
            .insert_many(&[sample_sale(1, "2015-01-04", 1.35, "Albany")])
            .await
            .unwrap();
        assert_eq!(store.find(&SaleFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_seed_surfaces_error() {
        let store = MemorySalesStore::new();
        store.set_offline(true);
        assert!(seed(&store, &[]).await.is_err());
    }
}
