use super::{Sale, SaleFilter, SalesStore, StorageError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-process sales collection
///
/// Same query semantics as the MongoDB backend. Used for local runs without
/// a database (`backend = "memory"`) and throughout the tests.
#[derive(Default)]
pub struct MemorySalesStore {
    sales: RwLock<Vec<Sale>>,
    offline: AtomicBool,
}

impl MemorySalesStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_sales(sales: Vec<Sale>) -> Self {
        Self {
            sales: RwLock::new(sales),
            offline: AtomicBool::new(false),
        }
    }

    /// While offline every operation fails with `StorageError::Unavailable`.
    #[cfg(test)]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SalesStore for MemorySalesStore {
    async fn find(&self, filter: &SaleFilter) -> Result<Vec<Sale>, StorageError> {
        self.check_online()?;
        let sales = self.sales.read().await;
        Ok(sales.iter().filter(|s| filter.matches(s)).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, StorageError> {
        self.check_online()?;
        let sales = self.sales.read().await;
        Ok(sales.iter().find(|s| s.id == id).cloned())
    }

    async fn count(&self) -> Result<u64, StorageError> {
        self.check_online()?;
        Ok(self.sales.read().await.len() as u64)
    }

    async fn delete_all(&self) -> Result<u64, StorageError> {
        self.check_online()?;
        let mut sales = self.sales.write().await;
        let deleted = sales.len() as u64;
        sales.clear();
        Ok(deleted)
    }

    async fn insert_many(&self, new_sales: &[Sale]) -> Result<usize, StorageError> {
        self.check_online()?;
        self.sales.write().await.extend_from_slice(new_sales);
        Ok(new_sales.len())
    }
}
