use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::AggregateResult;

/// Latest published aggregation, shared between the refresher and readers.
///
/// Results are swapped in whole, so a reader either sees the previous run or
/// the new one.
#[derive(Default)]
pub struct ResultCache {
    current: RwLock<Option<Arc<AggregateResult>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, result: AggregateResult) {
        let result = Arc::new(result);
        *self.current.write().await = Some(result);
    }

    pub async fn latest(&self) -> Option<Arc<AggregateResult>> {
        self.current.read().await.clone()
    }
}
