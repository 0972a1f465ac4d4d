//! Concurrency-safe in-memory dataset registry.
//!
//! The registry is the single owner of every generated dataset. Identifier
//! assignment and insertion happen inside one write-lock critical section,
//! so concurrent creations always receive distinct identifiers and a reader
//! can never observe a half-written record. Generation itself runs outside
//! the lock.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use synthquant_core::{AssetSeries, Frequency, Symbol, UtcDateTime};
use synthquant_engine::EventSpec;

/// A finished dataset owned by the registry.
///
/// Callers receive `Arc` handles; the content behind them never changes
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dataset_id: String,
    pub project: String,
    pub created_at: UtcDateTime,
    pub frequency: Frequency,
    pub horizon_days: u32,
    pub seed: u64,
    pub series: Vec<AssetSeries>,
    pub events: Vec<EventSpec>,
    pub realism_score: f64,
    /// Rows per asset, including the initial point.
    pub total_rows: usize,
}

impl Dataset {
    pub fn symbols(&self) -> Vec<Symbol> {
        self.series.iter().map(|series| series.symbol.clone()).collect()
    }
}

/// Lightweight listing view of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub dataset_id: String,
    pub project: String,
    pub symbols: Vec<Symbol>,
    pub frequency: Frequency,
    pub horizon_days: u32,
    pub created_at: UtcDateTime,
    pub realism_score: f64,
    pub total_rows: usize,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            dataset_id: dataset.dataset_id.clone(),
            project: dataset.project.clone(),
            symbols: dataset.symbols(),
            frequency: dataset.frequency,
            horizon_days: dataset.horizon_days,
            created_at: dataset.created_at,
            realism_score: dataset.realism_score,
            total_rows: dataset.total_rows,
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    datasets: HashMap<String, Arc<Dataset>>,
    /// Identifiers in insertion order, so listing is stable.
    order: Vec<String>,
}

/// Shared dataset store, constructed once and handed to every request
/// handler.
#[derive(Default)]
pub struct DatasetRegistry {
    inner: RwLock<RegistryInner>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a fresh identifier and store the dataset. The id written into
    /// the stored record always matches the returned id.
    pub async fn create(&self, mut dataset: Dataset) -> String {
        let mut inner = self.inner.write().await;

        let mut id = new_dataset_id();
        while inner.datasets.contains_key(&id) {
            id = new_dataset_id();
        }

        dataset.dataset_id = id.clone();
        inner.order.push(id.clone());
        inner.datasets.insert(id.clone(), Arc::new(dataset));

        tracing::info!(dataset_id = %id, total = inner.order.len(), "dataset registered");
        id
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Dataset>> {
        self.inner.read().await.datasets.get(id).cloned()
    }

    /// Summaries in creation order.
    pub async fn list(&self) -> Vec<DatasetSummary> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.datasets.get(id))
            .map(|dataset| DatasetSummary::from(dataset.as_ref()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn new_dataset_id() -> String {
    format!("ds-{}", &Uuid::new_v4().simple().to_string()[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(project: &str) -> Dataset {
        Dataset {
            dataset_id: String::new(),
            project: project.to_owned(),
            created_at: UtcDateTime::now(),
            frequency: Frequency::OneDay,
            horizon_days: 10,
            seed: 42,
            series: Vec::new(),
            events: Vec::new(),
            realism_score: 85.0,
            total_rows: 11,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_stores_snapshot() {
        let registry = DatasetRegistry::new();
        let id = registry.create(dataset("alpha")).await;

        assert!(id.starts_with("ds-"));
        assert_eq!(id.len(), 15);

        let stored = registry.get(&id).await.expect("stored");
        assert_eq!(stored.dataset_id, id);
        assert_eq!(stored.project, "alpha");
    }

    #[tokio::test]
    async fn unknown_id_returns_none() {
        let registry = DatasetRegistry::new();
        assert!(registry.get("ds-missing").await.is_none());
    }

    #[tokio::test]
    async fn list_preserves_creation_order() {
        let registry = DatasetRegistry::new();
        let first = registry.create(dataset("one")).await;
        let second = registry.create(dataset("two")).await;

        let listed = registry.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].dataset_id, first);
        assert_eq!(listed[1].dataset_id, second);
    }
}
