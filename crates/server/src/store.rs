use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use clientes_core::{Cliente, ClienteChanges, ClienteFields, ClienteId};
use tokio::sync::Mutex;

/// Document collection holding cliente records.
///
/// Each call is a single-document operation; ids are validated by the caller
/// before they get here.
#[async_trait]
pub trait ClienteStore: Send + Sync + 'static {
    async fn insert(&self, id: ClienteId, fields: ClienteFields) -> Result<()>;

    async fn find_by_id(&self, id: ClienteId) -> Result<Option<Cliente>>;

    /// All records, oldest first.
    async fn find_all(&self) -> Result<Vec<Cliente>>;

    /// Returns false when no record matched `id`.
    async fn update_by_id(&self, id: ClienteId, changes: ClienteChanges) -> Result<bool>;

    /// Returns the number of records deleted (0 or 1).
    async fn delete_by_id(&self, id: ClienteId) -> Result<u64>;
}

/// In-memory store for tests and scratch runs. Not durable.
///
/// Ids are ULIDs, so key order is creation order.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<BTreeMap<ClienteId, Cliente>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClienteStore for InMemoryStore {
    async fn insert(&self, id: ClienteId, fields: ClienteFields) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.contains_key(&id) {
            anyhow::bail!("duplicate cliente id {id}");
        }
        inner.insert(id, Cliente::from_fields(id, fields));
        Ok(())
    }

    async fn find_by_id(&self, id: ClienteId) -> Result<Option<Cliente>> {
        Ok(self.inner.lock().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Cliente>> {
        Ok(self.inner.lock().await.values().cloned().collect())
    }

    async fn update_by_id(&self, id: ClienteId, changes: ClienteChanges) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        match inner.get_mut(&id) {
            Some(c) => {
                c.apply(&changes);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: ClienteId) -> Result<u64> {
        Ok(u64::from(self.inner.lock().await.remove(&id).is_some()))
    }
}
