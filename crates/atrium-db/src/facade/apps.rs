//! App façade.

use atrium_core::registry::Table;
use atrium_core::types::{App, AppUpdate, NewApp};

use crate::error::StoreResult;
use crate::store::{KvStore, Page, PageRequest};

use super::{from_record, to_map};

/// Typed access to the apps table.
#[derive(Debug, Clone)]
pub struct AppFacade {
    store: KvStore,
}

impl AppFacade {
    pub fn new(store: KvStore) -> Self {
        AppFacade { store }
    }

    pub async fn create(&self, req: NewApp) -> StoreResult<App> {
        let record = self.store.create(Table::Apps, to_map(&req)?).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<App>> {
        match self.store.get(Table::Apps, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<App>> {
        self.store.scan(Table::Apps, page).await?.try_map(from_record)
    }

    pub async fn update(&self, id: &str, update: AppUpdate) -> StoreResult<App> {
        let record = self.store.update(Table::Apps, id, to_map(&update)?).await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::Apps, id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
