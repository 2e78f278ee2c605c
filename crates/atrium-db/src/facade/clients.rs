//! Client façade.

use atrium_core::registry::Table;
use atrium_core::types::{Client, ClientUpdate, NewClient};

use crate::error::StoreResult;
use crate::store::{KvStore, Page, PageRequest};

use super::{from_record, to_map};

/// Typed access to the clients table.
#[derive(Debug, Clone)]
pub struct ClientFacade {
    store: KvStore,
}

impl ClientFacade {
    pub fn new(store: KvStore) -> Self {
        ClientFacade { store }
    }

    pub async fn create(&self, req: NewClient) -> StoreResult<Client> {
        let record = self.store.create(Table::Clients, to_map(&req)?).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Client>> {
        match self.store.get(Table::Clients, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<Client>> {
        self.store.scan(Table::Clients, page).await?.try_map(from_record)
    }

    pub async fn update(&self, id: &str, update: ClientUpdate) -> StoreResult<Client> {
        let record = self.store.update(Table::Clients, id, to_map(&update)?).await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::Clients, id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
