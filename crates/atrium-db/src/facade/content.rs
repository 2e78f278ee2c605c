//! Portal landing-page content: recent updates and popular topics.

use serde_json::json;

use atrium_core::registry::Table;
use atrium_core::types::{
    NewPopularTopic, NewRecentUpdate, PopularTopic, PopularTopicUpdate, RecentUpdate,
    RecentUpdateUpdate,
};

use crate::error::{StoreError, StoreResult};
use crate::store::{JsonMap, KvStore, Page, PageRequest};

use super::{from_record, to_map};

/// Typed access to the recent updates table.
#[derive(Debug, Clone)]
pub struct RecentUpdateFacade {
    store: KvStore,
}

impl RecentUpdateFacade {
    pub fn new(store: KvStore) -> Self {
        RecentUpdateFacade { store }
    }

    pub async fn create(&self, req: NewRecentUpdate) -> StoreResult<RecentUpdate> {
        let record = self.store.create(Table::RecentUpdates, to_map(&req)?).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<RecentUpdate>> {
        match self.store.get(Table::RecentUpdates, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<RecentUpdate>> {
        self.store
            .scan(Table::RecentUpdates, page)
            .await?
            .try_map(from_record)
    }

    pub async fn update(&self, id: &str, update: RecentUpdateUpdate) -> StoreResult<RecentUpdate> {
        let record = self
            .store
            .update(Table::RecentUpdates, id, to_map(&update)?)
            .await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::RecentUpdates, id).await
    }
}

/// Typed access to the popular topics table.
#[derive(Debug, Clone)]
pub struct PopularTopicFacade {
    store: KvStore,
}

impl PopularTopicFacade {
    pub fn new(store: KvStore) -> Self {
        PopularTopicFacade { store }
    }

    /// Creates a topic; the view counter starts at zero.
    pub async fn create(&self, req: NewPopularTopic) -> StoreResult<PopularTopic> {
        let mut item = to_map(&req)?;
        item.insert("views".to_string(), json!(0));

        let record = self.store.create(Table::PopularTopics, item).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<PopularTopic>> {
        match self.store.get(Table::PopularTopics, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<PopularTopic>> {
        self.store
            .scan(Table::PopularTopics, page)
            .await?
            .try_map(from_record)
    }

    pub async fn update(&self, id: &str, update: PopularTopicUpdate) -> StoreResult<PopularTopic> {
        let record = self
            .store
            .update(Table::PopularTopics, id, to_map(&update)?)
            .await?;
        from_record(record)
    }

    /// Records one view of the topic.
    pub async fn record_view(&self, id: &str) -> StoreResult<PopularTopic> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| StoreError::not_found("PopularTopics", id))?;

        let mut patch = JsonMap::new();
        patch.insert("views".to_string(), json!(existing.views + 1));
        let record = self.store.update(Table::PopularTopics, id, patch).await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::PopularTopics, id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use atrium_core::registry::TableRegistry;

    #[tokio::test]
    async fn test_record_view_increments_counter() {
        let db = Database::new(DbConfig::in_memory(), TableRegistry::with_defaults())
            .await
            .unwrap();
        let topics = db.popular_topics();

        let topic = topics
            .create(NewPopularTopic {
                title: "Resetting your password".to_string(),
                article_id: None,
            })
            .await
            .unwrap();
        assert_eq!(topic.views, 0);

        topics.record_view(&topic.id).await.unwrap();
        let after = topics.record_view(&topic.id).await.unwrap();
        assert_eq!(after.views, 2);
    }

    #[tokio::test]
    async fn test_recent_update_lifecycle() {
        let db = Database::new(DbConfig::in_memory(), TableRegistry::with_defaults())
            .await
            .unwrap();
        let updates = db.recent_updates();

        let update = updates
            .create(NewRecentUpdate {
                title: "Maintenance window".to_string(),
                summary: Some("Saturday 02:00 UTC".to_string()),
            })
            .await
            .unwrap();

        let edited = updates
            .update(
                &update.id,
                RecentUpdateUpdate {
                    title: Some("Maintenance window moved".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.title, "Maintenance window moved");
        assert_eq!(edited.summary.as_deref(), Some("Saturday 02:00 UTC"));
    }
}
