//! Feature request façade: defaults, voting, per-client queries.

use serde_json::json;

use atrium_core::registry::Table;
use atrium_core::types::{
    FeatureRequest, FeatureRequestStatus, FeatureRequestUpdate, NewFeatureRequest,
};

use crate::error::{StoreError, StoreResult};
use crate::store::{FieldCondition, JsonMap, KvStore, Page, PageRequest, QueryOptions};

use super::{from_record, to_map};

/// Typed access to the feature requests table.
#[derive(Debug, Clone)]
pub struct FeatureRequestFacade {
    store: KvStore,
}

impl FeatureRequestFacade {
    pub fn new(store: KvStore) -> Self {
        FeatureRequestFacade { store }
    }

    /// Creates a feature request; new requests start UnderReview with zero votes.
    pub async fn create(&self, req: NewFeatureRequest) -> StoreResult<FeatureRequest> {
        let mut item = to_map(&req)?;
        item.insert("status".to_string(), json!(FeatureRequestStatus::UnderReview));
        item.insert("votes".to_string(), json!(0));

        let record = self.store.create(Table::FeatureRequests, item).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<FeatureRequest>> {
        match self.store.get(Table::FeatureRequests, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<FeatureRequest>> {
        self.store
            .scan(Table::FeatureRequests, page)
            .await?
            .try_map(from_record)
    }

    pub async fn for_client(
        &self,
        client_id: &str,
        opts: QueryOptions,
    ) -> StoreResult<Page<FeatureRequest>> {
        self.store
            .query(
                Table::FeatureRequests,
                FieldCondition::eq("clientId", client_id),
                opts,
            )
            .await?
            .try_map(from_record)
    }

    pub async fn update(&self, id: &str, update: FeatureRequestUpdate) -> StoreResult<FeatureRequest> {
        let record = self
            .store
            .update(Table::FeatureRequests, id, to_map(&update)?)
            .await?;
        from_record(record)
    }

    /// Adds one upvote.
    pub async fn vote(&self, id: &str) -> StoreResult<FeatureRequest> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| StoreError::not_found("FeatureRequests", id))?;

        let mut patch = JsonMap::new();
        patch.insert("votes".to_string(), json!(existing.votes + 1));
        let record = self.store.update(Table::FeatureRequests, id, patch).await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::FeatureRequests, id).await
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory(), TableRegistry::with_defaults())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_starts_under_review_with_zero_votes() {
        let db = test_db().await;

        let request = db
            .feature_requests()
            .create(NewFeatureRequest {
                title: "Dark mode".to_string(),
                description: None,
                client_id: Some("c-1".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(request.status, FeatureRequestStatus::UnderReview);
        assert_eq!(request.votes, 0);
    }

    #[tokio::test]
    async fn test_vote_increments() {
        let db = test_db().await;
        let requests = db.feature_requests();

        let request = requests
            .create(NewFeatureRequest {
                title: "Dark mode".to_string(),
                description: None,
                client_id: None,
            })
            .await
            .unwrap();

        requests.vote(&request.id).await.unwrap();
        let after = requests.vote(&request.id).await.unwrap();
        assert_eq!(after.votes, 2);
    }

    #[tokio::test]
    async fn test_vote_missing_is_not_found() {
        let db = test_db().await;

        let err = db.feature_requests().vote("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
