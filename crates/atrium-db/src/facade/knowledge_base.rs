//! Knowledge-base façade.

use atrium_core::registry::Table;
use atrium_core::types::{KbArticle, KbArticleUpdate, NewKbArticle};

use crate::error::StoreResult;
use crate::store::{FieldCondition, KvStore, Page, PageRequest, QueryOptions};

use super::{from_record, to_map};

/// Typed access to the knowledge-base table.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseFacade {
    store: KvStore,
}

impl KnowledgeBaseFacade {
    pub fn new(store: KvStore) -> Self {
        KnowledgeBaseFacade { store }
    }

    pub async fn create(&self, req: NewKbArticle) -> StoreResult<KbArticle> {
        let record = self.store.create(Table::KnowledgeBase, to_map(&req)?).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<KbArticle>> {
        match self.store.get(Table::KnowledgeBase, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<KbArticle>> {
        self.store
            .scan(Table::KnowledgeBase, page)
            .await?
            .try_map(from_record)
    }

    /// Articles in one category, via the category index.
    pub async fn by_category(&self, category: &str, opts: QueryOptions) -> StoreResult<Page<KbArticle>> {
        self.store
            .query(
                Table::KnowledgeBase,
                FieldCondition::eq("category", category),
                opts,
            )
            .await?
            .try_map(from_record)
    }

    pub async fn update(&self, id: &str, update: KbArticleUpdate) -> StoreResult<KbArticle> {
        let record = self
            .store
            .update(Table::KnowledgeBase, id, to_map(&update)?)
            .await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::KnowledgeBase, id).await
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
    async fn test_articles_by_category() {
        let db = Database::new(DbConfig::in_memory(), TableRegistry::with_defaults())
            .await
            .unwrap();
        let kb = db.knowledge_base();

        for (title, category) in [
            ("Reset your password", "accounts"),
            ("Export to CSV", "reports"),
            ("Invite a teammate", "accounts"),
        ] {
            kb.create(NewKbArticle {
                title: title.to_string(),
                content: "...".to_string(),
                category: Some(category.to_string()),
                tags: vec![],
            })
            .await
            .unwrap();
        }

        let page = kb
            .by_category("accounts", QueryOptions::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
    }
}
