//! User façades: portal users and back-office administrators.
//!
//! Both tables store an Argon2 `passwordHash`, never a plaintext password.
//! Hashing and verification live at the API boundary; this layer only
//! persists what it is handed.

use atrium_core::registry::Table;
use atrium_core::types::{
    AdminUser, AdminUserUpdate, NewAdminUser, NewUser, User, UserUpdate,
};

use crate::error::StoreResult;
use crate::store::{FieldCondition, KvStore, Page, PageRequest, QueryOptions};

use super::{from_record, to_map};

/// Typed access to the portal users table.
#[derive(Debug, Clone)]
pub struct UserFacade {
    store: KvStore,
}

impl UserFacade {
    pub fn new(store: KvStore) -> Self {
        UserFacade { store }
    }

    pub async fn create(&self, req: NewUser) -> StoreResult<User> {
        let record = self.store.create(Table::Users, to_map(&req)?).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<User>> {
        match self.store.get(Table::Users, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    /// Looks a user up by username, via the username index.
    ///
    /// Login path. Returns the first match; username uniqueness is enforced
    /// at creation time by the API layer.
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let page = self
            .store
            .query(
                Table::Users,
                FieldCondition::eq("username", username),
                QueryOptions {
                    limit: Some(1),
                    ..Default::default()
                },
            )
            .await?;

        match page.items.into_iter().next() {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<User>> {
        self.store.scan(Table::Users, page).await?.try_map(from_record)
    }

    pub async fn for_client(&self, client_id: &str, opts: QueryOptions) -> StoreResult<Page<User>> {
        self.store
            .query(Table::Users, FieldCondition::eq("clientId", client_id), opts)
            .await?
            .try_map(from_record)
    }

    pub async fn update(&self, id: &str, update: UserUpdate) -> StoreResult<User> {
        let record = self.store.update(Table::Users, id, to_map(&update)?).await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::Users, id).await
    }
}

/// Typed access to the admin users table.
#[derive(Debug, Clone)]
pub struct AdminUserFacade {
    store: KvStore,
}

impl AdminUserFacade {
    pub fn new(store: KvStore) -> Self {
        AdminUserFacade { store }
    }

    pub async fn create(&self, req: NewAdminUser) -> StoreResult<AdminUser> {
        let record = self.store.create(Table::AdminUsers, to_map(&req)?).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<AdminUser>> {
        match self.store.get(Table::AdminUsers, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    /// Looks an administrator up by username, via the username index.
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>> {
        let page = self
            .store
            .query(
                Table::AdminUsers,
                FieldCondition::eq("username", username),
                QueryOptions {
                    limit: Some(1),
                    ..Default::default()
                },
            )
            .await?;

        match page.items.into_iter().next() {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<AdminUser>> {
        self.store
            .scan(Table::AdminUsers, page)
            .await?
            .try_map(from_record)
    }

    pub async fn update(&self, id: &str, update: AdminUserUpdate) -> StoreResult<AdminUser> {
        let record = self
            .store
            .update(Table::AdminUsers, id, to_map(&update)?)
            .await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::AdminUsers, id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
