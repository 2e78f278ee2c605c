//! Ticket façade: creation defaults, reply threads, per-client queries.

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use atrium_core::registry::Table;
use atrium_core::types::{NewTicket, NewTicketReply, Ticket, TicketReply, TicketStatus, TicketUpdate};
use atrium_core::TICKET_NUMBER_PREFIX;

use crate::error::StoreResult;
use crate::store::{FieldCondition, KvStore, Page, PageRequest, QueryOptions};

use super::{from_record, to_map};

/// Typed access to the tickets table.
#[derive(Debug, Clone)]
pub struct TicketFacade {
    store: KvStore,
}

impl TicketFacade {
    pub fn new(store: KvStore) -> Self {
        TicketFacade { store }
    }

    /// Creates a ticket.
    ///
    /// Whatever the caller sent, a new ticket starts with `status: Open`, an
    /// empty reply thread, and a freshly generated ticket number.
    pub async fn create(&self, req: NewTicket) -> StoreResult<Ticket> {
        let mut item = to_map(&req)?;
        item.insert("status".to_string(), json!(TicketStatus::Open));
        item.insert("replies".to_string(), json!([]));
        item.insert(
            "ticketNumber".to_string(),
            json!(generate_ticket_number()),
        );

        let record = self.store.create(Table::Tickets, item).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Ticket>> {
        match self.store.get(Table::Tickets, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<Ticket>> {
        self.store.scan(Table::Tickets, page).await?.try_map(from_record)
    }

    /// Tickets belonging to one client, via the clientId index.
    pub async fn for_client(&self, client_id: &str, opts: QueryOptions) -> StoreResult<Page<Ticket>> {
        self.store
            .query(Table::Tickets, FieldCondition::eq("clientId", client_id), opts)
            .await?
            .try_map(from_record)
    }

    /// Tickets in one lifecycle state, via the status index.
    pub async fn by_status(&self, status: TicketStatus, opts: QueryOptions) -> StoreResult<Page<Ticket>> {
        self.store
            .query(Table::Tickets, FieldCondition::eq("status", json!(status)), opts)
            .await?
            .try_map(from_record)
    }

    /// Applies a partial update to the closed set of updatable fields.
    pub async fn update(&self, id: &str, update: TicketUpdate) -> StoreResult<Ticket> {
        let patch = to_map(&update)?;
        let record = self.store.update(Table::Tickets, id, patch).await?;
        from_record(record)
    }

    /// Appends a reply to the ticket thread.
    ///
    /// Read-modify-write: the whole thread is rewritten with the new reply
    /// appended, and `updatedAt` advances with it.
    pub async fn add_reply(&self, id: &str, reply: NewTicketReply) -> StoreResult<Ticket> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| crate::error::StoreError::not_found("Tickets", id))?;

        let mut replies = existing.replies;
        replies.push(TicketReply {
            author: reply.author,
            body: reply.body,
            created_at: Utc::now(),
        });

        debug!(id = %id, thread_len = replies.len(), "Appending ticket reply");

        let mut patch = crate::store::JsonMap::new();
        patch.insert("replies".to_string(), json!(replies));
        let record = self.store.update(Table::Tickets, id, patch).await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::Tickets, id).await
    }
}

/// Generates a human-readable ticket number from the current time.
fn generate_ticket_number() -> String {
    format!("{}-{}", TICKET_NUMBER_PREFIX, Utc::now().timestamp_millis())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use atrium_core::registry::TableRegistry;
    use atrium_core::types::TicketPriority;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory(), TableRegistry::with_defaults())
            .await
            .unwrap()
    }

    fn new_ticket(subject: &str) -> NewTicket {
        NewTicket {
            subject: subject.to_string(),
            description: None,
            priority: TicketPriority::Medium,
            client_id: Some("c-1".to_string()),
            app_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_forces_open_status_and_empty_thread() {
        let db = test_db().await;

        let ticket = db.tickets().create(new_ticket("Export broken")).await.unwrap();

        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.replies.is_empty());
        assert_eq!(ticket.subject, "Export broken");
    }

    #[tokio::test]
    async fn test_ticket_number_shape() {
        let db = test_db().await;

        let ticket = db.tickets().create(new_ticket("s")).await.unwrap();

        let suffix = ticket
            .ticket_number
            .strip_prefix("TKT-")
            .expect("ticket number must start with TKT-");
        assert!(!suffix.is_empty());
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_add_reply_appends_in_order() {
        let db = test_db().await;
        let tickets = db.tickets();

        let ticket = tickets.create(new_ticket("s")).await.unwrap();

        tickets
            .add_reply(
                &ticket.id,
                NewTicketReply {
                    author: "Ana".to_string(),
                    body: "Looking into it".to_string(),
                },
            )
            .await
            .unwrap();
        let after = tickets
            .add_reply(
                &ticket.id,
                NewTicketReply {
                    author: "Ben".to_string(),
                    body: "Fixed".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(after.replies.len(), 2);
        assert_eq!(after.replies[0].author, "Ana");
        assert_eq!(after.replies[1].author, "Ben");
    }

    #[tokio::test]
    async fn test_update_leaves_absent_fields_alone() {
        let db = test_db().await;
        let tickets = db.tickets();

        let ticket = tickets.create(new_ticket("Original subject")).await.unwrap();

        let updated = tickets
            .update(
                &ticket.id,
                TicketUpdate {
                    status: Some(TicketStatus::Resolved),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, TicketStatus::Resolved);
        assert_eq!(updated.subject, "Original subject");
        assert_eq!(updated.ticket_number, ticket.ticket_number);
    }

    #[tokio::test]
    async fn test_for_client_uses_index() {
        let db = test_db().await;
        let tickets = db.tickets();

        tickets.create(new_ticket("a")).await.unwrap();
        tickets.create(new_ticket("b")).await.unwrap();
        tickets
            .create(NewTicket {
                client_id: Some("c-2".to_string()),
                ..new_ticket("c")
            })
            .await
            .unwrap();

        let page = tickets
            .for_client("c-1", QueryOptions::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|t| t.client_id.as_deref() == Some("c-1")));
    }
}
