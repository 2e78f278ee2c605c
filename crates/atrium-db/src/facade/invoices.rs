//! Invoice façade.

use serde_json::json;

use atrium_core::registry::Table;
use atrium_core::types::{Invoice, InvoiceStatus, InvoiceUpdate, NewInvoice};

use crate::error::StoreResult;
use crate::store::{FieldCondition, KvStore, Page, PageRequest, QueryOptions};

use super::{from_record, to_map};

/// Typed access to the invoices table.
#[derive(Debug, Clone)]
pub struct InvoiceFacade {
    store: KvStore,
}

impl InvoiceFacade {
    pub fn new(store: KvStore) -> Self {
        InvoiceFacade { store }
    }

    /// Creates an invoice; new invoices start as drafts.
    pub async fn create(&self, req: NewInvoice) -> StoreResult<Invoice> {
        let mut item = to_map(&req)?;
        item.insert("status".to_string(), json!(InvoiceStatus::Draft));

        let record = self.store.create(Table::Invoices, item).await?;
        from_record(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Invoice>> {
        match self.store.get(Table::Invoices, id).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<Invoice>> {
        self.store.scan(Table::Invoices, page).await?.try_map(from_record)
    }

    pub async fn for_client(&self, client_id: &str, opts: QueryOptions) -> StoreResult<Page<Invoice>> {
        self.store
            .query(Table::Invoices, FieldCondition::eq("clientId", client_id), opts)
            .await?
            .try_map(from_record)
    }

    pub async fn update(&self, id: &str, update: InvoiceUpdate) -> StoreResult<Invoice> {
        let record = self.store.update(Table::Invoices, id, to_map(&update)?).await?;
        from_record(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(Table::Invoices, id).await
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
    async fn test_invoice_lifecycle() {
        let db = Database::new(DbConfig::in_memory(), TableRegistry::with_defaults())
            .await
            .unwrap();
        let invoices = db.invoices();

        let invoice = invoices
            .create(NewInvoice {
                client_id: "c-1".to_string(),
                amount_cents: 12_500,
                currency: "USD".to_string(),
                due_date: None,
            })
            .await
            .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.amount_cents, 12_500);

        let paid = invoices
            .update(
                &invoice.id,
                InvoiceUpdate {
                    status: Some(InvoiceStatus::Paid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert_eq!(paid.amount_cents, 12_500);

        let page = invoices
            .for_client("c-1", QueryOptions::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }
}
