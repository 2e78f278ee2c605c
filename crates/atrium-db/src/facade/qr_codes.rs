//! QR code façade.
//!
//! Unlike every other entity, QR codes are keyed by their code value - no id
//! is ever generated for them, and there is no update path (a code is either
//! issued or revoked).

use atrium_core::registry::Table;
use atrium_core::types::{NewQrCode, QrCode};

use crate::error::StoreResult;
use crate::store::{KvStore, Page, PageRequest};

use super::{from_record, to_map};

/// Typed access to the QR codes table.
#[derive(Debug, Clone)]
pub struct QrCodeFacade {
    store: KvStore,
}

impl QrCodeFacade {
    pub fn new(store: KvStore) -> Self {
        QrCodeFacade { store }
    }

    /// Issues a QR code. Racing issues of the same code resolve with exactly
    /// one winner.
    pub async fn create(&self, req: NewQrCode) -> StoreResult<QrCode> {
        let record = self.store.create(Table::QrCodes, to_map(&req)?).await?;
        from_record(record)
    }

    pub async fn get(&self, code: &str) -> StoreResult<Option<QrCode>> {
        match self.store.get(Table::QrCodes, code).await? {
            Some(record) => Ok(Some(from_record(record)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, page: PageRequest) -> StoreResult<Page<QrCode>> {
        self.store.scan(Table::QrCodes, page).await?.try_map(from_record)
    }

    /// Revokes a QR code.
    pub async fn delete(&self, code: &str) -> StoreResult<()> {
        self.store.delete(Table::QrCodes, code).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};
    use atrium_core::registry::TableRegistry;

    #[tokio::test]
    async fn test_code_is_the_key() {
        let db = Database::new(DbConfig::in_memory(), TableRegistry::with_defaults())
            .await
            .unwrap();
        let codes = db.qr_codes();

        let issued = codes
            .create(NewQrCode {
                code: "QR-ACME-001".to_string(),
                client_id: "c-1".to_string(),
                expires_at: None,
            })
            .await
            .unwrap();
        assert_eq!(issued.code, "QR-ACME-001");

        // A second issue of the same code loses.
        let err = codes
            .create(NewQrCode {
                code: "QR-ACME-001".to_string(),
                client_id: "c-2".to_string(),
                expires_at: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));

        codes.delete("QR-ACME-001").await.unwrap();
        assert!(codes.get("QR-ACME-001").await.unwrap().is_none());
    }
}
