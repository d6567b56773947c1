//! # Master Data
//!
//! Customers, vendors, and inventory items, maintained as side effects of
//! saving documents.
//!
//! ## Upsert Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Master Upserts on Save                           │
//! │                                                                     │
//! │  customer (key: name)                                               │
//! │    • blank name → skipped entirely                                  │
//! │    • contact/address/tax fields follow the latest saved document    │
//! │    • payment terms only overwritten when the document carries one   │
//! │                                                                     │
//! │  vendor (key: name)                                                 │
//! │    • add-if-missing only; nothing else to maintain                  │
//! │                                                                     │
//! │  item (key: sku)                                                    │
//! │    • blank sku → skipped                                            │
//! │    • price/tax always follow the latest document line               │
//! │    • description/vendor only overwritten when non-empty             │
//! │    • new SKUs get a fresh record id                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Direct item-master edits (the item form) go through [`MasterData::save_item`],
//! which is the only master write that can fail validation.

use tracing::debug;
use uuid::Uuid;

use datatec_core::{validation, Customer, ItemRecord, LineItem, Vendor};

use crate::error::StoreResult;
use crate::kv::KvStore;
use crate::records::{keys, RecordStore};

/// Master-data maintenance over the key/value store.
#[derive(Debug, Clone)]
pub struct MasterData {
    kv: KvStore,
}

impl MasterData {
    /// Creates a new MasterData service.
    pub fn new(kv: KvStore) -> Self {
        MasterData { kv }
    }

    fn records(&self) -> RecordStore {
        RecordStore::new(self.kv.clone())
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// All customer records.
    pub async fn customers(&self) -> StoreResult<Vec<Customer>> {
        self.kv.read(keys::CUSTOMERS, Vec::new()).await
    }

    /// All vendor records.
    pub async fn vendors(&self) -> StoreResult<Vec<Vendor>> {
        self.kv.read(keys::VENDORS, Vec::new()).await
    }

    /// All item master records.
    pub async fn items(&self) -> StoreResult<Vec<ItemRecord>> {
        self.kv.read(keys::ITEMS, Vec::new()).await
    }

    // =========================================================================
    // Document-Driven Upserts
    // =========================================================================

    /// Upserts a customer by name. A blank name is skipped; otherwise the
    /// mutable fields follow the incoming record, except payment terms,
    /// which are kept when the incoming record has none.
    pub async fn upsert_customer(&self, incoming: &Customer) -> StoreResult<()> {
        if incoming.name.trim().is_empty() {
            return Ok(());
        }

        let mut customers = self.customers().await?;
        match customers.iter_mut().find(|c| c.name == incoming.name) {
            Some(existing) => {
                existing.attention = incoming.attention.clone();
                existing.email = incoming.email.clone();
                existing.billing = incoming.billing.clone();
                existing.shipping = incoming.shipping.clone();
                existing.tax_scheme = incoming.tax_scheme;
                if !incoming.payment_terms.is_empty() {
                    existing.payment_terms = incoming.payment_terms.clone();
                }
            }
            None => {
                debug!(name = %incoming.name, "New customer from document save");
                customers.push(incoming.clone());
            }
        }
        self.kv.write(keys::CUSTOMERS, &customers).await
    }

    /// Adds a vendor by name if it isn't known yet. Blank names are skipped.
    pub async fn upsert_vendor(&self, name: &str) -> StoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }

        let mut vendors = self.vendors().await?;
        if vendors.iter().any(|v| v.name == name) {
            return Ok(());
        }

        debug!(name = %name, "New vendor from document save");
        vendors.push(Vendor { name: name.into() });
        self.kv.write(keys::VENDORS, &vendors).await
    }

    /// Adds every vendor named on the given lines.
    pub async fn upsert_vendors_from_items(&self, items: &[LineItem]) -> StoreResult<()> {
        for item in items {
            self.upsert_vendor(&item.vendor).await?;
        }
        Ok(())
    }

    /// Upserts item masters from document lines, keyed by SKU.
    ///
    /// Price and tax always follow the latest document; description and
    /// vendor are only overwritten when the line actually carries one, so
    /// a terse reorder line can't blank out a curated item master.
    pub async fn upsert_items(&self, lines: &[LineItem]) -> StoreResult<()> {
        let mut items = self.items().await?;
        let mut changed = false;

        for line in lines {
            if line.sku.trim().is_empty() {
                continue;
            }
            changed = true;
            match items.iter_mut().find(|i| i.sku == line.sku) {
                Some(existing) => {
                    existing.price = line.price;
                    existing.tax = line.tax;
                    if !line.description.is_empty() {
                        existing.description = line.description.clone();
                    }
                    if !line.vendor.is_empty() {
                        existing.vendor = line.vendor.clone();
                    }
                }
                None => {
                    debug!(sku = %line.sku, "New item master from document line");
                    items.push(ItemRecord {
                        id: Uuid::new_v4().to_string(),
                        sku: line.sku.clone(),
                        description: line.description.clone(),
                        price: line.price,
                        tax: line.tax,
                        vendor: line.vendor.clone(),
                    });
                }
            }
        }

        if changed {
            self.kv.write(keys::ITEMS, &items).await?;
        }
        Ok(())
    }

    // =========================================================================
    // Direct Item-Master Edits
    // =========================================================================

    /// Saves an item master record edited directly. A missing SKU blocks
    /// the save; a record without an id gets a fresh one.
    pub async fn save_item(&self, item: &ItemRecord) -> StoreResult<ItemRecord> {
        validation::validate_item(item)?;

        let mut item = item.clone();
        if item.id.is_empty() {
            item.id = Uuid::new_v4().to_string();
        }
        self.records().save(keys::ITEMS, &item).await?;
        Ok(item)
    }

    /// Deletes an item master record by id. A no-op when absent.
    pub async fn delete_item(&self, id: &str) -> StoreResult<()> {
        self.records().delete(keys::ITEMS, id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    async fn masters() -> MasterData {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        store.masters()
    }

    fn line(sku: &str, description: &str, price: f64, tax: f64, vendor: &str) -> LineItem {
        LineItem {
            sku: sku.into(),
            description: description.into(),
            qty: 1.0,
            price,
            tax,
            vendor: vendor.into(),
        }
    }

    #[tokio::test]
    async fn test_customer_upsert_and_update() {
        let masters = masters().await;

        masters
            .upsert_customer(&Customer {
                name: "Acme".into(),
                email: "old@acme.example".into(),
                payment_terms: "30 days".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        // Later save carries new contact details but no terms
        masters
            .upsert_customer(&Customer {
                name: "Acme".into(),
                email: "new@acme.example".into(),
                billing: "1 Jalan Satu".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let customers = masters.customers().await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].email, "new@acme.example");
        assert_eq!(customers[0].billing, "1 Jalan Satu");
        assert_eq!(customers[0].payment_terms, "30 days");
    }

    #[tokio::test]
    async fn test_blank_customer_name_is_skipped() {
        let masters = masters().await;
        masters
            .upsert_customer(&Customer {
                name: "  ".into(),
                email: "x@example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(masters.customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vendor_add_if_missing() {
        let masters = masters().await;
        masters.upsert_vendor("Vendor A").await.unwrap();
        masters.upsert_vendor("Vendor A").await.unwrap();
        masters.upsert_vendor("").await.unwrap();

        let vendors = masters.vendors().await.unwrap();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors[0].name, "Vendor A");
    }

    #[tokio::test]
    async fn test_item_upsert_rules() {
        let masters = masters().await;

        masters
            .upsert_items(&[line("A1", "Widget, large", 10.0, 6.0, "Vendor A")])
            .await
            .unwrap();

        // Reorder line: new price, no description, no vendor
        masters
            .upsert_items(&[line("A1", "", 12.5, 6.0, "")])
            .await
            .unwrap();

        let items = masters.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price, 12.5);
        assert_eq!(items[0].description, "Widget, large");
        assert_eq!(items[0].vendor, "Vendor A");
        assert!(!items[0].id.is_empty());
    }

    #[tokio::test]
    async fn test_blank_sku_lines_do_not_create_items() {
        let masters = masters().await;
        masters
            .upsert_items(&[line("", "orphan description", 5.0, 0.0, "")])
            .await
            .unwrap();

        assert!(masters.items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_item_requires_sku() {
        let masters = masters().await;
        let err = masters
            .save_item(&ItemRecord {
                description: "no sku".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("sku"));
    }

    #[tokio::test]
    async fn test_save_item_assigns_id_once() {
        let masters = masters().await;
        let saved = masters
            .save_item(&ItemRecord {
                sku: "A1".into(),
                description: "Widget".into(),
                price: 10.0,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!saved.id.is_empty());

        let again = masters.save_item(&saved).await.unwrap();
        assert_eq!(again.id, saved.id);
        assert_eq!(masters.items().await.unwrap().len(), 1);
    }
}
