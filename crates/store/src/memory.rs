use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use tiendita_catalog::Product;
use tiendita_core::ProductId;
use tiendita_editor::{ProductStore, StoreError, StoreResult};
use tiendita_inventory::InventoryItem;

/// In-memory product/inventory store.
///
/// Not optimized for performance. The `fail_next_*` switches inject a single
/// failure into the next matching write, for exercising the SaveFailed and
/// compensation paths.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<HashMap<ProductId, Product>>,
    inventory: RwLock<HashMap<ProductId, InventoryItem>>,
    fail_next_product_save: AtomicBool,
    fail_next_inventory_save: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `save_product` fail once.
    pub fn fail_next_product_save(&self) {
        self.fail_next_product_save.store(true, Ordering::SeqCst);
    }

    /// Make the next `save_inventory_total` fail once.
    pub fn fail_next_inventory_save(&self) {
        self.fail_next_inventory_save.store(true, Ordering::SeqCst);
    }

    /// Direct read access for assertions.
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.products
            .read()
            .ok()
            .and_then(|m| m.get(&id).cloned())
    }

    /// Direct read access for assertions.
    pub fn inventory_item(&self, id: ProductId) -> Option<InventoryItem> {
        self.inventory
            .read()
            .ok()
            .and_then(|m| m.get(&id).cloned())
    }

    fn take(flag: &AtomicBool) -> bool {
        flag.swap(false, Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn fetch_products(&self) -> StoreResult<Vec<Product>> {
        let products = self
            .products
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(products.values().cloned().collect())
    }

    async fn fetch_inventory(&self) -> StoreResult<Vec<InventoryItem>> {
        let inventory = self
            .inventory
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(inventory.values().cloned().collect())
    }

    async fn save_product(&self, product: Product) -> StoreResult<Product> {
        if Self::take(&self.fail_next_product_save) {
            return Err(StoreError::Unavailable("injected product-save failure".to_string()));
        }
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        products.insert(product.id_typed(), product.clone());
        Ok(product)
    }

    async fn save_inventory_total(
        &self,
        product_id: ProductId,
        stock: i64,
    ) -> StoreResult<InventoryItem> {
        if Self::take(&self.fail_next_inventory_save) {
            return Err(StoreError::Unavailable(
                "injected inventory-save failure".to_string(),
            ));
        }
        if stock < 0 {
            return Err(StoreError::Rejected("stock cannot be negative".to_string()));
        }
        let mut inventory = self
            .inventory
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let item = inventory
            .entry(product_id)
            .or_insert_with(|| InventoryItem::new(product_id, 0, Utc::now()));
        item.set_total(stock, Utc::now());
        Ok(item.clone())
    }

    async fn mark_needs_inventory_sync(&self, product_id: ProductId) -> StoreResult<()> {
        let mut inventory = self
            .inventory
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        inventory
            .entry(product_id)
            .or_insert_with(|| InventoryItem::new(product_id, 0, Utc::now()))
            .mark_needs_sync();
        Ok(())
    }
}
