use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tiendita_catalog::{LegacyField, Product, VariantType};
use tiendita_core::{DomainError, DomainResult, ProductId, VariantTypeId};
use tiendita_inventory::{
    Combination, InventoryItem, VariantStockLedger, format_combination, generate_combinations,
};

use crate::store::{CommitError, ProductStore};

/// Editing session lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorState {
    /// Read-only; the row is open but nothing is being edited.
    Viewing,
    /// Product fields open for editing.
    EditingBasics,
    /// Variant axes and the stock grid open for editing.
    EditingVariants,
    /// Commit in flight; no edits, no cancellation.
    Saving,
    /// Commit succeeded; the session is finished.
    Saved,
    /// Commit failed; working state is preserved for resubmission.
    SaveFailed,
}

/// Canonical stored forms returned by a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub product: Product,
    pub inventory: InventoryItem,
}

/// One operator's editing session for one product.
///
/// Exclusively owns the working copies of the product record, the variant
/// axes and the stock ledger; nothing else mutates them while the session is
/// open. Single-operator, no concurrent editing.
#[derive(Debug, Clone)]
pub struct EditorSession {
    product: Product,
    axes: Vec<VariantType>,
    ledger: VariantStockLedger,
    prior_inventory: Option<InventoryItem>,
    state: EditorState,
}

impl EditorSession {
    /// Open a session for a brand-new product: empty axes, empty ledger.
    pub fn open_new(name: &str, sku: &str, price: u64) -> DomainResult<Self> {
        let product = Product::new(ProductId::new(), name, sku, price)?;
        let ledger = VariantStockLedger::new(product.id_typed());
        Ok(Self {
            product,
            axes: Vec::new(),
            ledger,
            prior_inventory: None,
            state: EditorState::EditingBasics,
        })
    }

    /// Open a session for an existing product.
    ///
    /// Axes are seeded from the product's legacy flat fields through the
    /// binding table ("Talla" from `sizes`, "Color" from `colors`; empty
    /// fields seed nothing). The per-combination breakdown is not persisted,
    /// so a product without axes seeds its flat stock into the empty
    /// combination and a product with axes starts with an empty grid.
    pub fn open_existing(
        product: Product,
        inventory: Option<InventoryItem>,
    ) -> DomainResult<Self> {
        let mut axes = Vec::new();
        if !product.sizes().is_empty() {
            axes.push(VariantType::with_values(
                VariantTypeId::new(),
                LegacyField::Sizes.axis_name(),
                product.sizes().to_vec(),
            )?);
        }
        if !product.colors().is_empty() {
            axes.push(VariantType::with_values(
                VariantTypeId::new(),
                LegacyField::Colors.axis_name(),
                product.colors().to_vec(),
            )?);
        }

        let mut ledger = VariantStockLedger::new(product.id_typed());
        if axes.is_empty() {
            if let Some(item) = &inventory {
                ledger.set_stock(&Combination::empty(), item.stock())?;
            }
        }

        Ok(Self {
            product,
            axes,
            ledger,
            prior_inventory: inventory,
            state: EditorState::Viewing,
        })
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn axes(&self) -> &[VariantType] {
        &self.axes
    }

    pub fn ledger(&self) -> &VariantStockLedger {
        &self.ledger
    }

    // ---- state transitions -------------------------------------------------

    /// Open the product fields for editing.
    pub fn edit_basics(&mut self) -> DomainResult<()> {
        match self.state {
            EditorState::Viewing | EditorState::EditingVariants | EditorState::SaveFailed => {
                self.state = EditorState::EditingBasics;
                Ok(())
            }
            EditorState::EditingBasics => Ok(()),
            _ => Err(self.illegal("edit basics")),
        }
    }

    /// Open the variant axes and stock grid for editing.
    pub fn edit_variants(&mut self) -> DomainResult<()> {
        match self.state {
            EditorState::Viewing | EditorState::EditingBasics | EditorState::SaveFailed => {
                self.state = EditorState::EditingVariants;
                Ok(())
            }
            EditorState::EditingVariants => Ok(()),
            _ => Err(self.illegal("edit variants")),
        }
    }

    fn ensure_editing(&self) -> DomainResult<()> {
        match self.state {
            EditorState::EditingBasics | EditorState::EditingVariants => Ok(()),
            _ => Err(self.illegal("edit")),
        }
    }

    fn illegal(&self, action: &str) -> DomainError {
        DomainError::invariant(format!("cannot {action} while {:?}", self.state))
    }

    // ---- product field edits ----------------------------------------------

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        self.ensure_editing()?;
        self.product.set_name(name)
    }

    pub fn set_price(&mut self, price: u64) -> DomainResult<()> {
        self.ensure_editing()?;
        self.product.set_price(price);
        Ok(())
    }

    pub fn set_currency(&mut self, currency: Option<String>) -> DomainResult<()> {
        self.ensure_editing()?;
        self.product.set_currency(currency);
        Ok(())
    }

    // ---- axis edits --------------------------------------------------------

    /// Add a new variant axis. Names must be non-blank and unique within the
    /// session.
    pub fn add_variant_type(&mut self, name: &str) -> DomainResult<VariantTypeId> {
        self.ensure_editing()?;
        let axis = VariantType::new(name)?;
        if self.axes.iter().any(|a| a.name() == axis.name()) {
            return Err(DomainError::conflict(format!(
                "variant type '{}' already exists",
                axis.name()
            )));
        }
        let id = axis.id_typed();
        self.axes.push(axis);
        Ok(id)
    }

    /// Append an allowed value to an axis.
    pub fn add_value(&mut self, axis: VariantTypeId, value: &str) -> DomainResult<()> {
        self.ensure_editing()?;
        self.axis_mut(axis)?.push_value(value)
    }

    /// Remove one allowed value from an axis, cascading into the ledger:
    /// every stock entry whose combination picked that value is dropped.
    pub fn remove_value(&mut self, axis: VariantTypeId, value: &str) -> DomainResult<()> {
        self.ensure_editing()?;
        self.axis_mut(axis)?.remove_value(value)?;
        self.ledger.remove_axis_value(axis, value);
        Ok(())
    }

    /// Remove an axis, cascading into the ledger: every stock entry whose
    /// combination references the axis is dropped.
    pub fn remove_variant_type(&mut self, axis: VariantTypeId) -> DomainResult<()> {
        self.ensure_editing()?;
        let before = self.axes.len();
        self.axes.retain(|a| a.id_typed() != axis);
        if self.axes.len() == before {
            return Err(DomainError::not_found());
        }
        self.ledger.remove_axis(axis);
        Ok(())
    }

    /// Rename an axis. Stock entries are keyed by the axis id, so the ledger
    /// is untouched.
    pub fn rename_variant_type(&mut self, axis: VariantTypeId, name: &str) -> DomainResult<()> {
        self.ensure_editing()?;
        let trimmed = name.trim();
        if self
            .axes
            .iter()
            .any(|a| a.id_typed() != axis && a.name() == trimmed)
        {
            return Err(DomainError::conflict(format!(
                "variant type '{trimmed}' already exists"
            )));
        }
        self.axis_mut(axis)?.rename(name)
    }

    fn axis_mut(&mut self, axis: VariantTypeId) -> DomainResult<&mut VariantType> {
        self.axes
            .iter_mut()
            .find(|a| a.id_typed() == axis)
            .ok_or(DomainError::NotFound)
    }

    // ---- stock grid --------------------------------------------------------

    /// Every combination currently offered by the axes, in grid order.
    pub fn combinations(&self) -> Vec<Combination> {
        generate_combinations(&self.axes)
    }

    /// Whether the UI should render the per-combination grid (more than one
    /// combination) or the single flat stock input.
    pub fn has_variant_grid(&self) -> bool {
        self.combinations().len() > 1
    }

    /// Display label for one grid row, e.g. `"Talla: S | Color: Rojo"`.
    pub fn describe(&self, combo: &Combination) -> String {
        format_combination(combo, &self.axes)
    }

    pub fn stock_for(&self, combo: &Combination) -> i64 {
        self.ledger.stock_for(combo)
    }

    /// Set the stock for one combination of the current axes.
    pub fn set_stock(&mut self, combo: &Combination, stock: i64) -> DomainResult<()> {
        self.ensure_editing()?;
        self.validate_combination(combo)?;
        self.ledger.set_stock(combo, stock)
    }

    /// Flat path, shown whenever the grid is not: routes the single value
    /// onto the sole combination (the empty one for a product without
    /// variants, the one full pick when every axis has exactly one value).
    pub fn set_flat_stock(&mut self, stock: i64) -> DomainResult<()> {
        self.ensure_editing()?;
        let mut combos = self.combinations();
        match combos.len() {
            1 => self.ledger.set_stock(&combos.remove(0), stock),
            0 => Err(DomainError::validation(
                "cannot set stock while an axis has no values",
            )),
            _ => Err(DomainError::invariant(
                "per-combination grid is active; set stock per combination",
            )),
        }
    }

    pub fn total_stock(&self) -> i64 {
        self.ledger.total_stock()
    }

    /// A combination must pick exactly one currently-allowed value for every
    /// currently-defined axis.
    fn validate_combination(&self, combo: &Combination) -> DomainResult<()> {
        if combo.len() != self.axes.len() {
            return Err(DomainError::validation(format!(
                "combination has {} entries, expected one per axis ({})",
                combo.len(),
                self.axes.len()
            )));
        }
        for axis in &self.axes {
            let Some(picked) = combo.get(axis.id_typed()) else {
                return Err(DomainError::validation(format!(
                    "combination is missing axis '{}'",
                    axis.name()
                )));
            };
            if !axis.values().iter().any(|v| v == picked) {
                return Err(DomainError::validation(format!(
                    "'{picked}' is not an allowed value of axis '{}'",
                    axis.name()
                )));
            }
        }
        Ok(())
    }

    // ---- commit ------------------------------------------------------------

    /// Commit the session: project the axes onto the legacy flat fields,
    /// recompute the aggregate total, and hand the pair to the store.
    ///
    /// Two sequential writes with no cross-write transaction. A failed
    /// product write persists nothing; a failed inventory write leaves the
    /// product half-applied, so the compensating needs-inventory-sync marker
    /// is placed before reporting failure. Working state survives any
    /// failure so the operator can resubmit.
    pub async fn commit(
        &mut self,
        store: &dyn ProductStore,
        now: DateTime<Utc>,
    ) -> Result<CommitReceipt, CommitError> {
        match self.state {
            EditorState::EditingBasics | EditorState::EditingVariants | EditorState::SaveFailed => {}
            EditorState::Saving => {
                return Err(CommitError::Session(
                    DomainError::invariant("a save is already in flight"),
                ));
            }
            _ => return Err(CommitError::Session(self.illegal("commit"))),
        }
        self.state = EditorState::Saving;

        let mut product = self.product.clone();
        product.apply_axis_projections(&self.axes);

        let item = InventoryItem::from_session(
            product.id_typed(),
            &self.ledger,
            self.prior_inventory.as_ref(),
            now,
        );
        let total = item.stock();

        let product_id = product.id_typed();
        info!(%product_id, total, "committing variant editing session");

        let stored_product = match store.save_product(product).await {
            Ok(p) => p,
            Err(source) => {
                warn!(%product_id, error = %source, "product write failed");
                self.state = EditorState::SaveFailed;
                return Err(CommitError::ProductWrite { source });
            }
        };

        let stored_item = match store.save_inventory_total(product_id, total).await {
            Ok(item) => item,
            Err(source) => {
                let compensated = match store.mark_needs_inventory_sync(product_id).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(%product_id, error = %e, "needs-inventory-sync marker failed");
                        false
                    }
                };
                warn!(%product_id, compensated, error = %source, "inventory write failed");
                self.state = EditorState::SaveFailed;
                return Err(CommitError::InventoryWrite { source, compensated });
            }
        };

        self.product = stored_product.clone();
        self.state = EditorState::Saved;
        info!(%product_id, total, "variant editing session saved");

        Ok(CommitReceipt {
            product: stored_product,
            inventory: stored_item,
        })
    }
}
