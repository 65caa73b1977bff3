// Finished-goods ledger: stock records with cost snapshots and margin math.

use crate::catalog::normalize_key;
use crate::engine::{EngineError, ErrorCode};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ItemId = String;
pub type Ledger = HashMap<ItemId, InventoryItem>;

/// One finished-goods record. Costs are snapshots taken at creation time and
/// are never recomputed; `container_id` and `blend_name` are loose string
/// references with no integrity enforcement, so they can dangle after a
/// catalog delete and the caller renders them as "Unknown".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItem {
    pub sku: String,
    pub product_name: String,
    pub container_id: String,
    pub blend_name: String,
    pub production_date: NaiveDate,
    pub batch_number: String,
    pub quantity: u32,
    pub material_cost: f64,
    // Records saved before this field existed read back as 0
    pub container_cost: f64,
    pub target_price: f64,
    pub wick_config: HashMap<String, u32>,
    pub wax_oz: f64,
    pub fragrance_oz: f64,
    pub water_oz: f64,
    pub notes: String,
}

impl InventoryItem {
    pub fn unit_cost(&self) -> f64 {
        self.material_cost + self.container_cost
    }

    pub fn profit_per_unit(&self) -> f64 {
        self.target_price - self.unit_cost()
    }

    /// Margin as a percentage of target price; 0 when no target price is set.
    pub fn margin_percent(&self) -> f64 {
        if self.target_price > 0.0 {
            self.profit_per_unit() / self.target_price * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_units: u64,
    pub total_value: f64,
}

/// Item ids are the normalized SKU plus a second-resolution creation
/// timestamp. Two creations with the same SKU inside one second would
/// collide; that likelihood is accepted for a single-operator tool.
pub fn new_item_id(sku: &str, created_at: NaiveDateTime) -> ItemId {
    format!(
        "{}_{}",
        normalize_key(sku),
        created_at.format("%Y%m%d_%H%M%S")
    )
}

/// Inserts a new item, returning its generated id. Blank SKU or product name
/// is rejected before anything is touched.
pub fn create_item(
    ledger: &mut Ledger,
    item: InventoryItem,
    created_at: NaiveDateTime,
) -> Result<ItemId, EngineError> {
    if item.sku.trim().is_empty() {
        return Err(EngineError {
            code: ErrorCode::Validation,
            message: "Please enter a SKU / product code".to_string(),
        });
    }
    if item.product_name.trim().is_empty() {
        return Err(EngineError {
            code: ErrorCode::Validation,
            message: "Please enter a product name".to_string(),
        });
    }
    let id = new_item_id(&item.sku, created_at);
    ledger.insert(id.clone(), item);
    Ok(id)
}

/// Quantity is the only field mutable after creation.
pub fn update_quantity(
    ledger: &mut Ledger,
    item_id: &str,
    new_quantity: u32,
) -> Result<(), EngineError> {
    match ledger.get_mut(item_id) {
        Some(item) => {
            item.quantity = new_quantity;
            Ok(())
        }
        None => Err(EngineError {
            code: ErrorCode::NotFound,
            message: format!("Inventory item '{item_id}' not found"),
        }),
    }
}

/// Removal is permanent; a second delete of the same id fails.
pub fn delete_item(ledger: &mut Ledger, item_id: &str) -> Result<InventoryItem, EngineError> {
    ledger.remove(item_id).ok_or_else(|| EngineError {
        code: ErrorCode::NotFound,
        message: format!("Inventory item '{item_id}' not found"),
    })
}

pub fn summarize(ledger: &Ledger) -> InventorySummary {
    InventorySummary {
        total_products: ledger.len(),
        total_units: ledger.values().map(|item| u64::from(item.quantity)).sum(),
        total_value: ledger
            .values()
            .map(|item| f64::from(item.quantity) * item.unit_cost())
            .sum(),
    }
}

/// Case-insensitive substring search over product name and SKU. An empty
/// query matches everything. Results are sorted by id for stable output.
pub fn search<'a>(ledger: &'a Ledger, query: &str) -> Vec<(&'a ItemId, &'a InventoryItem)> {
    let needle = query.trim().to_lowercase();
    ledger
        .iter()
        .filter(|(_, item)| {
            needle.is_empty()
                || item.product_name.to_lowercase().contains(&needle)
                || item.sku.to_lowercase().contains(&needle)
        })
        .sorted_by(|a, b| a.0.cmp(b.0))
        .collect()
}
