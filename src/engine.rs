// Operation-driven session engine. The interactive surface (CLI today) feeds
// validated operations in; the engine owns the in-memory session state,
// applies domain rules, and persists the affected document on success.

use crate::{
    blend::{self, BlendDefinition, BlendPricing},
    catalog::{normalize_key, CustomScent, ScentCatalog, ScentKey},
    container::{Container, ContainerId},
    inventory::{self, InventoryItem, InventorySummary, ItemId, Ledger},
    recipe::{self, RecipeResult, Settings},
    storage::DocumentStore,
    BASE_SCENTS, BASE_WICKS,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, error::Error, fmt};

// UI-level bound on wicks of one type in a single candle
pub const MAX_WICKS_PER_TYPE: u32 = 10;

pub const UNKNOWN_CONTAINER: &str = "Unknown";
pub const CUSTOM_BLEND_NAME: &str = "Custom Blend";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ErrorCode {
    Validation,
    NotFound,
    Io,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineError {
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for EngineError {}

/// Everything one session holds in memory. Each collection maps onto its own
/// persisted document; settings are per-session and never written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioState {
    pub settings: Settings,
    pub custom_scents: HashMap<ScentKey, f64>,
    pub blends: HashMap<String, BlendDefinition>,
    pub containers: HashMap<ContainerId, Container>,
    pub inventory: Ledger,
}

impl StudioState {
    /// Built-in scents overlaid with the session's customs.
    pub fn scent_catalog(&self) -> ScentCatalog {
        BASE_SCENTS.merged(&self.custom_scents)
    }

    /// Display name for a container reference; dangling references resolve to
    /// a placeholder instead of an error.
    pub fn container_name(&self, container_id: &str) -> String {
        self.containers
            .get(container_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_CONTAINER.to_string())
    }
}

/// One row of a blend being built; duplicate scents across rows are legal
/// and their percentages add up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendRow {
    pub scent: ScentKey,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    AddScent {
        name: String,
        bottle_oz: f64,
        total_cost: f64,
    },
    AddContainer {
        name: String,
        capacity_water_oz: f64,
        #[serde(default)]
        shape: String,
        #[serde(default)]
        supplier: String,
        #[serde(default)]
        cost_per_unit: f64,
        #[serde(default)]
        notes: String,
    },
    DeleteContainer {
        container_id: ContainerId,
    },
    SaveBlend {
        name: String,
        rows: Vec<BlendRow>,
    },
    AddInventoryItem {
        sku: String,
        product_name: String,
        container_id: ContainerId,
        /// Saved blend to price the candle with; omit to price an ad-hoc
        /// blend via `fo_cost_per_oz`.
        #[serde(default)]
        blend_name: Option<String>,
        #[serde(default)]
        fo_cost_per_oz: Option<f64>,
        #[serde(default)]
        production_date: Option<NaiveDate>,
        #[serde(default)]
        batch_number: String,
        #[serde(default)]
        quantity: u32,
        #[serde(default)]
        target_price: f64,
        #[serde(default)]
        wick_counts: HashMap<String, u32>,
        water_oz: f64,
        #[serde(default)]
        notes: String,
    },
    UpdateQuantity {
        item_id: ItemId,
        quantity: u32,
    },
    DeleteInventoryItem {
        item_id: ItemId,
    },
    SetSetting {
        name: String,
        value: f64,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpResult {
    pub created_ids: Vec<String>,
    pub changed_ids: Vec<String>,
    pub warnings: Vec<String>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub protocol_version: String,
    pub supported_operations: Vec<String>,
    pub data_files: Vec<String>,
}

pub trait Engine {
    fn apply(&mut self, op: Operation) -> Result<OpResult, EngineError>;
    fn snapshot(&self) -> &StudioState;
}

#[derive(Debug, Clone)]
pub struct CandleEngine {
    state: StudioState,
    store: DocumentStore,
}

impl CandleEngine {
    /// Opens a session against a data directory, loading whatever documents
    /// exist there. Missing or damaged documents become empty collections.
    pub fn open(store: DocumentStore) -> Self {
        let state = StudioState {
            settings: Settings::default(),
            custom_scents: store.load_scents(),
            blends: store.load_blends(),
            containers: store.load_containers(),
            inventory: store.load_inventory(),
        };
        Self { state, store }
    }

    pub fn state(&self) -> &StudioState {
        &self.state
    }

    pub fn capabilities() -> Capabilities {
        Capabilities {
            protocol_version: "v1".to_string(),
            supported_operations: vec![
                "AddScent".to_string(),
                "AddContainer".to_string(),
                "DeleteContainer".to_string(),
                "SaveBlend".to_string(),
                "AddInventoryItem".to_string(),
                "UpdateQuantity".to_string(),
                "DeleteInventoryItem".to_string(),
                "SetSetting".to_string(),
            ],
            data_files: vec![
                crate::storage::SCENTS_FILE.to_string(),
                crate::storage::BLENDS_FILE.to_string(),
                crate::storage::CONTAINERS_FILE.to_string(),
                crate::storage::INVENTORY_FILE.to_string(),
            ],
        }
    }

    /// Prices an ad-hoc blend definition against the session catalog.
    pub fn price_blend(&self, blend: &BlendDefinition) -> BlendPricing {
        blend::price_blend(&self.state.scent_catalog(), blend)
    }

    /// Prices a saved blend by name.
    pub fn price_saved_blend(&self, name: &str) -> Result<BlendPricing, EngineError> {
        let blend = self.state.blends.get(name).ok_or_else(|| EngineError {
            code: ErrorCode::NotFound,
            message: format!("Blend '{name}' not found"),
        })?;
        Ok(self.price_blend(blend))
    }

    /// Full recipe computation with the session settings. Counts are clamped
    /// to the per-type bound before summing wick cost.
    pub fn compute_recipe(
        &self,
        water_oz: f64,
        fo_cost_per_oz: f64,
        wick_counts: &HashMap<String, u32>,
    ) -> RecipeResult {
        let counts = clamp_wick_counts(wick_counts);
        let wick_cost = recipe::sum_wick_cost(&BASE_WICKS, &counts);
        let s = &self.state.settings;
        recipe::compute_materials(
            water_oz,
            s.wax_cost_per_oz,
            s.water_to_wax_ratio,
            s.fragrance_load,
            fo_cost_per_oz,
            wick_cost,
        )
    }

    pub fn summary(&self) -> InventorySummary {
        inventory::summarize(&self.state.inventory)
    }

    pub fn search(&self, query: &str) -> Vec<(&ItemId, &InventoryItem)> {
        inventory::search(&self.state.inventory, query)
    }

    fn apply_add_scent(
        &mut self,
        name: &str,
        bottle_oz: f64,
        total_cost: f64,
    ) -> Result<OpResult, EngineError> {
        let scent = CustomScent::new(name, bottle_oz, total_cost)?;
        let mut customs = self.state.custom_scents.clone();
        customs.insert(scent.key.clone(), scent.cost_per_oz);
        self.store.save_scents(&customs)?;
        self.state.custom_scents = customs;
        Ok(OpResult {
            created_ids: vec![scent.key.clone()],
            messages: vec![format!(
                "Added scent '{}' at ${:.2}/oz",
                scent.key, scent.cost_per_oz
            )],
            ..OpResult::default()
        })
    }

    fn apply_add_container(
        &mut self,
        name: &str,
        capacity_water_oz: f64,
        shape: &str,
        supplier: &str,
        cost_per_unit: f64,
        notes: &str,
    ) -> Result<OpResult, EngineError> {
        let (id, container) =
            Container::new(name, capacity_water_oz, shape, supplier, cost_per_unit, notes)?;
        let mut containers = self.state.containers.clone();
        containers.insert(id.clone(), container);
        self.store.save_containers(&containers)?;
        self.state.containers = containers;
        Ok(OpResult {
            created_ids: vec![id],
            messages: vec![format!("Added container '{}'", name.trim())],
            ..OpResult::default()
        })
    }

    fn apply_delete_container(&mut self, container_id: &str) -> Result<OpResult, EngineError> {
        if !self.state.containers.contains_key(container_id) {
            return Err(EngineError {
                code: ErrorCode::NotFound,
                message: format!("Container '{container_id}' not found"),
            });
        }
        let mut containers = self.state.containers.clone();
        let removed = containers.remove(container_id);
        self.store.save_containers(&containers)?;
        self.state.containers = containers;
        // Inventory items referencing this container keep their dangling
        // reference; lookups resolve it to a placeholder.
        Ok(OpResult {
            changed_ids: vec![container_id.to_string()],
            messages: vec![format!(
                "Deleted container '{}'",
                removed.map(|c| c.name).unwrap_or_default()
            )],
            ..OpResult::default()
        })
    }

    fn apply_save_blend(&mut self, name: &str, rows: &[BlendRow]) -> Result<OpResult, EngineError> {
        let rows: Vec<(ScentKey, f64)> = rows
            .iter()
            .map(|row| (normalize_key(&row.scent), row.percent))
            .collect();
        let blend = BlendDefinition::from_rows(&rows);
        blend::validate_for_save(name, &blend)?;

        // Unknown scents warn but do not block the save; the blend simply is
        // not usable for pricing until those scents exist.
        let pricing = self.price_blend(&blend);

        let name = name.trim().to_string();
        let mut blends = self.state.blends.clone();
        let replaced = blends.insert(name.clone(), blend.clone()).is_some();
        self.store.save_blends(&blends)?;
        self.state.blends = blends;

        let mut messages = vec![format!(
            "Saved blend '{name}' ({})",
            blend.describe()
        )];
        if replaced {
            messages.push(format!("Replaced earlier blend '{name}'"));
        }
        if pricing.valid_for_use() {
            messages.push(format!("Weighted FO cost: ${:.2}/oz", pricing.cost_per_oz));
        }
        Ok(OpResult {
            created_ids: vec![name],
            warnings: pricing.warnings,
            messages,
            ..OpResult::default()
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_add_inventory_item(
        &mut self,
        sku: &str,
        product_name: &str,
        container_id: &str,
        blend_name: Option<String>,
        fo_cost_per_oz: Option<f64>,
        production_date: Option<NaiveDate>,
        batch_number: &str,
        quantity: u32,
        target_price: f64,
        wick_counts: &HashMap<String, u32>,
        water_oz: f64,
        notes: &str,
        now: NaiveDateTime,
    ) -> Result<OpResult, EngineError> {
        if water_oz <= 0.0 {
            return Err(EngineError {
                code: ErrorCode::Validation,
                message: "Enter a jar capacity in oz greater than 0".to_string(),
            });
        }
        let container = self
            .state
            .containers
            .get(container_id)
            .ok_or_else(|| EngineError {
                code: ErrorCode::NotFound,
                message: format!("Container '{container_id}' not found"),
            })?;

        // Either a usable saved blend or an ad-hoc cost must supply the
        // fragrance price.
        let (fo_cost, blend_label) = match (fo_cost_per_oz, &blend_name) {
            (Some(cost), _) => (
                cost,
                blend_name.clone().unwrap_or_else(|| CUSTOM_BLEND_NAME.to_string()),
            ),
            (None, Some(name)) => {
                let pricing = self.price_saved_blend(name)?;
                if !pricing.valid_for_use() {
                    return Err(EngineError {
                        code: ErrorCode::Validation,
                        message: format!(
                            "Blend '{name}' is not usable: {}",
                            pricing.warnings.join("; ")
                        ),
                    });
                }
                (pricing.cost_per_oz, name.clone())
            }
            (None, None) => {
                return Err(EngineError {
                    code: ErrorCode::Validation,
                    message: "Provide either a saved blend name or an FO cost per oz".to_string(),
                });
            }
        };

        let counts = clamp_wick_counts(wick_counts);
        let result = self.compute_recipe(water_oz, fo_cost, &counts);

        let item = InventoryItem {
            sku: sku.trim().to_string(),
            product_name: product_name.trim().to_string(),
            container_id: container_id.to_string(),
            blend_name: blend_label,
            production_date: production_date.unwrap_or_else(|| now.date()),
            batch_number: batch_number.trim().to_string(),
            quantity,
            material_cost: result.total_material_cost,
            container_cost: container.cost_per_unit,
            target_price,
            wick_config: counts,
            wax_oz: result.wax_oz,
            fragrance_oz: result.fragrance_oz,
            water_oz,
            notes: notes.trim().to_string(),
        };

        let mut ledger = self.state.inventory.clone();
        let item_id = inventory::create_item(&mut ledger, item, now)?;
        self.store.save_inventory(&ledger)?;
        self.state.inventory = ledger;

        let saved = &self.state.inventory[&item_id];
        let mut messages = vec![format!(
            "Added '{}' to inventory (material ${:.2}, container ${:.2})",
            saved.product_name, saved.material_cost, saved.container_cost
        )];
        if saved.target_price > 0.0 {
            messages.push(format!(
                "Profit ${:.2} per unit ({:.1}% margin)",
                saved.profit_per_unit(),
                saved.margin_percent()
            ));
        }
        Ok(OpResult {
            created_ids: vec![item_id],
            messages,
            ..OpResult::default()
        })
    }

    fn apply_update_quantity(
        &mut self,
        item_id: &str,
        quantity: u32,
    ) -> Result<OpResult, EngineError> {
        let mut ledger = self.state.inventory.clone();
        inventory::update_quantity(&mut ledger, item_id, quantity)?;
        self.store.save_inventory(&ledger)?;
        self.state.inventory = ledger;
        Ok(OpResult {
            changed_ids: vec![item_id.to_string()],
            messages: vec![format!("Updated quantity to {quantity}")],
            ..OpResult::default()
        })
    }

    fn apply_delete_inventory_item(&mut self, item_id: &str) -> Result<OpResult, EngineError> {
        let mut ledger = self.state.inventory.clone();
        let removed = inventory::delete_item(&mut ledger, item_id)?;
        self.store.save_inventory(&ledger)?;
        self.state.inventory = ledger;
        Ok(OpResult {
            changed_ids: vec![item_id.to_string()],
            messages: vec![format!("Deleted '{}' from inventory", removed.product_name)],
            ..OpResult::default()
        })
    }

    fn apply_set_setting(&mut self, name: &str, value: f64) -> Result<OpResult, EngineError> {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError {
                code: ErrorCode::Validation,
                message: format!("Setting '{name}' must be a non-negative number"),
            });
        }
        match name {
            "wax_cost_per_oz" => self.state.settings.wax_cost_per_oz = value,
            "water_to_wax_ratio" => self.state.settings.water_to_wax_ratio = value,
            "fragrance_load" => self.state.settings.fragrance_load = value,
            other => {
                return Err(EngineError {
                    code: ErrorCode::Validation,
                    message: format!("Unknown setting '{other}'"),
                });
            }
        }
        Ok(OpResult {
            changed_ids: vec![name.to_string()],
            messages: vec![format!("Set {name} to {value}")],
            ..OpResult::default()
        })
    }
}

impl Engine for CandleEngine {
    fn apply(&mut self, op: Operation) -> Result<OpResult, EngineError> {
        match op {
            Operation::AddScent {
                name,
                bottle_oz,
                total_cost,
            } => self.apply_add_scent(&name, bottle_oz, total_cost),
            Operation::AddContainer {
                name,
                capacity_water_oz,
                shape,
                supplier,
                cost_per_unit,
                notes,
            } => self.apply_add_container(
                &name,
                capacity_water_oz,
                &shape,
                &supplier,
                cost_per_unit,
                &notes,
            ),
            Operation::DeleteContainer { container_id } => {
                self.apply_delete_container(&container_id)
            }
            Operation::SaveBlend { name, rows } => self.apply_save_blend(&name, &rows),
            Operation::AddInventoryItem {
                sku,
                product_name,
                container_id,
                blend_name,
                fo_cost_per_oz,
                production_date,
                batch_number,
                quantity,
                target_price,
                wick_counts,
                water_oz,
                notes,
            } => self.apply_add_inventory_item(
                &sku,
                &product_name,
                &container_id,
                blend_name,
                fo_cost_per_oz,
                production_date,
                &batch_number,
                quantity,
                target_price,
                &wick_counts,
                water_oz,
                &notes,
                Local::now().naive_local(),
            ),
            Operation::UpdateQuantity { item_id, quantity } => {
                self.apply_update_quantity(&item_id, quantity)
            }
            Operation::DeleteInventoryItem { item_id } => {
                self.apply_delete_inventory_item(&item_id)
            }
            Operation::SetSetting { name, value } => self.apply_set_setting(&name, value),
        }
    }

    fn snapshot(&self) -> &StudioState {
        &self.state
    }
}

fn clamp_wick_counts(counts: &HashMap<String, u32>) -> HashMap<String, u32> {
    counts
        .iter()
        .map(|(key, count)| (key.clone(), (*count).min(MAX_WICKS_PER_TYPE)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn engine() -> (TempDir, CandleEngine) {
        let dir = tempdir().unwrap();
        let engine = CandleEngine::open(DocumentStore::new(dir.path()));
        (dir, engine)
    }

    fn leather_blend(engine: &mut CandleEngine) {
        engine
            .apply(Operation::SaveBlend {
                name: "Boot Leather".to_string(),
                rows: vec![
                    BlendRow {
                        scent: "leather".to_string(),
                        percent: 60.0,
                    },
                    BlendRow {
                        scent: "sandalwood".to_string(),
                        percent: 40.0,
                    },
                ],
            })
            .unwrap();
    }

    fn amber_jar(engine: &mut CandleEngine) {
        engine
            .apply(Operation::AddContainer {
                name: "8oz Amber Jar".to_string(),
                capacity_water_oz: 7.5,
                shape: "Round".to_string(),
                supplier: String::new(),
                cost_per_unit: 2.50,
                notes: String::new(),
            })
            .unwrap();
    }

    fn add_candle(engine: &mut CandleEngine) -> String {
        let res = engine
            .apply(Operation::AddInventoryItem {
                sku: "DCW-001".to_string(),
                product_name: "Boot Leather - 8oz".to_string(),
                container_id: "8oz_amber_jar".to_string(),
                blend_name: Some("Boot Leather".to_string()),
                fo_cost_per_oz: None,
                production_date: None,
                batch_number: "B001".to_string(),
                quantity: 12,
                target_price: 25.0,
                wick_counts: HashMap::from([("wood_30mm".to_string(), 1)]),
                water_oz: 7.5,
                notes: String::new(),
            })
            .unwrap();
        res.created_ids[0].clone()
    }

    #[test]
    fn test_add_scent_persists_and_overrides_base() {
        let (dir, mut engine) = engine();
        let res = engine
            .apply(Operation::AddScent {
                name: "Lavender".to_string(),
                bottle_oz: 10.0,
                total_cost: 20.0,
            })
            .unwrap();
        assert_eq!(res.created_ids, vec!["lavender".to_string()]);
        assert_eq!(engine.state().scent_catalog().cost_per_oz("lavender"), Some(2.0));

        // A fresh session sees the same customs
        let reopened = CandleEngine::open(DocumentStore::new(dir.path()));
        assert_eq!(reopened.state().custom_scents["lavender"], 2.0);
    }

    #[test]
    fn test_add_scent_rejects_without_mutation() {
        let (_dir, mut engine) = engine();
        let err = engine
            .apply(Operation::AddScent {
                name: "Pine".to_string(),
                bottle_oz: 0.0,
                total_cost: 20.0,
            })
            .unwrap_err();
        assert!(matches!(err.code, ErrorCode::Validation));
        assert!(engine.state().custom_scents.is_empty());
    }

    #[test]
    fn test_save_blend_and_price() {
        let (_dir, mut engine) = engine();
        leather_blend(&mut engine);
        let pricing = engine.price_saved_blend("Boot Leather").unwrap();
        assert!(pricing.valid_for_use());
        let expected = 0.6 * (27.63 / 16.0) + 0.4 * (25.91 / 15.0);
        assert!((pricing.cost_per_oz - expected).abs() < 1e-9);
    }

    #[test]
    fn test_save_blend_rejects_short_total() {
        let (_dir, mut engine) = engine();
        let err = engine
            .apply(Operation::SaveBlend {
                name: "Short".to_string(),
                rows: vec![
                    BlendRow {
                        scent: "leather".to_string(),
                        percent: 60.0,
                    },
                    BlendRow {
                        scent: "sandalwood".to_string(),
                        percent: 30.0,
                    },
                ],
            })
            .unwrap_err();
        assert!(matches!(err.code, ErrorCode::Validation));
        assert!(engine.state().blends.is_empty());
    }

    #[test]
    fn test_save_blend_with_unknown_scent_warns_but_saves() {
        let (_dir, mut engine) = engine();
        let res = engine
            .apply(Operation::SaveBlend {
                name: "Mystery".to_string(),
                rows: vec![BlendRow {
                    scent: "vanilla".to_string(),
                    percent: 100.0,
                }],
            })
            .unwrap();
        assert!(!res.warnings.is_empty());
        assert!(engine.state().blends.contains_key("Mystery"));
        assert!(!engine.price_saved_blend("Mystery").unwrap().valid_for_use());
    }

    #[test]
    fn test_add_inventory_item_snapshots_costs() {
        let (_dir, mut engine) = engine();
        leather_blend(&mut engine);
        amber_jar(&mut engine);
        let item_id = add_candle(&mut engine);

        let item = &engine.state().inventory[&item_id];
        assert_eq!(item.container_cost, 2.50);
        assert!((item.wax_oz - 7.5 * 0.90).abs() < 1e-12);
        assert!(item.material_cost > 0.0);
        assert_eq!(item.blend_name, "Boot Leather");

        let summary = engine.summary();
        assert_eq!(summary.total_products, 1);
        assert_eq!(summary.total_units, 12);
    }

    #[test]
    fn test_add_inventory_item_requires_container_and_blend() {
        let (_dir, mut engine) = engine();
        leather_blend(&mut engine);
        let err = engine
            .apply(Operation::AddInventoryItem {
                sku: "DCW-001".to_string(),
                product_name: "Candle".to_string(),
                container_id: "missing_jar".to_string(),
                blend_name: Some("Boot Leather".to_string()),
                fo_cost_per_oz: None,
                production_date: None,
                batch_number: String::new(),
                quantity: 1,
                target_price: 0.0,
                wick_counts: HashMap::new(),
                water_oz: 7.5,
                notes: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err.code, ErrorCode::NotFound));
        assert!(engine.state().inventory.is_empty());
    }

    #[test]
    fn test_delete_container_leaves_dangling_reference() {
        let (_dir, mut engine) = engine();
        leather_blend(&mut engine);
        amber_jar(&mut engine);
        let item_id = add_candle(&mut engine);

        engine
            .apply(Operation::DeleteContainer {
                container_id: "8oz_amber_jar".to_string(),
            })
            .unwrap();

        // The item survives with its snapshot; the reference renders as Unknown
        let item = &engine.state().inventory[&item_id];
        assert_eq!(item.container_cost, 2.50);
        assert_eq!(engine.state().container_name(&item.container_id), UNKNOWN_CONTAINER);
    }

    #[test]
    fn test_update_and_delete_item() {
        let (_dir, mut engine) = engine();
        leather_blend(&mut engine);
        amber_jar(&mut engine);
        let item_id = add_candle(&mut engine);

        engine
            .apply(Operation::UpdateQuantity {
                item_id: item_id.clone(),
                quantity: 3,
            })
            .unwrap();
        assert_eq!(engine.state().inventory[&item_id].quantity, 3);

        engine
            .apply(Operation::DeleteInventoryItem {
                item_id: item_id.clone(),
            })
            .unwrap();
        let err = engine
            .apply(Operation::DeleteInventoryItem { item_id })
            .unwrap_err();
        assert!(matches!(err.code, ErrorCode::NotFound));
    }

    #[test]
    fn test_set_setting() {
        let (_dir, mut engine) = engine();
        engine
            .apply(Operation::SetSetting {
                name: "fragrance_load".to_string(),
                value: 0.10,
            })
            .unwrap();
        assert_eq!(engine.state().settings.fragrance_load, 0.10);

        assert!(engine
            .apply(Operation::SetSetting {
                name: "nope".to_string(),
                value: 1.0,
            })
            .is_err());
        assert!(engine
            .apply(Operation::SetSetting {
                name: "fragrance_load".to_string(),
                value: -1.0,
            })
            .is_err());
    }

    #[test]
    fn test_compute_recipe_clamps_wick_counts() {
        let (_dir, engine) = engine();
        let counts = HashMap::from([("wood_30mm".to_string(), 99)]);
        let result = engine.compute_recipe(8.0, 2.50, &counts);
        let max_cost =
            f64::from(MAX_WICKS_PER_TYPE) * BASE_WICKS.cost_per_wick("wood_30mm").unwrap();
        assert!((result.wick_cost - max_cost).abs() < 1e-9);
    }
}
