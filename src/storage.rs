// Per-collection JSON documents on disk. Reads degrade to defaults so a
// missing or damaged file never takes the session down; writes overwrite the
// whole document and surface failures to the caller.

use crate::blend::BlendDefinition;
use crate::catalog::ScentKey;
use crate::container::{Container, ContainerId};
use crate::engine::{EngineError, ErrorCode};
use crate::inventory::Ledger;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SCENTS_FILE: &str = "scents.json";
pub const BLENDS_FILE: &str = "blends.json";
pub const CONTAINERS_FILE: &str = "containers.json";
pub const INVENTORY_FILE: &str = "inventory.json";

/// Loads and saves the four collection documents inside one data directory.
/// The documents are independent; saving one never touches another.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    data_dir: PathBuf,
}

impl DocumentStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Reads a document as raw JSON. Absent files are a normal first run and
    /// log at info; unreadable or unparsable files log at warn so corruption
    /// is distinguishable from first-run, but both fall back to `None`.
    fn read_document(&self, file: &str) -> Option<Value> {
        let path = self.path(file);
        if !path.exists() {
            log::info!("{file} not present, starting with defaults");
            return None;
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Could not read {}: {e}; falling back to defaults", path.display());
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Could not parse {}: {e}; falling back to defaults", path.display());
                None
            }
        }
    }

    fn write_document<T: Serialize>(&self, file: &str, data: &T) -> Result<(), EngineError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| EngineError {
            code: ErrorCode::Io,
            message: format!("Could not create data directory '{}': {e}", self.data_dir.display()),
        })?;
        let text = serde_json::to_string_pretty(data).map_err(|e| EngineError {
            code: ErrorCode::Internal,
            message: format!("Could not serialize {file}: {e}"),
        })?;
        let path = self.path(file);
        std::fs::write(&path, text).map_err(|e| EngineError {
            code: ErrorCode::Io,
            message: format!("Could not write '{}': {e}", path.display()),
        })
    }

    /// Custom scents: key to cost per ounce. Entries whose value is not a
    /// number (or a numeric string, as older files stored them) are dropped
    /// silently.
    pub fn load_scents(&self) -> HashMap<ScentKey, f64> {
        let Some(Value::Object(map)) = self.read_document(SCENTS_FILE) else {
            return HashMap::new();
        };
        map.into_iter()
            .filter_map(|(key, value)| numeric(&value).map(|cost| (key, cost)))
            .collect()
    }

    pub fn save_scents(&self, customs: &HashMap<ScentKey, f64>) -> Result<(), EngineError> {
        self.write_document(SCENTS_FILE, customs)
    }

    /// Saved blends. Percentages are cleaned entry by entry; a blend with no
    /// valid numeric percentage left after cleaning is dropped entirely.
    pub fn load_blends(&self) -> HashMap<String, BlendDefinition> {
        let Some(Value::Object(map)) = self.read_document(BLENDS_FILE) else {
            return HashMap::new();
        };
        let mut blends = HashMap::new();
        for (name, info) in map {
            let Some(Value::Object(scents)) = info.get("scents").cloned() else {
                continue;
            };
            let cleaned: HashMap<ScentKey, f64> = scents
                .into_iter()
                .filter_map(|(key, pct)| numeric(&pct).map(|pct| (key, pct)))
                .collect();
            if !cleaned.is_empty() {
                blends.insert(name, BlendDefinition { scents: cleaned });
            }
        }
        blends
    }

    pub fn save_blends(&self, blends: &HashMap<String, BlendDefinition>) -> Result<(), EngineError> {
        self.write_document(BLENDS_FILE, blends)
    }

    pub fn load_containers(&self) -> HashMap<ContainerId, Container> {
        match self.read_document(CONTAINERS_FILE) {
            Some(value) => match serde_json::from_value(value) {
                Ok(containers) => containers,
                Err(e) => {
                    log::warn!("Container document did not match schema: {e}; falling back to defaults");
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        }
    }

    pub fn save_containers(
        &self,
        containers: &HashMap<ContainerId, Container>,
    ) -> Result<(), EngineError> {
        self.write_document(CONTAINERS_FILE, containers)
    }

    pub fn load_inventory(&self) -> Ledger {
        match self.read_document(INVENTORY_FILE) {
            Some(value) => match serde_json::from_value(value) {
                Ok(ledger) => ledger,
                Err(e) => {
                    log::warn!("Inventory document did not match schema: {e}; falling back to defaults");
                    Ledger::new()
                }
            },
            None => Ledger::new(),
        }
    }

    pub fn save_inventory(&self, ledger: &Ledger) -> Result<(), EngineError> {
        self.write_document(INVENTORY_FILE, ledger)
    }
}

/// Accepts JSON numbers and numeric strings; older documents written by hand
/// occasionally quote their costs.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
