// Container (jar/bottle) definitions referenced by inventory items.

use crate::catalog::normalize_key;
use crate::engine::{EngineError, ErrorCode};
use serde::{Deserialize, Serialize};

pub type ContainerId = String;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub name: String,
    pub capacity_water_oz: f64,
    pub shape: String,
    pub supplier: String,
    pub cost_per_unit: f64,
    pub notes: String,
}

impl Container {
    /// Validates and builds a container; the id is derived from the name, so
    /// re-adding the same name overwrites the earlier definition.
    pub fn new(
        name: &str,
        capacity_water_oz: f64,
        shape: &str,
        supplier: &str,
        cost_per_unit: f64,
        notes: &str,
    ) -> Result<(ContainerId, Self), EngineError> {
        if name.trim().is_empty() {
            return Err(EngineError {
                code: ErrorCode::Validation,
                message: "Please enter a container name".to_string(),
            });
        }
        if capacity_water_oz <= 0.0 {
            return Err(EngineError {
                code: ErrorCode::Validation,
                message: "Water capacity must be greater than 0".to_string(),
            });
        }
        let id = normalize_key(name);
        let container = Self {
            name: name.trim().to_string(),
            capacity_water_oz,
            shape: shape.trim().to_string(),
            supplier: supplier.trim().to_string(),
            cost_per_unit,
            notes: notes.trim().to_string(),
        };
        Ok((id, container))
    }
}
