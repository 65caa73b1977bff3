// Fragrance blends: weighted scent mixtures priced against the scent catalog.

use crate::catalog::{pretty_name, ScentCatalog, ScentKey};
use crate::engine::{EngineError, ErrorCode};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tolerance when checking that blend percentages total 100.
pub const PERCENT_TOLERANCE: f64 = 0.01;

/// A named blend is a mapping of scent key to percentage (0-100).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlendDefinition {
    pub scents: HashMap<ScentKey, f64>,
}

impl BlendDefinition {
    /// Builds a definition from user-entered rows. Rows with a percentage of
    /// zero or less are dropped; duplicate scent keys are summed, not rejected.
    pub fn from_rows(rows: &[(ScentKey, f64)]) -> Self {
        let mut scents: HashMap<ScentKey, f64> = HashMap::new();
        for (key, pct) in rows {
            if *pct > 0.0 {
                *scents.entry(key.clone()).or_insert(0.0) += pct;
            }
        }
        Self { scents }
    }

    /// Raw sum of declared percentages, independent of catalog membership.
    pub fn total_percent(&self) -> f64 {
        self.scents.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scents.is_empty()
    }

    /// Human-readable parts list, e.g. "60% Leather, 40% Sandalwood".
    pub fn describe(&self) -> String {
        self.scents
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(key, pct)| format!("{pct:.0}% {}", pretty_name(key)))
            .join(", ")
    }
}

/// Result of pricing a blend against a scent catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlendPricing {
    pub cost_per_oz: f64,
    pub total_percent: f64,
    pub warnings: Vec<String>,
}

impl BlendPricing {
    /// A blend is usable only when it totals 100% (within tolerance) and
    /// every referenced scent exists in the catalog. A blend can total 100%
    /// and still carry unknown-scent warnings; such a blend is not usable.
    pub fn valid_for_use(&self) -> bool {
        (self.total_percent - 100.0).abs() <= PERCENT_TOLERANCE && self.warnings.is_empty()
    }
}

/// Prices a blend as the percentage-weighted sum of catalog costs. Scents
/// missing from the catalog are skipped from the sum and recorded as warnings,
/// so the returned cost understates the real cost rather than erroring out.
pub fn price_blend(catalog: &ScentCatalog, blend: &BlendDefinition) -> BlendPricing {
    let total_percent = blend.total_percent();
    let mut warnings = Vec::new();

    if (total_percent - 100.0).abs() > PERCENT_TOLERANCE {
        warnings.push(format!(
            "Blend percents total {total_percent:.1}%, not 100%"
        ));
    }

    let mut cost_per_oz = 0.0;
    for (key, pct) in blend.scents.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        match catalog.cost_per_oz(key) {
            Some(cost) => cost_per_oz += pct / 100.0 * cost,
            None => warnings.push(format!("Scent '{key}' is not in the current scent list")),
        }
    }

    BlendPricing {
        cost_per_oz,
        total_percent,
        warnings,
    }
}

/// Checks a blend before it is stored under a name. Blank names, empty
/// definitions, and totals away from 100% are rejected; an existing blend
/// with the same name is overwritten by the caller.
pub fn validate_for_save(name: &str, blend: &BlendDefinition) -> Result<(), EngineError> {
    if name.trim().is_empty() {
        return Err(EngineError {
            code: ErrorCode::Validation,
            message: "Please enter a blend name".to_string(),
        });
    }
    if blend.is_empty() {
        return Err(EngineError {
            code: ErrorCode::Validation,
            message: "Define a blend with at least one scent above 0% before saving".to_string(),
        });
    }
    let total = blend.total_percent();
    if (total - 100.0).abs() > PERCENT_TOLERANCE {
        return Err(EngineError {
            code: ErrorCode::Validation,
            message: format!("Blend must total 100% before saving (currently {total:.1}%)"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScentCatalog;

    fn catalog() -> ScentCatalog {
        ScentCatalog::from_costs(HashMap::from([
            ("leather".to_string(), 2.0),
            ("sandalwood".to_string(), 1.0),
        ]))
    }

    #[test]
    fn test_price_blend_weighted_sum() {
        let blend = BlendDefinition {
            scents: HashMap::from([("leather".to_string(), 60.0), ("sandalwood".to_string(), 40.0)]),
        };
        let pricing = price_blend(&catalog(), &blend);
        assert!(pricing.warnings.is_empty());
        assert!((pricing.cost_per_oz - (0.6 * 2.0 + 0.4 * 1.0)).abs() < 1e-12);
        assert!((pricing.total_percent - 100.0).abs() < 1e-12);
        assert!(pricing.valid_for_use());
    }

    #[test]
    fn test_price_blend_unknown_scent_skipped_and_warned() {
        let blend = BlendDefinition {
            scents: HashMap::from([("leather".to_string(), 50.0), ("vanilla".to_string(), 50.0)]),
        };
        let pricing = price_blend(&catalog(), &blend);
        assert_eq!(pricing.warnings.len(), 1);
        assert!(pricing.warnings[0].contains("vanilla"));
        // Only the known half contributes
        assert!((pricing.cost_per_oz - 1.0).abs() < 1e-12);
        // Total still reads 100%, but the blend is not usable
        assert!((pricing.total_percent - 100.0).abs() < 1e-12);
        assert!(!pricing.valid_for_use());
    }

    #[test]
    fn test_price_blend_off_total_warns() {
        let blend = BlendDefinition {
            scents: HashMap::from([("leather".to_string(), 60.0), ("sandalwood".to_string(), 30.0)]),
        };
        let pricing = price_blend(&catalog(), &blend);
        assert!(pricing.warnings.iter().any(|w| w.contains("not 100%")));
        assert!(!pricing.valid_for_use());
    }

    #[test]
    fn test_from_rows_drops_and_sums() {
        let rows = vec![
            ("leather".to_string(), 30.0),
            ("leather".to_string(), 30.0),
            ("sandalwood".to_string(), 0.0),
            ("vanilla".to_string(), -5.0),
        ];
        let blend = BlendDefinition::from_rows(&rows);
        assert_eq!(blend.scents.len(), 1);
        assert!((blend.scents["leather"] - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_for_save() {
        let good = BlendDefinition {
            scents: HashMap::from([("leather".to_string(), 100.0)]),
        };
        assert!(validate_for_save("Boot Leather", &good).is_ok());
        assert!(validate_for_save("  ", &good).is_err());
        assert!(validate_for_save("Empty", &BlendDefinition::default()).is_err());

        let short = BlendDefinition {
            scents: HashMap::from([("leather".to_string(), 60.0), ("sandalwood".to_string(), 30.0)]),
        };
        let err = validate_for_save("Short", &short).unwrap_err();
        assert!(matches!(err.code, crate::engine::ErrorCode::Validation));
    }
}
