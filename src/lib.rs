use catalog::{ScentCatalog, WickCatalog};
use lazy_static::lazy_static;

pub mod blend;
pub mod catalog;
pub mod container;
pub mod engine;
pub mod inventory;
pub mod recipe;
pub mod storage;

lazy_static! {
    // Built-in fragrance oils, cost per ounce (oil + shipping where known)
    pub static ref BASE_SCENTS: ScentCatalog = ScentCatalog::base();

    // Wick catalog, fixed; not user-editable
    pub static ref BASE_WICKS: WickCatalog = WickCatalog::base();
}
