//! Food catalog
//!
//! Search and detail lookups against an external food composition catalog.
//! The production implementation talks to USDA FoodData Central.

mod cache;
mod usda;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nutrition::{
    normalize_nutrients_strict, reference_portion_grams, CalcResult, CatalogNutrient,
    NutrientVector,
};

pub use cache::CachedCatalog;
pub use usda::{UsdaClient, DEFAULT_FDC_BASE_URL, SEARCH_PAGE_SIZE};

/// Queries shorter than this return no results without a request
pub const MIN_QUERY_LEN: usize = 2;

/// Catalog error types
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Catalog response could not be parsed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Food {0} not found in catalog")]
    NotFound(i64),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSearchHit {
    pub catalog_id: i64,
    pub description: String,
    pub brand: Option<String>,
    pub data_type: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
}

/// Full nutrient listing for one food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFood {
    pub catalog_id: i64,
    pub description: String,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    /// Amounts per reference portion, keyed by catalog nutrient name
    pub nutrients: BTreeMap<String, CatalogNutrient>,
}

impl CatalogFood {
    /// Grams the reported nutrient amounts refer to
    pub fn reference_portion(&self) -> f64 {
        reference_portion_grams(self.serving_size, self.serving_unit.as_deref())
    }

    /// Tracked nutrients per reference portion
    pub fn tracked_nutrients(&self) -> CalcResult<NutrientVector> {
        normalize_nutrients_strict(&self.nutrients)
    }
}

/// Source of food composition data
pub trait FoodCatalog: Send + Sync {
    fn search(&self, query: &str) -> CatalogResult<Vec<CatalogSearchHit>>;

    fn get_details(&self, catalog_id: i64) -> CatalogResult<CatalogFood>;
}

/// True when a query is long enough to send to the catalog
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_LEN
}
