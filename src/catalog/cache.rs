//! Food detail cache
//!
//! Catalog detail lookups are slow and rate-limited; a food's composition
//! does not change within a session, so details are kept after first fetch.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{CatalogFood, CatalogResult, CatalogSearchHit, FoodCatalog};

/// Caches [`FoodCatalog::get_details`] results by catalog id
pub struct CachedCatalog<C> {
    inner: C,
    details: RwLock<HashMap<i64, CatalogFood>>,
}

impl<C: FoodCatalog> CachedCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            details: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached foods
    pub fn cached_len(&self) -> usize {
        self.details.read().map(|d| d.len()).unwrap_or(0)
    }
}

impl<C: FoodCatalog> FoodCatalog for CachedCatalog<C> {
    fn search(&self, query: &str) -> CatalogResult<Vec<CatalogSearchHit>> {
        self.inner.search(query)
    }

    fn get_details(&self, catalog_id: i64) -> CatalogResult<CatalogFood> {
        if let Ok(details) = self.details.read() {
            if let Some(food) = details.get(&catalog_id) {
                tracing::debug!("Catalog cache hit for food {}", catalog_id);
                return Ok(food.clone());
            }
        }

        let food = self.inner.get_details(catalog_id)?;
        if let Ok(mut details) = self.details.write() {
            details.insert(catalog_id, food.clone());
        }
        Ok(food)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingCatalog {
        calls: AtomicUsize,
    }

    impl FoodCatalog for CountingCatalog {
        fn search(&self, _query: &str) -> CatalogResult<Vec<CatalogSearchHit>> {
            Ok(Vec::new())
        }

        fn get_details(&self, catalog_id: i64) -> CatalogResult<CatalogFood> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if catalog_id < 0 {
                return Err(CatalogError::NotFound(catalog_id));
            }
            Ok(CatalogFood {
                catalog_id,
                description: format!("Food {}", catalog_id),
                serving_size: None,
                serving_unit: None,
                nutrients: BTreeMap::new(),
            })
        }
    }

    #[test]
    fn test_details_fetched_once() {
        let cached = CachedCatalog::new(CountingCatalog::default());
        let first = cached.get_details(42).unwrap();
        let second = cached.get_details(42).unwrap();
        assert_eq!(first, second);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.cached_len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cached = CachedCatalog::new(CountingCatalog::default());
        assert!(cached.get_details(-1).is_err());
        assert!(cached.get_details(-1).is_err());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cached_len(), 0);
    }
}
