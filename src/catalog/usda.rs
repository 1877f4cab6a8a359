//! USDA FoodData Central client
//!
//! Blocking HTTP client for the FDC v1 API. Searches are limited to the
//! Foundation and SR Legacy datasets. Nutrient amounts are taken to refer
//! to the food's `servingSize`/`servingSizeUnit` when the response carries
//! one and to 100 g otherwise (see `CatalogFood::reference_portion`).

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{
    is_searchable, CatalogError, CatalogFood, CatalogResult, CatalogSearchHit, FoodCatalog,
};
use crate::nutrition::normalize::catalog_nutrient;
use crate::nutrition::{convert_amount, CatalogNutrient};

/// Public FDC endpoint
pub const DEFAULT_FDC_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Results requested per search
pub const SEARCH_PAGE_SIZE: u32 = 20;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SEARCH_DATA_TYPES: [&str; 2] = ["Foundation", "SR Legacy"];

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    fdc_id: i64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    brand_owner: Option<String>,
    #[serde(default)]
    data_type: Option<String>,
    #[serde(default)]
    serving_size: Option<f64>,
    #[serde(default)]
    serving_size_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDetails {
    fdc_id: i64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    serving_size: Option<f64>,
    #[serde(default)]
    serving_size_unit: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodNutrient {
    #[serde(default)]
    nutrient: Option<NutrientInfo>,
    #[serde(default)]
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    unit_name: Option<String>,
}

impl From<SearchFood> for CatalogSearchHit {
    fn from(food: SearchFood) -> Self {
        Self {
            catalog_id: food.fdc_id,
            description: food.description.unwrap_or_else(|| "Unknown".to_string()),
            brand: food.brand_owner.filter(|b| !b.is_empty()),
            data_type: food.data_type,
            serving_size: food.serving_size,
            serving_unit: food.serving_size_unit,
        }
    }
}

impl From<FoodDetails> for CatalogFood {
    fn from(food: FoodDetails) -> Self {
        let mut nutrients: BTreeMap<String, CatalogNutrient> = BTreeMap::new();

        for entry in food.food_nutrients {
            let (Some(info), Some(amount)) = (entry.nutrient, entry.amount) else {
                continue;
            };
            let Some(name) = info.name.filter(|n| !n.is_empty()) else {
                continue;
            };
            let reported = CatalogNutrient {
                amount,
                unit: info.unit_name,
            };
            match nutrients.get(&name) {
                Some(existing) if unit_rank(&name, existing) >= unit_rank(&name, &reported) => {}
                _ => {
                    nutrients.insert(name, reported);
                }
            }
        }

        Self {
            catalog_id: food.fdc_id,
            description: food.description.unwrap_or_default(),
            serving_size: food.serving_size,
            serving_unit: food.serving_size_unit,
            nutrients,
        }
    }
}

/// Preference among duplicate nutrient rows (energy is reported in both
/// kcal and kJ): tracked unit, then convertible, then anything
fn unit_rank(name: &str, reported: &CatalogNutrient) -> u8 {
    let (Some(nutrient), Some(unit)) = (catalog_nutrient(name), reported.unit.as_deref()) else {
        return 0;
    };
    match convert_amount(1.0, unit, nutrient.unit()) {
        Some(factor) if (factor - 1.0).abs() < 1e-9 => 2,
        Some(_) => 1,
        None => 0,
    }
}

fn parse_search(body: &str) -> serde_json::Result<Vec<CatalogSearchHit>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.foods.into_iter().map(CatalogSearchHit::from).collect())
}

fn parse_details(body: &str) -> serde_json::Result<CatalogFood> {
    let details: FoodDetails = serde_json::from_str(body)?;
    Ok(details.into())
}

// ============================================================================
// Client
// ============================================================================

/// FoodData Central client
///
/// Uses reqwest's blocking client; call it from a blocking context.
pub struct UsdaClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl UsdaClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> CatalogResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        missing_id: Option<i64>,
    ) -> CatalogResult<String> {
        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = missing_id {
                return Err(CatalogError::NotFound(id));
            }
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text()?)
    }
}

impl FoodCatalog for UsdaClient {
    fn search(&self, query: &str) -> CatalogResult<Vec<CatalogSearchHit>> {
        if !is_searchable(query) {
            return Ok(Vec::new());
        }

        let url = format!("{}/foods/search", self.base_url);
        let page_size = SEARCH_PAGE_SIZE.to_string();
        let mut params = vec![("query", query.trim()), ("pageSize", page_size.as_str())];
        params.extend(SEARCH_DATA_TYPES.iter().map(|t| ("dataType", *t)));

        let body = self.get_text(&url, &params, None)?;
        let hits = parse_search(&body)?;
        tracing::debug!("Catalog search '{}' returned {} foods", query.trim(), hits.len());
        Ok(hits)
    }

    fn get_details(&self, catalog_id: i64) -> CatalogResult<CatalogFood> {
        let url = format!("{}/food/{}", self.base_url, catalog_id);
        let body = self.get_text(&url, &[], Some(catalog_id))?;
        let food = parse_details(&body)?;
        tracing::debug!(
            "Catalog food {} has {} nutrient rows",
            catalog_id,
            food.nutrients.len()
        );
        Ok(food)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{normalize_nutrients, Nutrient};

    const SEARCH_FIXTURE: &str = r#"{
        "totalHits": 2,
        "foods": [
            {
                "fdcId": 171077,
                "description": "Chicken, broilers or fryers, breast, meat only, cooked, roasted",
                "dataType": "SR Legacy",
                "brandOwner": ""
            },
            {
                "fdcId": 2646170,
                "description": "Chicken, breast, boneless, skinless, raw",
                "dataType": "Foundation",
                "servingSize": 112,
                "servingSizeUnit": "g"
            }
        ]
    }"#;

    const DETAILS_FIXTURE: &str = r#"{
        "fdcId": 171077,
        "description": "Chicken, broilers or fryers, breast, meat only, cooked, roasted",
        "foodNutrients": [
            {"nutrient": {"id": 1003, "name": "Protein", "unitName": "g"}, "amount": 31.0},
            {"nutrient": {"id": 1004, "name": "Total lipid (fat)", "unitName": "g"}, "amount": 3.57},
            {"nutrient": {"id": 1062, "name": "Energy", "unitName": "kJ"}, "amount": 690},
            {"nutrient": {"id": 1008, "name": "Energy", "unitName": "kcal"}, "amount": 165},
            {"nutrient": {"id": 1093, "name": "Sodium, Na", "unitName": "mg"}, "amount": 74},
            {"nutrient": {"id": 1057, "name": "Caffeine", "unitName": "mg"}, "amount": 0},
            {"nutrient": {"id": 1079, "name": "Fiber, total dietary", "unitName": "g"}},
            {"type": "FoodNutrient", "amount": 1.0}
        ]
    }"#;

    #[test]
    fn test_parse_search_fixture() {
        let hits = parse_search(SEARCH_FIXTURE).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].catalog_id, 171077);
        assert_eq!(hits[0].brand, None);
        assert_eq!(hits[0].serving_size, None);
        assert_eq!(hits[1].data_type.as_deref(), Some("Foundation"));
        assert_eq!(hits[1].serving_size, Some(112.0));
    }

    #[test]
    fn test_parse_details_prefers_kcal_energy() {
        let food = parse_details(DETAILS_FIXTURE).unwrap();
        assert_eq!(food.catalog_id, 171077);
        assert_eq!(food.nutrients["Energy"].amount, 165.0);
        assert_eq!(food.nutrients["Energy"].unit.as_deref(), Some("kcal"));
        // Rows without an amount or a nutrient are skipped
        assert!(!food.nutrients.contains_key("Fiber, total dietary"));
        assert_eq!(food.nutrients.len(), 5);

        let tracked = normalize_nutrients(&food.nutrients);
        assert_eq!(tracked.get(Nutrient::Calories), 165.0);
        assert_eq!(tracked.get(Nutrient::Protein), 31.0);
        assert!(!tracked.contains(Nutrient::Fiber));
        assert_eq!(food.reference_portion(), 100.0);
    }

    #[test]
    fn test_energy_order_does_not_matter() {
        let body = r#"{
            "fdcId": 1,
            "foodNutrients": [
                {"nutrient": {"name": "Energy", "unitName": "kcal"}, "amount": 52},
                {"nutrient": {"name": "Energy", "unitName": "kJ"}, "amount": 218}
            ]
        }"#;
        let food = parse_details(body).unwrap();
        assert_eq!(food.nutrients["Energy"].amount, 52.0);
        assert_eq!(food.description, "");
    }

    #[test]
    fn test_details_with_serving_size_refer_to_that_serving() {
        let body = r#"{
            "fdcId": 2646170,
            "description": "Chicken, breast, boneless, skinless, raw",
            "servingSize": 112,
            "servingSizeUnit": "g",
            "foodNutrients": [
                {"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 25.8}
            ]
        }"#;
        let food = parse_details(body).unwrap();
        assert_eq!(food.serving_size, Some(112.0));
        assert_eq!(food.reference_portion(), 112.0);
    }

    #[test]
    fn test_short_query_skips_request() {
        // Unroutable base URL: any request would fail
        let client = UsdaClient::new("http://127.0.0.1:9", "DEMO_KEY").unwrap();
        assert!(client.search("a").unwrap().is_empty());
        assert!(client.search("  ").unwrap().is_empty());
    }
}
