//! Food Diary MCP Tools
//!
//! Catalog search, nutrition preview, and logging foods into the diary.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::{CatalogFood, CatalogSearchHit, FoodCatalog};
use crate::models::{FoodEntry, MealType, NewFoodEntry};
use crate::nutrition::{
    calculate_meal_calories, daily_totals, scale_nutrients_by_portion, NutrientVector,
};
use crate::store::NutritionStore;

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub query: String,
    pub count: usize,
    pub foods: Vec<CatalogSearchHit>,
}

/// Nutrition of a catalog food at a portion, not logged
#[derive(Debug, Serialize)]
pub struct FoodPreview {
    pub catalog_id: i64,
    pub description: String,
    pub portion_grams: f64,
    pub reference_portion: f64,
    pub nutrients: NutrientVector,
    /// Calories implied by protein, fat, and carbohydrates
    pub macro_calories: f64,
}

/// Entries for one meal with their totals
#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub meal_type: MealType,
    pub entries: Vec<FoodEntry>,
    pub totals: NutrientVector,
}

/// Response for get_diary
#[derive(Debug, Serialize)]
pub struct DiaryDay {
    pub date: NaiveDate,
    pub entry_count: usize,
    /// Meals in breakfast, lunch, dinner, snack order; empty meals omitted
    pub meals: Vec<MealGroup>,
    pub totals: NutrientVector,
}

/// Response for remove_food_entry
#[derive(Debug, Serialize)]
pub struct RemoveEntryResponse {
    pub date: NaiveDate,
    pub entry_id: i64,
    pub removed: bool,
}

/// Response for get_daily_totals
#[derive(Debug, Serialize)]
pub struct DailyTotalsResponse {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub totals: NutrientVector,
}

pub fn search_foods(
    catalog: &dyn FoodCatalog,
    query: &str,
) -> Result<SearchFoodsResponse, String> {
    let foods = catalog
        .search(query)
        .map_err(|e| format!("Food search failed: {}", e))?;

    Ok(SearchFoodsResponse {
        query: query.trim().to_string(),
        count: foods.len(),
        foods,
    })
}

fn fetch_food(catalog: &dyn FoodCatalog, catalog_id: i64) -> Result<CatalogFood, String> {
    catalog
        .get_details(catalog_id)
        .map_err(|e| format!("Failed to get food details: {}", e))
}

/// Tracked nutrients of a catalog food scaled to a portion in grams
fn portion_nutrients(food: &CatalogFood, portion_grams: f64) -> Result<NutrientVector, String> {
    let per_reference = food.tracked_nutrients().map_err(|e| e.to_string())?;
    scale_nutrients_by_portion(&per_reference, portion_grams, food.reference_portion())
        .map_err(|e| e.to_string())
}

pub fn preview_food(
    catalog: &dyn FoodCatalog,
    catalog_id: i64,
    portion_grams: f64,
) -> Result<FoodPreview, String> {
    let food = fetch_food(catalog, catalog_id)?;
    let nutrients = portion_nutrients(&food, portion_grams)?;
    let reference_portion = food.reference_portion();

    Ok(FoodPreview {
        catalog_id,
        macro_calories: calculate_meal_calories(&nutrients),
        description: food.description,
        portion_grams,
        reference_portion,
        nutrients,
    })
}

/// Look up a catalog food, scale it to the portion, and log it
pub fn add_food_to_diary(
    store: &dyn NutritionStore,
    catalog: &dyn FoodCatalog,
    date: NaiveDate,
    meal_type: &str,
    catalog_id: i64,
    portion_grams: f64,
) -> Result<FoodEntry, String> {
    let meal_type = MealType::parse(meal_type).ok_or_else(|| {
        format!(
            "Invalid meal type '{}' (expected breakfast, lunch, dinner, or snack)",
            meal_type
        )
    })?;

    let food = fetch_food(catalog, catalog_id)?;
    let nutrients = portion_nutrients(&food, portion_grams)?;

    let entry = NewFoodEntry {
        meal_type,
        reference_portion: food.reference_portion(),
        food_name: food.description,
        catalog_id: Some(catalog_id),
        portion_size: portion_grams,
        portion_unit: "g".to_string(),
        nutrients,
    };

    store
        .add_entry(date, entry)
        .map_err(|e| format!("Failed to log food: {}", e))
}

pub fn get_diary(store: &dyn NutritionStore, date: NaiveDate) -> Result<DiaryDay, String> {
    let entries = store
        .list_entries(date)
        .map_err(|e| format!("Failed to get diary entries: {}", e))?;

    let totals = daily_totals(&entries);
    let entry_count = entries.len();

    let meals = MealType::ALL
        .iter()
        .filter_map(|meal_type| {
            let meal_entries: Vec<FoodEntry> = entries
                .iter()
                .filter(|e| e.meal_type == *meal_type)
                .cloned()
                .collect();
            if meal_entries.is_empty() {
                return None;
            }
            Some(MealGroup {
                meal_type: *meal_type,
                totals: daily_totals(&meal_entries),
                entries: meal_entries,
            })
        })
        .collect();

    Ok(DiaryDay {
        date,
        entry_count,
        meals,
        totals,
    })
}

pub fn remove_food_entry(
    store: &dyn NutritionStore,
    date: NaiveDate,
    entry_id: i64,
) -> Result<RemoveEntryResponse, String> {
    let removed = store
        .remove_entry(date, entry_id)
        .map_err(|e| format!("Failed to remove entry: {}", e))?;

    Ok(RemoveEntryResponse {
        date,
        entry_id,
        removed,
    })
}

pub fn get_daily_totals(
    store: &dyn NutritionStore,
    date: NaiveDate,
) -> Result<DailyTotalsResponse, String> {
    let entries = store
        .list_entries(date)
        .map_err(|e| format!("Failed to get diary entries: {}", e))?;

    Ok(DailyTotalsResponse {
        date,
        entry_count: entries.len(),
        totals: daily_totals(&entries),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, CatalogResult};
    use crate::nutrition::{CatalogNutrient, Nutrient};
    use crate::store::MemoryStore;
    use std::collections::BTreeMap;

    struct FixedCatalog;

    impl FoodCatalog for FixedCatalog {
        fn search(&self, query: &str) -> CatalogResult<Vec<CatalogSearchHit>> {
            if query.trim().len() < 2 {
                return Ok(Vec::new());
            }
            Ok(vec![CatalogSearchHit {
                catalog_id: 9003,
                description: "Apples, raw, with skin".to_string(),
                brand: None,
                data_type: Some("SR Legacy".to_string()),
                serving_size: None,
                serving_unit: None,
            }])
        }

        fn get_details(&self, catalog_id: i64) -> CatalogResult<CatalogFood> {
            let mut nutrients = BTreeMap::new();
            match catalog_id {
                9003 => {
                    nutrients.insert("Energy".to_string(), CatalogNutrient::new(52.0, "KCAL"));
                    nutrients.insert("Protein".to_string(), CatalogNutrient::new(0.26, "G"));
                    nutrients.insert(
                        "Carbohydrate, by difference".to_string(),
                        CatalogNutrient::new(13.81, "G"),
                    );
                    nutrients.insert(
                        "Vitamin C, total ascorbic acid".to_string(),
                        CatalogNutrient::new(4.6, "MG"),
                    );
                }
                1 => {
                    nutrients.insert("Caffeine".to_string(), CatalogNutrient::new(40.0, "MG"));
                }
                _ => return Err(CatalogError::NotFound(catalog_id)),
            }
            Ok(CatalogFood {
                catalog_id,
                description: "Apples, raw, with skin".to_string(),
                serving_size: None,
                serving_unit: None,
                nutrients,
            })
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_search_and_preview() {
        let results = search_foods(&FixedCatalog, " apple ").unwrap();
        assert_eq!(results.query, "apple");
        assert_eq!(results.count, 1);

        let preview = preview_food(&FixedCatalog, 9003, 182.0).unwrap();
        assert_eq!(preview.reference_portion, 100.0);
        assert!((preview.nutrients.get(Nutrient::Calories) - 94.64).abs() < 1e-9);
        assert!((preview.nutrients.get(Nutrient::VitaminC) - 8.372).abs() < 1e-9);
    }

    #[test]
    fn test_preview_reports_food_and_macro_calories() {
        let preview = preview_food(&FixedCatalog, 9003, 50.0).unwrap();
        assert_eq!(preview.catalog_id, 9003);
        assert_eq!(preview.description, "Apples, raw, with skin");
        assert_eq!(preview.portion_grams, 50.0);
        assert_eq!(preview.reference_portion, 100.0);
        // (0.13 g protein + 6.905 g carbohydrate) * 4 kcal/g
        assert!((preview.macro_calories - 28.14).abs() < 1e-9);

        assert!(preview_food(&FixedCatalog, 9003, -1.0).is_err());
        assert!(preview_food(&FixedCatalog, 404, 50.0)
            .unwrap_err()
            .contains("not found"));
    }

    #[test]
    fn test_add_food_scales_and_groups_by_meal() {
        let store = MemoryStore::new();
        let day = date("2025-06-01");

        let entry = add_food_to_diary(&store, &FixedCatalog, day, "Snack", 9003, 200.0).unwrap();
        assert_eq!(entry.meal_type, MealType::Snack);
        assert_eq!(entry.catalog_id, Some(9003));
        assert!((entry.nutrients.get(Nutrient::Calories) - 104.0).abs() < 1e-9);

        add_food_to_diary(&store, &FixedCatalog, day, "breakfast", 9003, 100.0).unwrap();

        let diary = get_diary(&store, day).unwrap();
        assert_eq!(diary.entry_count, 2);
        let meals: Vec<MealType> = diary.meals.iter().map(|m| m.meal_type).collect();
        assert_eq!(meals, vec![MealType::Breakfast, MealType::Snack]);
        assert!((diary.totals.get(Nutrient::Calories) - 156.0).abs() < 1e-9);

        let totals = get_daily_totals(&store, day).unwrap();
        assert_eq!(totals.entry_count, 2);
        assert_eq!(totals.totals, diary.totals);
    }

    #[test]
    fn test_add_food_rejects_bad_input() {
        let store = MemoryStore::new();
        let day = date("2025-06-01");

        assert!(add_food_to_diary(&store, &FixedCatalog, day, "brunch", 9003, 100.0)
            .unwrap_err()
            .contains("meal type"));
        assert!(add_food_to_diary(&store, &FixedCatalog, day, "lunch", 9003, 0.0)
            .unwrap_err()
            .contains("portion"));
        assert!(add_food_to_diary(&store, &FixedCatalog, day, "lunch", 1, 100.0)
            .unwrap_err()
            .contains("No tracked nutrients"));
        assert!(add_food_to_diary(&store, &FixedCatalog, day, "lunch", 404, 100.0)
            .unwrap_err()
            .contains("not found"));

        assert!(get_diary(&store, day).unwrap().meals.is_empty());
    }

    #[test]
    fn test_remove_entry() {
        let store = MemoryStore::new();
        let day = date("2025-06-01");
        let entry = add_food_to_diary(&store, &FixedCatalog, day, "lunch", 9003, 100.0).unwrap();

        let response = remove_food_entry(&store, day, entry.id).unwrap();
        assert!(response.removed);
        let response = remove_food_entry(&store, day, entry.id).unwrap();
        assert!(!response.removed);
    }
}
