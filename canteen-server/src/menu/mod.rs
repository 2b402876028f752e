//! 菜单目录
//!
//! 菜品的增删改查、上下架、分类列表，以及评价聚合写回的评分字段。
//! 订单保存的是菜品快照，删除菜品不影响历史订单。

mod sample;

use shared::error::{AppError, ErrorCode};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate, MenuQuery};
use shared::util::new_id;

use crate::storage::RecordStore;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
};
use crate::utils::AppResult;

pub use sample::sample_menu;

const KEY_PREFIX: &str = "menu_item:";

/// "All" in the category filter means no category filter
pub const ALL_CATEGORIES: &str = "All";

fn key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

/// Menu catalog backed by the record store
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    store: RecordStore,
}

impl MenuCatalog {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// List items, name-sorted, with optional search/category/availability filters
    pub fn list(&self, query: &MenuQuery) -> AppResult<Vec<MenuItem>> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = query
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

        let mut items: Vec<MenuItem> = self
            .store
            .scan::<MenuItem>(KEY_PREFIX)?
            .into_iter()
            .filter(|item| {
                search
                    .as_ref()
                    .is_none_or(|s| item.name.to_lowercase().contains(s.as_str()))
            })
            .filter(|item| category.is_none_or(|c| item.category == c))
            .filter(|item| !query.available_only || item.is_available)
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    /// All items, unfiltered
    pub fn all(&self) -> AppResult<Vec<MenuItem>> {
        self.list(&MenuQuery::default())
    }

    pub fn get(&self, id: &str) -> AppResult<MenuItem> {
        self.store
            .get::<MenuItem>(&key(id))?
            .ok_or_else(|| AppError::menu_item_not_found(id))
    }

    pub fn create(&self, payload: MenuItemCreate) -> AppResult<MenuItem> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
        validate_optional_text(&Some(payload.description.clone()), "description", MAX_NOTE_LEN)?;
        validate_price(payload.price)?;
        validate_spice_and_prep(Some(payload.spice_level), Some(payload.preparation_time))?;

        let item = MenuItem {
            id: new_id(),
            name: payload.name.trim().to_string(),
            description: payload.description,
            price: payload.price,
            category: payload.category.trim().to_string(),
            image: payload.image,
            is_veg: payload.is_veg,
            cuisine: payload.cuisine,
            spice_level: payload.spice_level,
            allergens: payload.allergens,
            nutritional_info: payload.nutritional_info,
            is_available: payload.is_available,
            ingredients: payload.ingredients,
            average_rating: 0.0,
            review_count: 0,
            preparation_time: payload.preparation_time,
        };
        self.store.put(&key(&item.id), &item)?;
        tracing::info!(item_id = %item.id, name = %item.name, "Menu item created");
        Ok(item)
    }

    /// Partial update; only fields present in the payload change
    pub fn update(&self, id: &str, payload: MenuItemUpdate) -> AppResult<MenuItem> {
        if let Some(name) = &payload.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(category) = &payload.category {
            validate_required_text(category, "category", MAX_NAME_LEN)?;
        }
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        if let Some(price) = payload.price {
            validate_price(price)?;
        }
        validate_spice_and_prep(payload.spice_level, payload.preparation_time)?;

        let updated = self.store.update::<MenuItem, AppError, _>(&key(id), |item| {
            if let Some(v) = payload.name {
                item.name = v.trim().to_string();
            }
            if let Some(v) = payload.description {
                item.description = v;
            }
            if let Some(v) = payload.price {
                item.price = v;
            }
            if let Some(v) = payload.category {
                item.category = v.trim().to_string();
            }
            if let Some(v) = payload.image {
                item.image = v;
            }
            if let Some(v) = payload.is_veg {
                item.is_veg = v;
            }
            if let Some(v) = payload.cuisine {
                item.cuisine = v;
            }
            if let Some(v) = payload.spice_level {
                item.spice_level = v;
            }
            if let Some(v) = payload.allergens {
                item.allergens = v;
            }
            if let Some(v) = payload.nutritional_info {
                item.nutritional_info = v;
            }
            if let Some(v) = payload.is_available {
                item.is_available = v;
            }
            if let Some(v) = payload.ingredients {
                item.ingredients = v;
            }
            if let Some(v) = payload.preparation_time {
                item.preparation_time = v;
            }
            Ok(())
        })?;

        let item = updated
            .ok_or_else(|| AppError::menu_item_not_found(id))?;
        tracing::info!(item_id = %id, "Menu item updated");
        Ok(item)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        if !self.store.remove(&key(id))? {
            return Err(AppError::menu_item_not_found(id));
        }
        tracing::info!(item_id = %id, "Menu item deleted");
        Ok(())
    }

    /// Toggle whether students can order the item
    pub fn set_availability(&self, id: &str, is_available: bool) -> AppResult<MenuItem> {
        self.update(
            id,
            MenuItemUpdate {
                is_available: Some(is_available),
                ..Default::default()
            },
        )
    }

    /// Distinct categories, sorted, prefixed with "All"
    pub fn categories(&self) -> AppResult<Vec<String>> {
        let mut categories: Vec<String> = self
            .store
            .scan::<MenuItem>(KEY_PREFIX)?
            .into_iter()
            .map(|item| item.category)
            .collect();
        categories.sort();
        categories.dedup();
        categories.insert(0, ALL_CATEGORIES.to_string());
        Ok(categories)
    }

    /// Overwrite the review aggregate; only the review service calls this
    pub fn apply_rating(&self, id: &str, average_rating: f64, review_count: u32) -> AppResult<MenuItem> {
        self.store
            .update::<MenuItem, AppError, _>(&key(id), |item| {
                item.average_rating = average_rating;
                item.review_count = review_count;
                Ok(())
            })?
            .ok_or_else(|| AppError::menu_item_not_found(id))
    }

    /// Insert the sample menu when the catalog is empty; returns how many were added
    pub fn seed_if_empty(&self) -> AppResult<usize> {
        if !self.store.scan::<MenuItem>(KEY_PREFIX)?.is_empty() {
            return Ok(0);
        }
        let mut count = 0;
        for payload in sample_menu() {
            self.create(payload)?;
            count += 1;
        }
        tracing::info!(count, "Seeded sample menu");
        Ok(count)
    }
}

fn validate_spice_and_prep(spice_level: Option<u8>, preparation_time: Option<u32>) -> AppResult<()> {
    if let Some(level) = spice_level
        && level > 5
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("spice_level must be between 0 and 5, got {level}"),
        ));
    }
    if preparation_time == Some(0) {
        return Err(AppError::validation("preparation_time must be positive"));
    }
    Ok(())
}
