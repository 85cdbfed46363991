//! In-memory `MenuStore` used by tests
//!
//! Enforces the foreign keys of the link tables so that clearing order
//! mistakes surface as errors, and can fail on a chosen dish name or link.

use super::{Category, Dish, DishCategory, MenuStats, MenuStore, NewDish};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    dishes: Vec<Dish>,
    categories: Vec<Category>,
    links: Vec<DishCategory>,
    ingredient_links: Vec<(i32, i32)>,
    cuisson_links: Vec<(i32, i32)>,
    next_dish_id: i32,
    next_category_id: i32,
    link_writes: usize,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryDb {
    state: Mutex<State>,
    fail_on_dish: Option<String>,
    fail_on_link: Option<DishCategory>,
}

impl MemoryDb {
    pub fn new() -> Self {
        let db = Self::default();
        {
            let mut state = db.state.lock().unwrap();
            state.next_dish_id = 1;
            state.next_category_id = 1;
        }
        db
    }

    /// Store seeded with the dish categories of the production menu
    pub fn with_menu_categories() -> Self {
        let db = Self::new();
        db.seed_category(21, "FINGER FOOD", "dish");
        db.seed_category(25, "BURGERS avec FRITES MAISON", "dish");
        db.seed_category(27, "VIANDES", "dish");
        db.seed_category(29, "KIDS MENU", "dish");
        db
    }

    /// Make `create_dish` fail for this name
    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on_dish = Some(name.to_string());
        self
    }

    /// Make `create_dish_category` fail for this pair
    pub fn failing_on_link(mut self, category_id: i32, dish_id: i32) -> Self {
        self.fail_on_link = Some(DishCategory { category_id, dish_id });
        self
    }

    pub fn seed_category(&self, category_id: i32, name: &str, kind: &str) {
        let mut state = self.state.lock().unwrap();
        state.categories.push(Category {
            category_id,
            name: name.to_string(),
            kind: kind.to_string(),
        });
        state.next_category_id = state.next_category_id.max(category_id + 1);
    }

    pub fn seed_dish(&self, name: &str) -> i32 {
        let mut state = self.state.lock().unwrap();
        let dish_id = state.next_dish_id;
        state.next_dish_id += 1;
        state.dishes.push(Dish {
            dish_id,
            name: name.to_string(),
            price_eur: Decimal::ONE,
            record_date: Utc::now().naive_utc(),
        });
        dish_id
    }

    pub fn seed_link(&self, category_id: i32, dish_id: i32) {
        self.state
            .lock()
            .unwrap()
            .links
            .push(DishCategory { category_id, dish_id });
    }

    pub fn seed_ingredient_link(&self, dish_id: i32, ingredient_id: i32) {
        self.state
            .lock()
            .unwrap()
            .ingredient_links
            .push((dish_id, ingredient_id));
    }

    pub fn seed_cuisson_link(&self, dish_id: i32, cuisson_id: i32) {
        self.state
            .lock()
            .unwrap()
            .cuisson_links
            .push((dish_id, cuisson_id));
    }

    pub fn dishes(&self) -> Vec<Dish> {
        self.state.lock().unwrap().dishes.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.lock().unwrap().categories.clone()
    }

    pub fn links(&self) -> Vec<DishCategory> {
        self.state.lock().unwrap().links.clone()
    }

    /// Links for one dish, in insertion order
    pub fn categories_of(&self, dish_id: i32) -> Vec<i32> {
        self.state
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|l| l.dish_id == dish_id)
            .map(|l| l.category_id)
            .collect()
    }

    /// Number of link inserts and effective deletes so far
    pub fn link_writes(&self) -> usize {
        self.state.lock().unwrap().link_writes
    }
}

#[async_trait]
impl MenuStore for MemoryDb {
    async fn clear_dish_ingredients(&self) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        let n = state.ingredient_links.len() as u64;
        state.ingredient_links.clear();
        Ok(n)
    }

    async fn clear_dish_cuissons(&self) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        let n = state.cuisson_links.len() as u64;
        state.cuisson_links.clear();
        Ok(n)
    }

    async fn clear_dish_categories(&self) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        let n = state.links.len() as u64;
        state.links.clear();
        Ok(n)
    }

    async fn clear_dishes(&self) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        if !state.links.is_empty()
            || !state.ingredient_links.is_empty()
            || !state.cuisson_links.is_empty()
        {
            return Err(Error::Constraint(
                "dishes are still referenced by link tables".to_string(),
            ));
        }
        let n = state.dishes.len() as u64;
        state.dishes.clear();
        Ok(n)
    }

    async fn reset_dish_sequence(&self) -> Result<()> {
        self.state.lock().unwrap().next_dish_id = 1;
        Ok(())
    }

    async fn create_dish(&self, dish: &NewDish) -> Result<Dish> {
        if self.fail_on_dish.as_deref() == Some(dish.name.as_str()) {
            return Err(Error::Constraint(format!("insert rejected: {}", dish.name)));
        }
        let mut state = self.state.lock().unwrap();
        let dish_id = state.next_dish_id;
        if state.dishes.iter().any(|d| d.dish_id == dish_id) {
            return Err(Error::Constraint(format!("duplicate dish_id {}", dish_id)));
        }
        state.next_dish_id += 1;
        let created = Dish {
            dish_id,
            name: dish.name.clone(),
            price_eur: dish.price_eur,
            record_date: dish.record_date,
        };
        state.dishes.push(created.clone());
        Ok(created)
    }

    async fn list_dishes(&self) -> Result<Vec<Dish>> {
        Ok(self.dishes())
    }

    async fn rename_category(&self, category_id: i32, kind: &str, name: &str) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        let mut n = 0;
        for category in state
            .categories
            .iter_mut()
            .filter(|c| c.category_id == category_id && c.kind == kind)
        {
            category.name = name.to_string();
            n += 1;
        }
        Ok(n)
    }

    async fn find_category(&self, name: &str, kind: &str) -> Result<Option<Category>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .categories
            .iter()
            .find(|c| c.name == name && c.kind == kind)
            .cloned())
    }

    async fn create_category(&self, name: &str, kind: &str) -> Result<Category> {
        let mut state = self.state.lock().unwrap();
        let category = Category {
            category_id: state.next_category_id,
            name: name.to_string(),
            kind: kind.to_string(),
        };
        state.next_category_id += 1;
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn list_dish_category_links(&self, category_id: i32) -> Result<Vec<DishCategory>> {
        Ok(self
            .links()
            .into_iter()
            .filter(|l| l.category_id == category_id)
            .collect())
    }

    async fn find_dish_category(
        &self,
        category_id: i32,
        dish_id: i32,
    ) -> Result<Option<DishCategory>> {
        Ok(self
            .links()
            .into_iter()
            .find(|l| l.category_id == category_id && l.dish_id == dish_id))
    }

    async fn create_dish_category(&self, category_id: i32, dish_id: i32) -> Result<()> {
        if self.fail_on_link == Some(DishCategory { category_id, dish_id }) {
            return Err(Error::Constraint(format!(
                "link rejected: category {} dish {}",
                category_id, dish_id
            )));
        }
        let mut state = self.state.lock().unwrap();
        if !state.dishes.iter().any(|d| d.dish_id == dish_id) {
            return Err(Error::Constraint(format!("unknown dish {}", dish_id)));
        }
        if !state.categories.iter().any(|c| c.category_id == category_id) {
            return Err(Error::Constraint(format!("unknown category {}", category_id)));
        }
        state.links.push(DishCategory { category_id, dish_id });
        state.link_writes += 1;
        Ok(())
    }

    async fn delete_dish_category(&self, category_id: i32, dish_id: i32) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.links.len();
        state
            .links
            .retain(|l| !(l.category_id == category_id && l.dish_id == dish_id));
        let n = before - state.links.len();
        state.link_writes += n;
        Ok(n as u64)
    }

    async fn stats(&self, category_kind: &str) -> Result<MenuStats> {
        let state = self.state.lock().unwrap();
        let uncategorized_dishes = state
            .dishes
            .iter()
            .filter(|d| !state.links.iter().any(|l| l.dish_id == d.dish_id))
            .count();
        Ok(MenuStats {
            dish_count: state.dishes.len(),
            category_count: state
                .categories
                .iter()
                .filter(|c| c.kind == category_kind)
                .count(),
            link_count: state.links.len(),
            uncategorized_dishes,
        })
    }

    async fn close(&self) {}
}
