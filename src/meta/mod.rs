//! Menu database access
//!
//! This module handles all access to the restaurant's menu tables:
//! - Dishes (name, price, creation time)
//! - Categories (named, typed groupings)
//! - Dish/category links, plus the ingredient and cuisson links that only
//!   ever get cleared
//!
//! Procedures talk to the database through the [`MenuStore`] trait so they
//! can run against [`MenuDb`] in production and an in-memory store in tests.

#[cfg(test)]
pub(crate) mod memory;

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};

/// A dish row
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Dish {
    pub dish_id: i32,
    pub name: String,
    pub price_eur: Decimal,
    pub record_date: NaiveDateTime,
}

/// Values for inserting a dish; the id comes from the sequence
#[derive(Debug, Clone)]
pub struct NewDish {
    pub name: String,
    pub price_eur: Decimal,
    pub record_date: NaiveDateTime,
}

/// A category row
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i32,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
}

/// A dish/category link. Nothing in the schema prevents duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRow, Serialize, Deserialize)]
pub struct DishCategory {
    pub category_id: i32,
    pub dish_id: i32,
}

/// Catalog statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuStats {
    pub dish_count: usize,
    pub category_count: usize,
    pub link_count: usize,
    /// Dishes with no category link at all
    pub uncategorized_dishes: usize,
}

/// Record access used by the maintenance procedures
#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn clear_dish_ingredients(&self) -> Result<u64>;

    async fn clear_dish_cuissons(&self) -> Result<u64>;

    async fn clear_dish_categories(&self) -> Result<u64>;

    /// Delete every dish. Fails while any link still references a dish.
    async fn clear_dishes(&self) -> Result<u64>;

    /// Restart the dish id sequence at 1
    async fn reset_dish_sequence(&self) -> Result<()>;

    async fn create_dish(&self, dish: &NewDish) -> Result<Dish>;

    async fn list_dishes(&self) -> Result<Vec<Dish>>;

    /// Rename the category with this id and type; returns rows updated
    async fn rename_category(&self, category_id: i32, kind: &str, name: &str) -> Result<u64>;

    /// First category matching name and type
    async fn find_category(&self, name: &str, kind: &str) -> Result<Option<Category>>;

    async fn create_category(&self, name: &str, kind: &str) -> Result<Category>;

    async fn list_dish_category_links(&self, category_id: i32) -> Result<Vec<DishCategory>>;

    async fn find_dish_category(
        &self,
        category_id: i32,
        dish_id: i32,
    ) -> Result<Option<DishCategory>>;

    async fn create_dish_category(&self, category_id: i32, dish_id: i32) -> Result<()>;

    /// Delete all links matching the pair; returns rows deleted
    async fn delete_dish_category(&self, category_id: i32, dish_id: i32) -> Result<u64>;

    async fn stats(&self, category_kind: &str) -> Result<MenuStats>;

    /// Release the underlying connection(s)
    async fn close(&self);
}

/// PostgreSQL menu database handle
#[derive(Clone)]
pub struct MenuDb {
    pool: PgPool,
}

impl MenuDb {
    /// Connect to the menu database
    pub async fn connect(database_url: &str) -> Result<Self> {
        debug!("Connecting to menu database");

        // Procedures are strictly sequential; one connection is enough.
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        info!("Connected to menu database");
        Ok(Self { pool })
    }

    async fn clear_table(&self, table: &'static str) -> Result<u64> {
        let result = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&self.pool)
            .await?;
        debug!(table, rows = result.rows_affected(), "Cleared table");
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MenuStore for MenuDb {
    async fn clear_dish_ingredients(&self) -> Result<u64> {
        self.clear_table("dishes_ingredients").await
    }

    async fn clear_dish_cuissons(&self) -> Result<u64> {
        self.clear_table("dishes_cuisson").await
    }

    async fn clear_dish_categories(&self) -> Result<u64> {
        self.clear_table("categories_dishes").await
    }

    async fn clear_dishes(&self) -> Result<u64> {
        self.clear_table("dishes").await
    }

    async fn reset_dish_sequence(&self) -> Result<()> {
        sqlx::query("ALTER SEQUENCE dishes_dish_id_seq RESTART WITH 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_dish(&self, dish: &NewDish) -> Result<Dish> {
        let created = sqlx::query_as::<_, Dish>(
            r#"
            INSERT INTO dishes (name, price_eur, record_date)
            VALUES ($1, $2, $3)
            RETURNING dish_id, name, price_eur::numeric AS price_eur, record_date
            "#,
        )
        .bind(&dish.name)
        .bind(dish.price_eur)
        .bind(dish.record_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_dishes(&self) -> Result<Vec<Dish>> {
        let dishes = sqlx::query_as::<_, Dish>(
            r#"
            SELECT dish_id, name, price_eur::numeric AS price_eur, record_date
            FROM dishes
            ORDER BY dish_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(dishes)
    }

    async fn rename_category(&self, category_id: i32, kind: &str, name: &str) -> Result<u64> {
        let result =
            sqlx::query("UPDATE categories SET name = $1 WHERE category_id = $2 AND type = $3")
                .bind(name)
                .bind(category_id)
                .bind(kind)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn find_category(&self, name: &str, kind: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT category_id, name, type FROM categories WHERE name = $1 AND type = $2 ORDER BY category_id LIMIT 1",
        )
        .bind(name)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn create_category(&self, name: &str, kind: &str) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, type) VALUES ($1, $2) RETURNING category_id, name, type",
        )
        .bind(name)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn list_dish_category_links(&self, category_id: i32) -> Result<Vec<DishCategory>> {
        let links = sqlx::query_as::<_, DishCategory>(
            "SELECT category_id, dish_id FROM categories_dishes WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    async fn find_dish_category(
        &self,
        category_id: i32,
        dish_id: i32,
    ) -> Result<Option<DishCategory>> {
        let link = sqlx::query_as::<_, DishCategory>(
            "SELECT category_id, dish_id FROM categories_dishes WHERE category_id = $1 AND dish_id = $2 LIMIT 1",
        )
        .bind(category_id)
        .bind(dish_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(link)
    }

    async fn create_dish_category(&self, category_id: i32, dish_id: i32) -> Result<()> {
        sqlx::query("INSERT INTO categories_dishes (category_id, dish_id) VALUES ($1, $2)")
            .bind(category_id)
            .bind(dish_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_dish_category(&self, category_id: i32, dish_id: i32) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM categories_dishes WHERE category_id = $1 AND dish_id = $2")
                .bind(category_id)
                .bind(dish_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn stats(&self, category_kind: &str) -> Result<MenuStats> {
        let dish_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dishes")
            .fetch_one(&self.pool)
            .await?;

        let category_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE type = $1")
                .bind(category_kind)
                .fetch_one(&self.pool)
                .await?;

        let link_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories_dishes")
            .fetch_one(&self.pool)
            .await?;

        let uncategorized: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM dishes d
            WHERE NOT EXISTS (SELECT 1 FROM categories_dishes cd WHERE cd.dish_id = d.dish_id)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(MenuStats {
            dish_count: dish_count as usize,
            category_count: category_count as usize,
            link_count: link_count as usize,
            uncategorized_dishes: uncategorized as usize,
        })
    }

    async fn close(&self) {
        debug!("Closing menu database pool");
        self.pool.close().await;
    }
}
