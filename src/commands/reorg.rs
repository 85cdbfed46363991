//! Reorg command - converge dish/category links to the configured layout
//!
//! Members of the source category are split three ways: the `keep` dishes
//! stay, the `move` dishes go to the move category, and everything else
//! goes to the overflow category (created on first run). Every write is
//! preceded by an existence check, so a second run changes nothing.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::meta::{Category, Dish, MenuStore};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, error, info, warn};

/// Three-way split of the source category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Must stay linked to the source category
    pub keep: BTreeSet<i32>,
    /// Leave the source category for the move category
    pub move_to_target: BTreeSet<i32>,
    /// Current members named in neither list
    pub move_to_overflow: BTreeSet<i32>,
}

/// Split `current` source members given the resolved keep and move sets.
///
/// `keep` and `move_to_target` are returned whole, including dishes not yet
/// in the source category. A dish in both sets is moved.
pub fn partition_members(
    current: &BTreeSet<i32>,
    keep: &BTreeSet<i32>,
    move_to_target: &BTreeSet<i32>,
) -> Partition {
    let move_to_overflow = current
        .iter()
        .filter(|&&id| !keep.contains(&id) && !move_to_target.contains(&id))
        .copied()
        .collect();

    Partition {
        keep: keep.difference(move_to_target).copied().collect(),
        move_to_target: move_to_target.clone(),
        move_to_overflow,
    }
}

/// Case-insensitive dish name lookup
pub struct DishIndex {
    by_name: HashMap<String, i32>,
}

impl DishIndex {
    pub fn new(dishes: &[Dish]) -> Self {
        let mut by_name = HashMap::with_capacity(dishes.len());
        for dish in dishes {
            // Later rows win on duplicate names
            if let Some(prev) = by_name.insert(dish.name.to_uppercase(), dish.dish_id) {
                debug!(name = %dish.name, prev, dish_id = dish.dish_id, "Duplicate dish name");
            }
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.by_name.get(&name.to_uppercase()).copied()
    }

    /// Resolve names to ids, recording a warning for each unknown name
    pub fn resolve(&self, names: &[String], warnings: &mut Vec<String>) -> BTreeSet<i32> {
        names
            .iter()
            .filter_map(|name| {
                let id = self.get(name);
                if id.is_none() {
                    warn!("Dish not found: {}", name);
                    warnings.push(format!("Dish not found: {}", name));
                }
                id
            })
            .collect()
    }
}

/// Outcome of a reorg run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReorgReport {
    pub categories_renamed: u64,
    pub overflow_category: Option<Category>,
    pub overflow_created: bool,
    pub kept: Vec<i32>,
    pub moved_to_target: Vec<i32>,
    pub moved_to_overflow: Vec<i32>,
    pub links_created: usize,
    pub links_deleted: usize,
    pub warnings: Vec<String>,
    /// Error that stopped the run; earlier changes are not rolled back
    pub failure: Option<String>,
}

impl ReorgReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// True when the run wrote nothing
    pub fn is_noop(&self) -> bool {
        self.links_created == 0 && self.links_deleted == 0 && !self.overflow_created
    }
}

/// Reorganize category membership according to `config.reorg`
pub async fn cmd_reorg(config: &Config, store: &dyn MenuStore) -> ReorgReport {
    info!("Starting category reorganization");

    let mut report = ReorgReport::default();

    match reorg_categories(config, store, &mut report).await {
        Ok(()) => info!(
            links_created = report.links_created,
            links_deleted = report.links_deleted,
            "Category reorganization complete"
        ),
        Err(e) => {
            error!(error = ?e, "Error reorganizing categories");
            report.failure = Some(e.to_string());
        }
    }

    report
}

async fn reorg_categories(
    config: &Config,
    store: &dyn MenuStore,
    report: &mut ReorgReport,
) -> Result<()> {
    let reorg = &config.reorg;
    let kind = config.category_type.as_str();
    let source = reorg.source_category_id;
    let target = reorg.move_category_id;

    report.categories_renamed = store
        .rename_category(reorg.rename_category_id, kind, &reorg.rename_to)
        .await?;
    info!(
        "Renamed category {} to {}: {}",
        reorg.rename_category_id, reorg.rename_to, report.categories_renamed
    );

    let overflow = match store.find_category(&reorg.overflow_category, kind).await? {
        Some(category) => {
            info!(category_id = category.category_id, "Found existing category: {}", category.name);
            category
        }
        None => {
            let category = store.create_category(&reorg.overflow_category, kind).await?;
            info!(category_id = category.category_id, "Created new category: {}", category.name);
            report.overflow_created = true;
            category
        }
    };
    let overflow_id = overflow.category_id;
    report.overflow_category = Some(overflow);

    // Moving into the category being emptied would rewrite the same links every run
    if overflow_id == source || overflow_id == target {
        return Err(Error::Config(format!(
            "reorg.overflow_category '{}' resolves to category {}, which is the source or move category",
            reorg.overflow_category, overflow_id
        )));
    }

    let index = DishIndex::new(&store.list_dishes().await?);
    let keep = index.resolve(&reorg.keep, &mut report.warnings);
    let move_to_target = index.resolve(&reorg.r#move, &mut report.warnings);

    let current: BTreeSet<i32> = store
        .list_dish_category_links(source)
        .await?
        .into_iter()
        .map(|link| link.dish_id)
        .collect();

    let partition = partition_members(&current, &keep, &move_to_target);

    for &dish_id in &partition.move_to_overflow {
        move_link(store, source, overflow_id, dish_id, report).await?;
    }
    info!(
        "Moved from category {} to {}: {}",
        source,
        reorg.overflow_category,
        partition.move_to_overflow.len()
    );

    for &dish_id in &partition.keep {
        ensure_link(store, source, dish_id, report).await?;
    }

    for &dish_id in &partition.move_to_target {
        move_link(store, source, target, dish_id, report).await?;
    }
    info!("Moved to category {}: {:?}", target, reorg.r#move);

    report.kept = partition.keep.into_iter().collect();
    report.moved_to_target = partition.move_to_target.into_iter().collect();
    report.moved_to_overflow = partition.move_to_overflow.into_iter().collect();

    Ok(())
}

async fn move_link(
    store: &dyn MenuStore,
    from: i32,
    to: i32,
    dish_id: i32,
    report: &mut ReorgReport,
) -> Result<()> {
    let deleted = store.delete_dish_category(from, dish_id).await?;
    report.links_deleted += deleted as usize;
    ensure_link(store, to, dish_id, report).await
}

async fn ensure_link(
    store: &dyn MenuStore,
    category_id: i32,
    dish_id: i32,
    report: &mut ReorgReport,
) -> Result<()> {
    if store.find_dish_category(category_id, dish_id).await?.is_none() {
        store.create_dish_category(category_id, dish_id).await?;
        report.links_created += 1;
    }
    Ok(())
}

/// Print reorg report to console
pub fn print_reorg_report(report: &ReorgReport) {
    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }

    match &report.failure {
        None => println!("\n✓ Category reorganization complete"),
        Some(e) => println!("\n✗ Category reorganization stopped: {}", e),
    }
    println!("  Categories renamed: {}", report.categories_renamed);
    if let Some(category) = &report.overflow_category {
        println!(
            "  Overflow category: {} (id {}){}",
            category.name,
            category.category_id,
            if report.overflow_created { ", created" } else { "" }
        );
    }
    println!("  Kept: {}", report.kept.len());
    println!("  Moved to target: {}", report.moved_to_target.len());
    println!("  Moved to overflow: {}", report.moved_to_overflow.len());
    println!(
        "  Links created: {}, deleted: {}",
        report.links_created, report.links_deleted
    );
}
