//! Replace command - wipe the dish catalog and insert the configured menu

use crate::classify::Classifier;
use crate::config::{Config, MenuItem};
use crate::error::{Error, Result};
use crate::meta::{MenuStore, NewDish};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Rows removed before repopulating
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearStats {
    pub ingredient_links: u64,
    pub cuisson_links: u64,
    pub category_links: u64,
    pub dishes: u64,
}

/// One inserted dish and the category it was linked to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishAssignment {
    pub dish_id: i32,
    pub name: String,
    pub source_price: Decimal,
    pub price_eur: Decimal,
    pub category_id: i32,
}

/// Outcome of a replacement run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaceReport {
    pub cleared: ClearStats,
    pub dishes_created: usize,
    pub skipped: usize,
    pub assignments: Vec<DishAssignment>,
    pub warnings: Vec<String>,
    /// Error that stopped the run; earlier inserts are not rolled back
    pub failure: Option<String>,
}

impl ReplaceReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Convert a source-currency price with `rate` source units per target unit
pub fn convert_price(price: Decimal, rate: Decimal) -> Result<Decimal> {
    price
        .checked_div(rate)
        .ok_or_else(|| Error::Price(format!("cannot convert {} at rate {}", price, rate)))
}

/// Replace the whole dish catalog with `config.menu`
///
/// Never returns an error: a persistence failure stops the run and is
/// recorded in [`ReplaceReport::failure`].
pub async fn cmd_replace(config: &Config, store: &dyn MenuStore) -> ReplaceReport {
    info!(items = config.menu.len(), "Starting menu replacement");

    let classifier = Classifier::new(&config.classifier);
    let mut report = ReplaceReport::default();

    match replace_menu(config, store, &classifier, &mut report).await {
        Ok(()) => info!(
            created = report.dishes_created,
            skipped = report.skipped,
            "Menu replacement completed"
        ),
        Err(e) => {
            error!(error = ?e, "Error replacing menu");
            report.failure = Some(e.to_string());
        }
    }

    report
}

async fn replace_menu(
    config: &Config,
    store: &dyn MenuStore,
    classifier: &Classifier,
    report: &mut ReplaceReport,
) -> Result<()> {
    // Dependents first, then dishes
    info!("Clearing dish-ingredient links");
    report.cleared.ingredient_links = store.clear_dish_ingredients().await?;

    info!("Clearing dish-cuisson links");
    report.cleared.cuisson_links = store.clear_dish_cuissons().await?;

    info!("Clearing dish-category links");
    report.cleared.category_links = store.clear_dish_categories().await?;

    info!("Clearing dishes");
    report.cleared.dishes = store.clear_dishes().await?;

    store.reset_dish_sequence().await?;

    info!("Inserting new menu items");
    for item in &config.menu {
        insert_item(config, store, classifier, item, report).await?;
    }

    Ok(())
}

async fn insert_item(
    config: &Config,
    store: &dyn MenuStore,
    classifier: &Classifier,
    item: &MenuItem,
    report: &mut ReplaceReport,
) -> Result<()> {
    if item.price.is_zero() {
        let msg = format!("Skipping {} - no price provided", item.name);
        warn!("{}", msg);
        report.warnings.push(msg);
        report.skipped += 1;
        return Ok(());
    }

    let price_eur = convert_price(item.price, config.exchange_rate)?;

    let dish = store
        .create_dish(&NewDish {
            name: item.name.clone(),
            price_eur,
            record_date: Utc::now().naive_utc(),
        })
        .await?;

    let category_id = classifier.classify(&item.name);
    store.create_dish_category(category_id, dish.dish_id).await?;

    info!(
        "Added: {} - {} (source) ({} EUR) - Category: {}",
        item.name,
        item.price,
        price_eur.round_dp(2),
        category_id
    );

    report.dishes_created += 1;
    report.assignments.push(DishAssignment {
        dish_id: dish.dish_id,
        name: dish.name,
        source_price: item.price,
        price_eur,
        category_id,
    });

    Ok(())
}

/// Print replacement report to console
pub fn print_replace_report(report: &ReplaceReport) {
    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }

    match &report.failure {
        None => println!("\n✓ Menu replacement complete"),
        Some(e) => println!("\n✗ Menu replacement stopped: {}", e),
    }
    println!(
        "  Cleared: {} dishes, {} category links, {} ingredient links, {} cuisson links",
        report.cleared.dishes,
        report.cleared.category_links,
        report.cleared.ingredient_links,
        report.cleared.cuisson_links
    );
    println!("  Dishes created: {}", report.dishes_created);
    println!("  Items skipped: {}", report.skipped);
}
