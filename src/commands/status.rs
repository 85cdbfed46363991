//! Status command implementation

use crate::config::Config;
use crate::error::Result;
use crate::meta::{MenuStats, MenuStore};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub config_path: String,
    pub category_type: String,
    pub exchange_rate: String,
    pub menu_items: usize,
    pub db_stats: MenuStats,
}

/// Get catalog status
pub async fn cmd_status(config: &Config, store: &dyn MenuStore) -> Result<StatusInfo> {
    info!("Getting status");

    let db_stats = store.stats(&config.category_type).await?;

    Ok(StatusInfo {
        config_path: config.paths.config_file.display().to_string(),
        category_type: config.category_type.clone(),
        exchange_rate: config.exchange_rate.to_string(),
        menu_items: config.menu.len(),
        db_stats,
    })
}

/// Print status to console
pub fn print_status(status: &StatusInfo) {
    println!("\n📊 Menu Status\n");
    println!("Configuration: {}", status.config_path);
    println!("Exchange rate: {}", status.exchange_rate);
    println!("Configured menu items: {}", status.menu_items);
    println!("\nDatabase Stats:");
    println!("  Dishes: {}", status.db_stats.dish_count);
    println!(
        "  Categories ({}): {}",
        status.category_type, status.db_stats.category_count
    );
    println!("  Dish-category links: {}", status.db_stats.link_count);

    if status.db_stats.uncategorized_dishes > 0 {
        println!(
            "  ⚠ Dishes without a category: {}",
            status.db_stats.uncategorized_dishes
        );
    } else {
        println!("  ✓ Every dish has a category");
    }
}
