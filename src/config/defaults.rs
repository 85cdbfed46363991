//! Default values for configuration

use super::{KeywordRule, MenuItem};
use rust_decimal::Decimal;

/// Default database URL; `DATABASE_URL` overrides it at the CLI, never in the file
pub fn default_database_url() -> String {
    "postgres://localhost:5432/restaurant".to_string()
}

/// Category type tag used for dish categories
pub fn default_category_type() -> String {
    "dish".to_string()
}

/// Source-currency units per one target-currency unit (1 EUR = 90 INR)
pub fn default_exchange_rate() -> Decimal {
    Decimal::from(90)
}

/// Fallback category when no keyword matches (VIANDES)
pub fn default_classifier_default_category() -> i32 {
    27
}

fn rule(keywords: &[&str], category_id: i32) -> KeywordRule {
    KeywordRule {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        category_id,
    }
}

/// Keyword rules in priority order
///
/// 21 = FINGER FOOD, 25 = BURGERS, 27 = VIANDES, 29 = KIDS MENU
pub fn default_classifier_rules() -> Vec<KeywordRule> {
    vec![
        rule(&["KIDS"], 29),
        rule(&["PIZZA"], 25),
        rule(&["RISSOTO"], 27),
        rule(&["CHICKEN"], 27),
        rule(&["MOMO"], 21),
        rule(&["SUSHI"], 21),
        rule(&["FETTUCINI", "SPEGHETI", "PENNE"], 27),
        rule(&["NOODLES"], 27),
        rule(&["BURGER"], 25),
        rule(&["KABAB"], 21),
        rule(&["CHILLY"], 27),
    ]
}

/// Replacement menu, prices in rupees
pub fn default_menu() -> Vec<MenuItem> {
    [
        ("AL FUNGI RISSOTO", 699),
        ("KOREAN BBQ CHICKEN", 499),
        ("Kids noodles veg", 349),
        ("CURRY WALA MOMO", 399),
        ("ASPARAGUS CHEESE SUSHI", 549),
        ("CHICKEN CUTLET", 299),
        ("Drums of Seven", 469),
        ("PRAWN KATSU SUSHI", 589),
        ("AVACADO CREAM CHEESE SUSHI", 599),
        ("PANEER MAKHANI PIZZA LARGE", 699),
        ("FETTUCINI IN MUSHROOM TRUFFLE SAUCE", 599),
        ("SPEGHETI BOLOGNESE", 699),
        ("ARRABIATA PENNE CHICKEN", 549),
        ("ARRABIATA PENNE VEG", 499),
        ("PENNE AL COSIO", 519),
        ("UDON NOODLES CHICKEN BOWL (COMBO)", 419),
        ("RAMEN DRY VEG", 449),
        ("BUCKWHEAT NOODLES (VEG)", 429),
        ("RAMEN DRY CHICKEN", 489),
        ("UDON NOODLES WITH FIVE SPICE PANEER BOWL (COMBO)", 389),
        // Estimated price
        ("AVACADO BURRATA OPE EYE TOAST (SANDWICH)", 399),
        ("OPEN VEG BURGER", 299),
        ("SEAFOOD CHARCOAL FETTUCCINE", 689),
        ("CHICKEN SEEKH KABAB", 449),
        ("PANEER TIKKA KABAB", 489),
        ("CLASSIC MARGHERITA PIZZA", 649),
        ("ALL FUNGI PIZZA", 549),
        ("CORN MARGHERITA PIZZA", 649),
        ("SPICY COTTAGE CHEESE PIZZA", 549),
        ("CRAZY CHILLY CHICKEN DRY", 499),
        ("FISH CHILLY DRY (BASA FISH)", 539),
        ("BBQ CHICKEN PIZZA", 699),
        ("BABY CORN CHILLY DRY", 369),
        ("PANEER CHILLY DRY", 419),
    ]
    .into_iter()
    .map(|(name, price)| MenuItem {
        name: name.to_string(),
        price: Decimal::from(price),
    })
    .collect()
}

/// Category renamed by the reorg
pub fn default_rename_category_id() -> i32 {
    25
}

/// New name for the renamed category
pub fn default_rename_to() -> String {
    "Burgers and Pizzas".to_string()
}

/// Category whose members are reorganized (VIANDES)
pub fn default_source_category_id() -> i32 {
    27
}

/// Dishes that stay in the source category
pub fn default_keep() -> Vec<String> {
    [
        "KOREAN BBQ CHICKEN",
        "CHICKEN CUTLET",
        "DRUMS OF SEVEN",
        "CHICKEN SEEKH KABAB",
        "FISH CHILLY DRY (BASA FISH)",
        "CRAZY CHILLY CHICKEN DRY",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Category receiving the explicitly moved dishes (KIDS MENU)
pub fn default_move_category_id() -> i32 {
    29
}

/// Dishes moved to the move category
pub fn default_move() -> Vec<String> {
    vec![
        "BABY CORN CHILLY DRY".to_string(),
        "PANEER CHILLY DRY".to_string(),
    ]
}

/// Category receiving every other source member, created if absent
pub fn default_overflow_category() -> String {
    "Pasta/Sandwiches".to_string()
}
