//! menu-maint - maintenance procedures for a restaurant menu database
//!
//! This crate provides:
//! - A data-driven keyword classifier mapping dish names to categories
//! - The catalog replacement procedure (wipe dishes, reinsert, categorize)
//! - The category reorganization procedure (rename, create, move dishes)
//! - A `MenuStore` persistence seam with a PostgreSQL implementation

pub mod classify;
pub mod commands;
pub mod config;
pub mod error;
pub mod meta;

pub use config::Config;
pub use error::{Error, Result};
