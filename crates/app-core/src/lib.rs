//! Core catalog logic for Pickup Lines
//!
//! This crate contains the static, read-only line catalog: categories,
//! lookup, filtering, search and the item of the day.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod search;

pub use catalog::{
    day_seed, Catalog, CatalogError, CatalogItem, Category, CUSTOM_CATEGORY_NAME,
};
pub use search::{SearchParams, SearchRanking};
