//! # Shoplist Core
//!
//! Shared, runtime-free logic for Shoplist: data models, unit tables, the
//! line parser, categorizer, merge engine, best-match selection, the list
//! store abstraction, and the search-oracle trait.
//!
//! This crate contains no tokio, sqlx, HTTP client, or filesystem I/O.
//! Everything except the [`store`] and [`oracle`] traits is synchronous and
//! pure.
//!
//! ## Pipeline
//!
//! ```text
//! raw lines ──▶ parser ──▶ categorizer ──▶ merge ──▶ Vec<ShoppingItem>
//! ```
//!
//! ```rust
//! use shoplist_core::merge::MergeStrategy;
//! use shoplist_core::normalizer::ShoppingListNormalizer;
//!
//! let normalizer = ShoppingListNormalizer::default();
//! let lines = ["2 cups flour", "1 cup flour", "500g rice"];
//! let outcome = normalizer.normalize(&lines, MergeStrategy::Sum);
//! assert_eq!(outcome.items.len(), 2);
//! assert_eq!(outcome.items_merged, 1);
//! ```

pub mod best_match;
pub mod categorizer;
pub mod error;
pub mod merge;
pub mod models;
pub mod normalizer;
pub mod oracle;
pub mod parser;
pub mod store;
pub mod units;

pub use error::{OracleErrorKind, ShoppingError};
