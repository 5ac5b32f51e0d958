//! Catalog ingestion for two-point correlation-function pipelines.
//!
//! Loads the positions (and optional weights) of one catalog from a columnar
//! container into a contiguous `Vec<Record>`:
//!
//! ```no_run
//! use catalog_ingest::{load_catalog, CatalogConfig};
//!
//! let config = CatalogConfig::new("data/galaxies").with_weight("w");
//! let catalog = load_catalog(&config)?;
//! println!("{} points", catalog.len());
//! # Ok::<(), catalog_ingest::LoadError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{
    load_catalog, load_catalog_from, load_catalogs, Catalog, Record, WeightSource, DEFAULT_WEIGHT,
};
pub use config::{CatalogConfig, RunConfig};
pub use error::{ColumnError, ColumnErrorKind, ConfigError, ErrorClass, LoadError};
