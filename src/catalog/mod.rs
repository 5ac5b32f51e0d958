//! Catalog layer: container access, column reading and record assembly.
//!
//! Architecture:
//! ```text
//!   container/ group/ <column>.parquet
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ container  │  open container + group (file-class errors)
//!   └───────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │  column    │  one column → Vec<f64>   (x, y, z, optional weight)
//!   └───────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │  loader    │  validate lengths, merge in parallel → Catalog
//!   └───────────┘
//! ```

pub mod column;
pub mod container;
pub mod loader;
pub mod model;

pub use loader::{load_catalog, load_catalog_from, load_catalogs};
pub use model::{Catalog, Record, WeightSource, DEFAULT_WEIGHT};
