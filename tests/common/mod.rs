#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use catalog_ingest::catalog::container::write_column;
use tempfile::TempDir;

/// A throwaway container directory.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("creating temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a Float64 column into `group` (a `/`-separated path).
    pub fn column(&self, group: &str, name: &str, values: &[f64]) -> &Self {
        self.array(group, name, Arc::new(Float64Array::from(values.to_vec())))
    }

    pub fn array(&self, group: &str, name: &str, values: ArrayRef) -> &Self {
        write_column(&self.group_dir(group), name, values).expect("writing column");
        self
    }

    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.dir.path().join(group.trim_matches('/'))
    }
}

/// x=[1,2,3], y=[4,5,6], z=[7,8,9] in group "g".
pub fn xyz(fixture: &Fixture) -> &Fixture {
    fixture
        .column("g", "x", &[1.0, 2.0, 3.0])
        .column("g", "y", &[4.0, 5.0, 6.0])
        .column("g", "z", &[7.0, 8.0, 9.0])
}
