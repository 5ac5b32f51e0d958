use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, trace};
use parquet::arrow::ArrowWriter;
use parquet::errors::ParquetError;

/// File extension of a column inside a group directory.
pub const COLUMN_EXTENSION: &str = "parquet";

// ---------------------------------------------------------------------------
// Container – the on-disk root of a catalog
// ---------------------------------------------------------------------------

/// Read-only handle on a catalog container.
///
/// Layout:
/// ```text
///  catalog/              container root (group "/")
///  ├── x.parquet         column "x" of the root group
///  └── galaxies/         group "galaxies"
///      ├── x.parquet
///      ├── y.parquet
///      └── sub/          group "galaxies/sub"
/// ```
/// Every column file holds exactly one top-level field; the row count in its
/// footer is the column length.
#[derive(Debug)]
pub struct Container {
    root: PathBuf,
}

impl Container {
    /// Open an existing container directory for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let root = path.as_ref().to_path_buf();
        let meta = fs::metadata(&root)?;
        if !meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a catalog container directory",
            ));
        }
        // Listing proves the directory is readable.
        fs::read_dir(&root)?;
        debug!("Opened container {}", root.display());
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Open a group by its `/`-separated path; `""` and `"/"` name the root.
    pub fn open_group(&self, group: &str) -> io::Result<Group<'_>> {
        let dir = self.root.join(group_relative_path(group)?);
        if !dir.is_dir() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such group"));
        }
        debug!("Opened group '{group}' of {}", self.root.display());
        Ok(Group {
            container: self,
            name: group.to_string(),
            dir,
        })
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        debug!("Released container {}", self.root.display());
    }
}

/// Translate a group path into a path relative to the container root,
/// refusing anything that would leave the container.
fn group_relative_path(group: &str) -> io::Result<PathBuf> {
    let mut rel = PathBuf::new();
    for part in group.split('/').filter(|p| !p.is_empty()) {
        if !is_plain_name(part) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid group path component '{part}'"),
            ));
        }
        rel.push(part);
    }
    Ok(rel)
}

/// A single normal path component: no separators, `.` or `..`.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

// ---------------------------------------------------------------------------
// Group – named set of columns within a container
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Group<'c> {
    container: &'c Container,
    name: String,
    dir: PathBuf,
}

impl Group<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container(&self) -> &Container {
        self.container
    }

    /// Directory holding the group's columns.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the file backing column `column`, or `None` when the name
    /// would resolve outside the group.
    pub fn column_path(&self, column: &str) -> Option<PathBuf> {
        is_plain_name(column).then(|| self.dir.join(format!("{column}.{COLUMN_EXTENSION}")))
    }
}

impl Drop for Group<'_> {
    fn drop(&mut self) {
        trace!("Released group '{}'", self.name);
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `values` as column `column` of the group directory `group_dir`,
/// creating the directory if needed.
pub fn write_column(group_dir: &Path, column: &str, values: ArrayRef) -> Result<(), ParquetError> {
    fs::create_dir_all(group_dir)?;
    let field = Field::new(column, values.data_type().clone(), values.null_count() > 0);
    let schema = Arc::new(Schema::new(vec![field]));
    let batch = RecordBatch::try_new(schema.clone(), vec![values])?;

    let path = group_dir.join(format!("{column}.{COLUMN_EXTENSION}"));
    let file = File::create(&path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    trace!("Wrote {} values to {}", batch.num_rows(), path.display());
    Ok(())
}
