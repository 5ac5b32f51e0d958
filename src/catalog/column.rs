use std::fs::File;
use std::io;
use std::path::PathBuf;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use log::{debug, trace};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::container::Group;
use crate::error::ColumnError;

// ---------------------------------------------------------------------------
// Column – the values of one column, owned by the caller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read the column `name` of `group` into a freshly allocated buffer.
///
/// Each step reports its own [`ColumnError`] variant: locating the column,
/// its shape descriptor, its one-dimensional extent, the allocation and the
/// bulk read. Integer and lower-precision float columns are converted to
/// `f64`. On failure nothing is returned and any partial buffer is dropped.
pub fn read_column(group: &Group<'_>, name: &str) -> Result<Column, ColumnError> {
    let handle = ColumnHandle::open(group, name)?;
    let extent = handle.extent()?;
    let mut values = allocate(extent).map_err(|_| ColumnError::OutOfMemory {
        column: name.to_string(),
        len: extent,
    })?;
    handle.read_into(&mut values, extent)?;
    debug!(
        "Read {extent} values from column '{name}' of group '{}'",
        group.name()
    );
    Ok(Column {
        name: name.to_string(),
        values,
    })
}

/// Reserve exactly `len` elements, reporting allocation failure instead of
/// aborting.
pub(crate) fn allocate<T>(len: usize) -> Result<Vec<T>, std::collections::TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// ColumnHandle – an open column file
// ---------------------------------------------------------------------------

struct ColumnHandle {
    name: String,
    builder: ParquetRecordBatchReaderBuilder<File>,
}

impl ColumnHandle {
    /// Locate the column and load its shape descriptor (the Parquet footer).
    fn open(group: &Group<'_>, name: &str) -> Result<Self, ColumnError> {
        let not_found = |path: PathBuf| ColumnError::NotFound {
            column: name.to_string(),
            path,
        };
        // Names that are not a single path component never resolve.
        let path = group
            .column_path(name)
            .ok_or_else(|| not_found(group.dir().join(name)))?;
        if !path.is_file() {
            return Err(not_found(path));
        }
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(not_found(path)),
            Err(err) => {
                return Err(ColumnError::Shape {
                    column: name.to_string(),
                    source: err.into(),
                })
            }
        };
        let builder =
            ParquetRecordBatchReaderBuilder::try_new(file).map_err(|source| ColumnError::Shape {
                column: name.to_string(),
                source,
            })?;
        trace!("Opened column {}", path.display());
        Ok(Self {
            name: name.to_string(),
            builder,
        })
    }

    /// Number of values, taken from the footer. Only a single scalar field
    /// has a simple one-dimensional extent.
    fn extent(&self) -> Result<usize, ColumnError> {
        let schema = self.builder.schema();
        if schema.fields().len() != 1 {
            return Err(self.dimension_error(format!(
                "expected a single field, found {}",
                schema.fields().len()
            )));
        }
        let data_type = schema.field(0).data_type();
        if is_nested(data_type) {
            return Err(self.dimension_error(format!("nested element type {data_type}")));
        }
        let rows = self.builder.metadata().file_metadata().num_rows();
        usize::try_from(rows)
            .map_err(|_| self.dimension_error(format!("invalid row count {rows}")))
    }

    /// Bulk-read all values into `buf`, which has capacity for `extent`.
    /// Consumes the handle, closing the column file.
    fn read_into(self, buf: &mut Vec<f64>, extent: usize) -> Result<(), ColumnError> {
        let data_type = self.builder.schema().field(0).data_type().clone();
        if !data_type.is_numeric() {
            return Err(self.malformed(format!("unsupported element type {data_type}")));
        }

        let name = self.name;
        let reader = self.builder.build().map_err(|source| ColumnError::Read {
            column: name.clone(),
            source: source.into(),
        })?;

        copy_batches(&name, reader, buf, extent)?;
        trace!("Released column '{name}'");
        Ok(())
    }

    fn dimension_error(&self, detail: String) -> ColumnError {
        ColumnError::Dimension {
            column: self.name.clone(),
            detail,
        }
    }

    fn malformed(&self, detail: String) -> ColumnError {
        ColumnError::Malformed {
            column: self.name.clone(),
            detail,
        }
    }
}

/// Append every batch of a single-field column to `buf`, checking nulls and
/// that exactly `extent` values arrive.
fn copy_batches<I>(
    name: &str,
    batches: I,
    buf: &mut Vec<f64>,
    extent: usize,
) -> Result<(), ColumnError>
where
    I: IntoIterator<Item = Result<RecordBatch, ArrowError>>,
{
    let malformed = |detail: String| ColumnError::Malformed {
        column: name.to_string(),
        detail,
    };
    let read_error = |source: ArrowError| ColumnError::Read {
        column: name.to_string(),
        source,
    };

    for batch in batches {
        let batch = batch.map_err(read_error)?;
        let array = batch.column(0);
        if array.null_count() > 0 {
            return Err(malformed(format!("{} null values", array.null_count())));
        }
        if buf.len() + array.len() > extent {
            return Err(malformed(format!("more than the declared {extent} values")));
        }
        let floats = cast(array, &DataType::Float64).map_err(read_error)?;
        buf.extend_from_slice(floats.as_primitive::<Float64Type>().values());
    }

    if buf.len() != extent {
        let detail = format!("read {} of the declared {extent} values", buf.len());
        return Err(malformed(detail));
    }
    Ok(())
}

fn is_nested(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::List(_)
            | DataType::LargeList(_)
            | DataType::FixedSizeList(_, _)
            | DataType::Struct(_)
            | DataType::Map(_, _)
            | DataType::Union(_, _)
    )
}
