use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;

use super::column::{allocate, read_column, Column};
use super::container::{Container, Group};
use super::model::{Catalog, Record, WeightSource, DEFAULT_WEIGHT};
use crate::config::CatalogConfig;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one catalog described by `config`.
///
/// The load is all-or-nothing: on success the whole record array is returned,
/// on failure nothing is. See [`LoadError::class`] for the failure classes.
///
/// A configured weight column that cannot be read fails the load like any
/// other column. A weight column that reads fine but whose length differs
/// from the position columns is ignored and every weight is set to
/// [`DEFAULT_WEIGHT`]; this is reported through [`Catalog::weights`].
pub fn load_catalog(config: &CatalogConfig) -> Result<Catalog, LoadError> {
    config.validate()?;
    let path = config.path.as_path();
    info!("Loading catalog {} (group '{}')", path.display(), config.group);

    let container = Container::open(path).map_err(|source| LoadError::ContainerOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let group = container
        .open_group(&config.group)
        .map_err(|source| LoadError::GroupOpen {
            path: path.to_path_buf(),
            group: config.group.clone(),
            source,
        })?;

    let [x, y, z] = read_positions(&group, &config.position)?;
    let len = common_length(path, [&x, &y, &z])?;

    let mut records = allocate::<Record>(len).map_err(|_| LoadError::OutOfMemory {
        path: path.to_path_buf(),
        records: len,
    })?;
    merge_positions(&mut records, &x, &y, &z);
    drop((x, y, z));

    let weights = match &config.weight {
        Some(name) => {
            let column = read(&group, name)?;
            apply_weights(&mut records, column)
        }
        None => WeightSource::Unweighted,
    };

    drop(group);
    drop(container);

    info!(
        "Loaded {} records from {} (weights: {weights})",
        records.len(),
        path.display()
    );
    Ok(Catalog::new(records, weights, config.selection.clone()))
}

/// Load a catalog from its individual settings.
pub fn load_catalog_from(
    path: impl Into<PathBuf>,
    group: &str,
    position: [&str; 3],
    weight: Option<&str>,
    selection: Option<&str>,
) -> Result<Catalog, LoadError> {
    let config = CatalogConfig {
        path: path.into(),
        group: group.to_string(),
        position: position.map(str::to_string),
        weight: weight.map(str::to_string),
        selection: selection.map(str::to_string),
        label: None,
    };
    load_catalog(&config)
}

/// Load independent catalogs concurrently. Results keep the input order and
/// each catalog fails or succeeds on its own.
pub fn load_catalogs(configs: &[CatalogConfig]) -> Vec<Result<Catalog, LoadError>> {
    configs.par_iter().map(load_catalog).collect()
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

fn read(group: &Group<'_>, name: &str) -> Result<Column, LoadError> {
    read_column(group, name).map_err(|source| LoadError::Column {
        path: group.container().path().to_path_buf(),
        group: group.name().to_string(),
        column: name.to_string(),
        source,
    })
}

/// Read x, y, z in order; the first failure aborts.
fn read_positions(group: &Group<'_>, names: &[String; 3]) -> Result<[Column; 3], LoadError> {
    let x = read(group, &names[0])?;
    let y = read(group, &names[1])?;
    let z = read(group, &names[2])?;
    Ok([x, y, z])
}

/// Common length of the three position columns.
fn common_length(path: &Path, columns: [&Column; 3]) -> Result<usize, LoadError> {
    let lengths = columns.map(Column::len);
    let [nx, ny, nz] = lengths;
    if nx != ny || ny != nz || nz != nx {
        return Err(LoadError::LengthMismatch {
            path: path.to_path_buf(),
            columns: columns.map(|c| c.name.clone()),
            lengths,
        });
    }
    debug!("Position columns agree on {nx} values");
    Ok(nx)
}

/// Fill `records` (empty, with capacity for all values) from the position
/// columns, one independent record per index.
fn merge_positions(records: &mut Vec<Record>, x: &Column, y: &Column, z: &Column) {
    records.par_extend(
        x.values
            .par_iter()
            .zip(&y.values)
            .zip(&z.values)
            .map(|((&x, &y), &z)| Record {
                position: [x, y, z],
                weight: DEFAULT_WEIGHT,
            }),
    );
}

/// Copy a weight column into `records` when the lengths agree; otherwise
/// leave the default weight in place.
fn apply_weights(records: &mut [Record], column: Column) -> WeightSource {
    let (expected, found) = (records.len(), column.len());
    if found != expected {
        warn!(
            "Weight column '{}' has {found} values but the positions have {expected}; using weight {DEFAULT_WEIGHT}",
            column.name
        );
        records.par_iter_mut().for_each(|r| r.weight = DEFAULT_WEIGHT);
        return WeightSource::DefaultedOnLengthMismatch {
            column: column.name,
            expected,
            found,
        };
    }
    records
        .par_iter_mut()
        .zip(&column.values)
        .for_each(|(r, &w)| r.weight = w);
    WeightSource::Column(column.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[f64]) -> Column {
        Column {
            name: name.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn merge_interleaves_positions() {
        let x = column("x", &[1.0, 2.0, 3.0]);
        let y = column("y", &[4.0, 5.0, 6.0]);
        let z = column("z", &[7.0, 8.0, 9.0]);
        let mut records = Vec::with_capacity(3);
        merge_positions(&mut records, &x, &y, &z);
        let positions: Vec<[f64; 3]> = records.iter().map(|r| r.position).collect();
        assert_eq!(
            positions,
            vec![[1.0, 4.0, 7.0], [2.0, 5.0, 8.0], [3.0, 6.0, 9.0]]
        );
        assert!(records.iter().all(|r| r.weight == DEFAULT_WEIGHT));
    }

    #[test]
    fn any_pairwise_mismatch_is_rejected() {
        let path = Path::new("cat");
        let a = column("x", &[1.0, 2.0, 3.0]);
        let b = column("y", &[1.0, 2.0]);
        for cols in [[&a, &b, &a], [&b, &a, &a], [&a, &a, &b]] {
            let err = common_length(path, cols).unwrap_err();
            assert!(matches!(err, LoadError::LengthMismatch { .. }));
        }
        assert_eq!(common_length(path, [&a, &a, &a]).unwrap(), 3);
    }

    #[test]
    fn weights_copied_when_lengths_agree() {
        let mut records = vec![Record::default(); 3];
        let source = apply_weights(&mut records, column("w", &[0.5, 1.5, 2.0]));
        assert_eq!(source, WeightSource::Column("w".into()));
        let weights: Vec<f64> = records.iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![0.5, 1.5, 2.0]);
    }

    #[test]
    fn weights_defaulted_on_length_mismatch() {
        let mut records = vec![
            Record {
                position: [0.0; 3],
                weight: 7.0,
            };
            3
        ];
        let source = apply_weights(&mut records, column("w", &[0.5]));
        assert_eq!(
            source,
            WeightSource::DefaultedOnLengthMismatch {
                column: "w".into(),
                expected: 3,
                found: 1,
            }
        );
        assert!(records.iter().all(|r| r.weight == DEFAULT_WEIGHT));
    }
}
