use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use catalog_ingest::catalog::container::write_column;
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Write a synthetic clustered catalog into a container directory.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Container directory to create
    #[arg(long, default_value = "sample_catalog")]
    output: PathBuf,

    /// Group inside the container
    #[arg(long, default_value = "galaxies")]
    group: String,

    /// Number of points
    #[arg(long, default_value = "100000")]
    points: usize,

    /// Side length of the periodic box
    #[arg(long, default_value = "1000.0")]
    box_size: f64,

    /// Number of clusters the points are scattered around
    #[arg(long, default_value = "50")]
    clusters: usize,

    #[arg(long, default_value = "42")]
    seed: u64,
}

/// Columns of a generated catalog.
struct Sample {
    position: [Vec<f64>; 3],
    weight: Vec<f64>,
}

/// Scatter `points` points uniformly inside cubes around random cluster
/// centres, wrapped into the periodic box `[0, box_size)`.
fn generate(points: usize, box_size: f64, clusters: usize, seed: u64) -> Sample {
    let mut rng = StdRng::seed_from_u64(seed);
    let clusters = clusters.max(1);
    let centres: Vec<[f64; 3]> = (0..clusters)
        .map(|_| [0; 3].map(|_| rng.random_range(0.0..box_size)))
        .collect();
    let half_width = box_size / (clusters as f64).cbrt() / 8.0;

    let mut position: [Vec<f64>; 3] = Default::default();
    for axis in &mut position {
        axis.reserve(points);
    }
    let mut weight = Vec::with_capacity(points);
    for i in 0..points {
        for (axis, c) in position.iter_mut().zip(centres[i % clusters]) {
            let v = c + rng.random_range(-half_width..half_width);
            let wrapped = v.rem_euclid(box_size);
            // rem_euclid can round up to the box size itself.
            axis.push(if wrapped < box_size { wrapped } else { 0.0 });
        }
        weight.push(rng.random_range(0.5..1.5));
    }
    Sample { position, weight }
}

/// Write `sample` as columns x, y, z, w of `group_dir`.
fn write_sample(group_dir: &Path, sample: Sample) -> Result<()> {
    let [x, y, z] = sample.position;
    for (name, values) in [("x", x), ("y", y), ("z", z), ("w", sample.weight)] {
        let array: ArrayRef = Arc::new(Float64Array::from(values));
        write_column(group_dir, name, array)
            .with_context(|| format!("writing column '{name}' to {}", group_dir.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.box_size.is_nan() || args.box_size <= 0.0 {
        bail!("box size must be positive, got {}", args.box_size);
    }

    let sample = generate(args.points, args.box_size, args.clusters, args.seed);
    let group_dir = args.output.join(args.group.trim_matches('/'));
    write_sample(&group_dir, sample)?;

    info!(
        "Wrote {} points in {} clusters (box {}) to {}",
        args.points,
        args.clusters.max(1),
        args.box_size,
        group_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_ingest::{load_catalog, CatalogConfig, WeightSource};
    use tempfile::TempDir;

    #[test]
    fn generated_catalog_loads_inside_the_box() {
        let dir = TempDir::new().unwrap();
        let sample = generate(5_000, 250.0, 7, 3);
        write_sample(&dir.path().join("galaxies"), sample).unwrap();

        let config = CatalogConfig::new(dir.path())
            .with_group("galaxies")
            .with_weight("w");
        let catalog = load_catalog(&config).unwrap();
        assert_eq!(catalog.len(), 5_000);
        assert_eq!(catalog.weights(), &WeightSource::Column("w".into()));
        for record in catalog.records() {
            assert!(record.position.iter().all(|&v| (0.0..250.0).contains(&v)));
            assert!((0.5..1.5).contains(&record.weight));
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let a = generate(100, 10.0, 3, 9);
        let b = generate(100, 10.0, 3, 9);
        assert_eq!(a.position, b.position);
        assert_eq!(a.weight, b.weight);
        assert_ne!(generate(100, 10.0, 3, 10).weight, a.weight);
    }
}
