use std::fmt;

/// Weight given to every record when no usable weight column exists.
pub const DEFAULT_WEIGHT: f64 = 1.0;

// ---------------------------------------------------------------------------
// Record – one point of a catalog
// ---------------------------------------------------------------------------

/// One catalog point: Cartesian position plus weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// x, y, z in catalog units.
    pub position: [f64; 3],
    pub weight: f64,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            weight: DEFAULT_WEIGHT,
        }
    }
}

// ---------------------------------------------------------------------------
// WeightSource – where the weights of a loaded catalog came from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightSource {
    /// No weight column was configured; all weights are [`DEFAULT_WEIGHT`].
    Unweighted,
    /// Weights were copied from the named column.
    Column(String),
    /// The weight column was read but its length disagreed with the
    /// position columns, so all weights are [`DEFAULT_WEIGHT`].
    DefaultedOnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

impl WeightSource {
    /// Whether every record carries [`DEFAULT_WEIGHT`].
    pub fn is_default(&self) -> bool {
        !matches!(self, WeightSource::Column(_))
    }
}

impl fmt::Display for WeightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightSource::Unweighted => write!(f, "unweighted"),
            WeightSource::Column(name) => write!(f, "column '{name}'"),
            WeightSource::DefaultedOnLengthMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "default (column '{column}' has {found} values, expected {expected})"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded point set
// ---------------------------------------------------------------------------

/// A fully materialised catalog, owned by the caller once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    records: Vec<Record>,
    weights: WeightSource,
    selection: Option<String>,
}

impl Catalog {
    pub fn new(records: Vec<Record>, weights: WeightSource, selection: Option<String>) -> Self {
        Self {
            records,
            weights,
            selection,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Hand the record array over to the pair-counting stage.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn weights(&self) -> &WeightSource {
        &self.weights
    }

    /// Selection expression configured for this catalog, not evaluated here.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Sum of all record weights, accumulated in record order.
    pub fn total_weight(&self) -> f64 {
        self.records.iter().map(|r| r.weight).sum()
    }

    /// Per-axis `(min, max)` of the positions, or `None` for an empty catalog.
    pub fn bounds(&self) -> Option<[(f64, f64); 3]> {
        let first = self.records.first()?;
        let init = first.position.map(|v| (v, v));
        Some(self.records.iter().fold(init, |mut acc, r| {
            for (axis, &v) in acc.iter_mut().zip(&r.position) {
                axis.0 = axis.0.min(v);
                axis.1 = axis.1.max(v);
            }
            acc
        }))
    }
}
